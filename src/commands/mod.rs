//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `parsers/`, `thermo/`, `pes/`, `checks/`, `utils/`
//! - 子模块: pipeline（共用流程）, thermo, pes, scan

pub mod pes;
pub mod pipeline;
pub mod scan;
pub mod thermo;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Thermo(args) => thermo::execute(args),
        Commands::Pes(args) => pes::execute(args),
        Commands::Scan(args) => scan::execute(args),
    }
}
