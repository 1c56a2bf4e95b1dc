//! # qhthermo - 准谐振子热化学工具
//!
//! 从 Gaussian / ORCA 频率计算输出中计算 ZPE、焓、熵与 Gibbs 自由能，
//! 低频模式可用 Grimme 或 Truhlar 准谐近似处理，并可按 PES 文件汇总反应路径的相对能量。
//!
//! ## 子命令
//! - `thermo` - 逐结构热化学表
//! - `pes`    - 反应路径相对能量表
//! - `scan`   - 变温热化学表
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (文件收集与并行处理)
//!   │     ├── parsers/   (输出文件与 PES 文件解析)
//!   │     ├── thermo/    (热化学引擎与 Boltzmann 平均)
//!   │     ├── pes/       (势能面汇总与绘图)
//!   │     ├── checks/    (一致性检查)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod checks;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod pes;
mod thermo;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
