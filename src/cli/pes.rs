//! # pes 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pes.rs`

use crate::cli::run::RunArgs;

use clap::Args;
use std::path::PathBuf;

/// pes 子命令参数
#[derive(Args, Debug)]
pub struct PesArgs {
    /// PES description file (PES, SPECIES and FORMAT sections)
    pub pes_file: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,

    /// Save the energy profile as PNG or SVG
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = 768)]
    pub height: u32,
}
