//! # thermo 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/thermo.rs`

use crate::cli::run::RunArgs;

use clap::Args;
use std::path::PathBuf;

/// thermo 子命令参数
#[derive(Args, Debug)]
pub struct ThermoArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Group structures into a Boltzmann-weighted cluster (glob on the structure name, repeatable)
    #[arg(long = "cluster")]
    pub clusters: Vec<String>,

    /// Show Boltzmann populations of all structures
    #[arg(long)]
    pub boltz: bool,

    /// Show imaginary frequencies
    #[arg(long)]
    pub imag: bool,

    /// Print the total CPU time
    #[arg(long)]
    pub cpu: bool,

    /// Run consistency checks on the calculations
    #[arg(long)]
    pub check: bool,

    /// Write the thermochemistry table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// PES file; print relative energies after the table
    #[arg(long)]
    pub pes: Option<PathBuf>,

    /// Save the PES energy profile as PNG or SVG (requires --pes)
    #[arg(long, requires = "pes")]
    pub plot: Option<PathBuf>,
}
