//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `thermo`: 热化学表（可附带簇、检查、CSV、PES 报告）
//! - `pes`: 仅输出势能面相对能量表
//! - `scan`: 变温热化学表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run（共用运行参数）, thermo, pes, scan

pub mod pes;
pub mod run;
pub mod scan;
pub mod thermo;

use clap::{Parser, Subcommand};

/// qhthermo - 准谐振子热化学工具
#[derive(Parser)]
#[command(name = "qhthermo")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Quasi-harmonic thermochemistry from Gaussian and ORCA frequency calculations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compute thermochemistry for each output file
    Thermo(thermo::ThermoArgs),

    /// Tabulate relative energies along the pathways of a PES file
    Pes(pes::PesArgs),

    /// Compute thermochemistry over a range of temperatures
    Scan(scan::ScanArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_thermo_subcommand() {
        let cli = Cli::try_parse_from([
            "qhthermo", "thermo", "a.log", "b.log", "-t", "350", "-q", "truhlar", "--cluster", "conf_*",
        ])
        .unwrap();
        match cli.command {
            Commands::Thermo(args) => {
                assert_eq!(args.run.inputs.len(), 2);
                assert!((args.run.temperature - 350.0).abs() < 1e-12);
                assert_eq!(args.clusters, vec!["conf_*".to_string()]);
            }
            _ => panic!("expected thermo subcommand"),
        }
    }

    #[test]
    fn test_parse_pes_subcommand() {
        let cli = Cli::try_parse_from(["qhthermo", "pes", "rxn.yaml", "logs/"]).unwrap();
        match cli.command {
            Commands::Pes(args) => {
                assert_eq!(args.pes_file.to_string_lossy(), "rxn.yaml");
                assert_eq!(args.run.inputs.len(), 1);
            }
            _ => panic!("expected pes subcommand"),
        }
    }
}
