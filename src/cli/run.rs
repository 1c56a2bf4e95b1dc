//! # 共用运行参数
//!
//! 所有子命令共享的热化学参数与输入文件选项，通过 `#[command(flatten)]` 嵌入。
//!
//! ## 依赖关系
//! - 被 `cli/thermo.rs`, `cli/pes.rs`, `cli/scan.rs` 嵌入
//! - `to_options` 构造 `models/options.rs` 的 RunOptions

use crate::batch::collector::DEFAULT_PATTERN;
use crate::error::Result;
use crate::models::{QhMethod, RunOptions};
use crate::thermo::Solvent;

use clap::Args;
use std::path::PathBuf;

/// 单点能来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpcMode {
    /// 同一文件中最后一个电子能量
    Link,
    /// 单独的 `name_<suffix>.ext` 文件
    Suffix(String),
}

/// 共用运行参数
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Gaussian/ORCA output files, directories or glob patterns
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Temperature in K
    #[arg(short = 't', long, default_value_t = 298.15)]
    pub temperature: f64,

    /// Concentration in mol/L (default: 1 atm at the chosen temperature)
    #[arg(short = 'c', long = "conc")]
    pub concentration: Option<f64>,

    /// Cut-off frequency in cm^-1 for the quasi-harmonic treatment
    #[arg(short = 'f', long = "freq-cutoff", default_value_t = 100.0)]
    pub freq_cutoff: f64,

    /// Quasi-harmonic entropy model (grimme or truhlar)
    #[arg(short = 'q', long = "qh", default_value = "grimme")]
    pub qh_method: String,

    /// Frequency scale factor (overrides --scale-table)
    #[arg(short = 'v', long = "vib-scale")]
    pub scale_factor: Option<f64>,

    /// CSV table of ZPE scale factors (columns: level,zpe_fac,reference)
    #[arg(long)]
    pub scale_table: Option<PathBuf>,

    /// Solvent for the free-space correction (none, H2O, toluene, DMF, AcOH, chloroform)
    #[arg(short = 's', long, default_value = "none")]
    pub solvent: String,

    /// Single-point energies: a filename suffix (name_<suffix>.log) or 'link'
    #[arg(long)]
    pub spc: Option<String>,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jobs: usize,

    /// File patterns matched inside directories (comma-separated)
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Search directories recursively
    #[arg(short = 'r', long)]
    pub recursive: bool,
}

impl RunArgs {
    /// 校验并转换为引擎参数；`scale_factor` 由调用方在读取文件后决定
    pub fn to_options(&self, scale_factor: f64) -> Result<RunOptions> {
        let mut options = RunOptions::at_temperature(self.temperature);
        if let Some(conc) = self.concentration {
            options.concentration = conc;
        }
        options.freq_cutoff = self.freq_cutoff;
        options.scale_factor = scale_factor;
        options.qh_method = self.qh_method.parse::<QhMethod>()?;
        options.solvent = self.solvent.parse::<Solvent>()?;
        options.validate()
    }

    pub fn spc_mode(&self) -> Option<SpcMode> {
        match self.spc.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("link") => Some(SpcMode::Link),
            Some(s) => Some(SpcMode::Suffix(s.to_string())),
        }
    }

    /// 需要从输入列表中排除的单点能文件后缀
    pub fn spc_suffix(&self) -> Option<&str> {
        match self.spc_mode() {
            Some(SpcMode::Suffix(_)) => self.spc.as_deref().map(str::trim),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThermoError;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(args: &[&str]) -> RunArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(args);
        Harness::try_parse_from(full).unwrap().run
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["a.log"]);
        let options = args.to_options(1.0).unwrap();
        assert!((options.temperature - 298.15).abs() < 1e-12);
        assert!((options.freq_cutoff - 100.0).abs() < 1e-12);
        assert_eq!(options.qh_method, QhMethod::Grimme);
        assert_eq!(options.solvent, Solvent::None);
        // 101.325/(R·T)
        assert!((options.concentration - 0.040874).abs() < 1e-5);
        assert_eq!(args.spc_mode(), None);
    }

    #[test]
    fn test_unknown_method_and_solvent_are_fatal() {
        let args = parse(&["a.log", "-q", "rrho"]);
        assert!(matches!(args.to_options(1.0), Err(ThermoError::UnknownQhMethod(_))));

        let args = parse(&["a.log", "-s", "benzene"]);
        assert!(matches!(args.to_options(1.0), Err(ThermoError::UnknownSolvent(_))));
    }

    #[test]
    fn test_explicit_concentration_and_spc() {
        let args = parse(&["a.log", "-c", "1.0", "--spc", "TZ", "-s", "h2o"]);
        let options = args.to_options(0.977).unwrap();
        assert!((options.concentration - 1.0).abs() < 1e-12);
        assert!((options.scale_factor - 0.977).abs() < 1e-12);
        assert_eq!(options.solvent, Solvent::H2O);
        assert_eq!(args.spc_mode(), Some(SpcMode::Suffix("TZ".to_string())));
        assert_eq!(args.spc_suffix(), Some("TZ"));

        let args = parse(&["a.log", "--spc", "link"]);
        assert_eq!(args.spc_mode(), Some(SpcMode::Link));
        assert_eq!(args.spc_suffix(), None);
    }
}
