//! # scan 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use crate::cli::run::RunArgs;
use crate::error::{Result, ThermoError};

use clap::Args;

/// 未给出步长时的默认步长 (K)
pub const DEFAULT_TEMPERATURE_STEP: f64 = 10.0;

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Temperature interval 'initial,final[,step]' in K
    #[arg(long = "ti")]
    pub interval: String,
}

impl ScanArgs {
    /// 解析温度区间，包含两端
    pub fn temperatures(&self) -> Result<Vec<f64>> {
        temperature_range(&self.interval)
    }
}

/// "200,400,50" -> [200, 250, 300, 350, 400]
pub fn temperature_range(interval: &str) -> Result<Vec<f64>> {
    let invalid = |reason: &str| ThermoError::InvalidInterval(format!("'{}': {}", interval, reason));

    let values = interval
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| invalid("expected numbers 'initial,final[,step]'"))?;

    let (start, end, step) = match values.as_slice() {
        [start, end] => (*start, *end, DEFAULT_TEMPERATURE_STEP),
        [start, end, step] => (*start, *end, *step),
        _ => return Err(invalid("expected 'initial,final[,step]'")),
    };

    if !(start > 0.0) || !(end >= start) {
        return Err(invalid("temperatures must be positive and in increasing order"));
    }
    if !(step > 0.0) {
        return Err(invalid("step must be positive"));
    }

    let count = ((end - start) / step + 1e-9).floor() as usize;
    Ok((0..=count).map(|i| start + step * i as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_with_step() {
        let temps = temperature_range("200,400,50").unwrap();
        assert_eq!(temps, vec![200.0, 250.0, 300.0, 350.0, 400.0]);
    }

    #[test]
    fn test_default_step() {
        let temps = temperature_range("300, 330").unwrap();
        assert_eq!(temps.len(), 4);
        assert!((temps[3] - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_not_on_grid() {
        let temps = temperature_range("300,325,10").unwrap();
        assert_eq!(temps, vec![300.0, 310.0, 320.0]);
    }

    #[test]
    fn test_invalid_intervals() {
        for bad in ["300", "400,300", "300,400,0", "0,100", "a,b"] {
            assert!(matches!(temperature_range(bad), Err(ThermoError::InvalidInterval(_))), "{}", bad);
        }
    }
}
