//! # 溶剂自由空间模型
//!
//! 计算 1 L 溶剂中溶质可自由运动的体积（mL/L），用于修正平动熵。
//! 摩尔浓度取文献值，分子体积为 B3LYP/6-31G* 计算值。
//!
//! ## 参考
//! - Shakhnovich, E. I.; Whitesides, G. M. J. Org. Chem. 1998, 63, 3821-3830
//!
//! ## 依赖关系
//! - 被 `thermo/engine.rs` 使用（平动熵的数密度项）
//! - 被 `models/options.rs` 使用（解析命令行溶剂名）

use crate::error::{Result, ThermoError};
use crate::thermo::constants::AVOGADRO_CONSTANT;

use std::fmt;
use std::str::FromStr;

/// 理想气体（无溶剂）时的自由空间 (mL/L)
pub const GAS_PHASE_FREE_SPACE: f64 = 1000.0;

/// 支持的溶剂
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Solvent {
    /// 无溶剂修正（1 atm 理想气体）
    #[default]
    None,
    H2O,
    Toluene,
    Dmf,
    AcOh,
    Chloroform,
}

impl Solvent {
    /// 全部可选溶剂
    pub const ALL: [Solvent; 6] = [
        Solvent::None,
        Solvent::H2O,
        Solvent::Toluene,
        Solvent::Dmf,
        Solvent::AcOh,
        Solvent::Chloroform,
    ];

    /// (摩尔浓度 mol/L, 分子体积 Å³)；`None` 无对应数据
    pub fn properties(&self) -> Option<(f64, f64)> {
        match self {
            Solvent::None => None,
            Solvent::H2O => Some((55.6, 27.944)),
            Solvent::Toluene => Some((9.4, 149.070)),
            Solvent::Dmf => Some((12.9, 77.442)),
            Solvent::AcOh => Some((17.4, 86.10)),
            Solvent::Chloroform => Some((12.5, 97.0)),
        }
    }

    /// 自由空间 (mL/L)
    ///
    /// V_free = 8·((10²⁷/(M·N_A))^⅓ − V^⅓)³，freespace = V_free·M·N_A·10⁻²⁴
    pub fn free_space(&self) -> f64 {
        match self.properties() {
            None => GAS_PHASE_FREE_SPACE,
            Some((molarity, volume)) => {
                let cell = 1e27 / (molarity * AVOGADRO_CONSTANT);
                let v_free = 8.0 * (cell.cbrt() - volume.cbrt()).powi(3);
                v_free * molarity * AVOGADRO_CONSTANT * 1e-24
            }
        }
    }

    /// 是否对平动熵有修正
    pub fn is_corrected(&self) -> bool {
        !matches!(self, Solvent::None)
    }
}

impl fmt::Display for Solvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solvent::None => write!(f, "none"),
            Solvent::H2O => write!(f, "H2O"),
            Solvent::Toluene => write!(f, "toluene"),
            Solvent::Dmf => write!(f, "DMF"),
            Solvent::AcOh => write!(f, "AcOH"),
            Solvent::Chloroform => write!(f, "chloroform"),
        }
    }
}

impl FromStr for Solvent {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self> {
        Solvent::ALL
            .iter()
            .copied()
            .find(|solv| solv.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ThermoError::UnknownSolvent(s.to_string()))
    }
}
