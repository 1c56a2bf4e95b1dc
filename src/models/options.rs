//! # 运行参数模型
//!
//! 一次运行共用的不可变参数：温度、浓度、截断频率、缩放因子、
//! 准谐近似方法与溶剂。
//!
//! ## 依赖关系
//! - 被 `cli/run.rs` 构造
//! - 被 `thermo/`, `pes/` 使用

use crate::error::{Result, ThermoError};
use crate::thermo::constants::{one_atm_concentration, J_PER_HARTREE, KCAL_PER_HARTREE};
use crate::thermo::solvent::Solvent;

use std::fmt;
use std::str::FromStr;

/// 准谐振子熵修正方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QhMethod {
    /// RRHO 与自由转子熵之间的阻尼插值
    #[default]
    Grimme,
    /// 低频模式上移至截断频率
    Truhlar,
}

impl QhMethod {
    /// 文献引用
    pub fn reference(&self) -> &'static str {
        match self {
            QhMethod::Grimme => "Grimme, S. Chem. Eur. J. 2012, 18, 9955-9964",
            QhMethod::Truhlar => {
                "Ribeiro, R. F.; Marenich, A. V.; Cramer, C. J.; Truhlar, D. G. J. Phys. Chem. B 2011, 115, 14556-14562"
            }
        }
    }

    /// 方法说明
    pub fn description(&self) -> &'static str {
        match self {
            QhMethod::Grimme => "Using a mixture of RRHO and Free-rotor vibrational entropies",
            QhMethod::Truhlar => {
                "Using an RRHO treatment where low frequencies are adjusted to the cut-off value"
            }
        }
    }
}

impl fmt::Display for QhMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QhMethod::Grimme => write!(f, "grimme"),
            QhMethod::Truhlar => write!(f, "truhlar"),
        }
    }
}

impl FromStr for QhMethod {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "grimme" => Ok(QhMethod::Grimme),
            "truhlar" => Ok(QhMethod::Truhlar),
            _ => Err(ThermoError::UnknownQhMethod(s.to_string())),
        }
    }
}

/// 相对能量显示单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyUnit {
    #[default]
    KcalPerMol,
    KjPerMol,
}

impl EnergyUnit {
    /// Hartree -> 显示单位
    pub fn from_hartree(&self, value: f64) -> f64 {
        match self {
            EnergyUnit::KcalPerMol => value * KCAL_PER_HARTREE,
            EnergyUnit::KjPerMol => value * J_PER_HARTREE / 1000.0,
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyUnit::KcalPerMol => write!(f, "kcal/mol"),
            EnergyUnit::KjPerMol => write!(f, "kJ/mol"),
        }
    }
}

impl FromStr for EnergyUnit {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "kcal/mol" | "kcal" => Ok(EnergyUnit::KcalPerMol),
            "kj/mol" | "kj" => Ok(EnergyUnit::KjPerMol),
            other => Err(ThermoError::InvalidArgument(format!(
                "unknown energy unit '{}'",
                other
            ))),
        }
    }
}

/// 一次运行的热化学参数
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// 温度 (K)
    pub temperature: f64,
    /// 浓度 (mol/L)
    pub concentration: f64,
    /// 截断频率 (cm⁻¹)
    pub freq_cutoff: f64,
    /// 振动频率缩放因子
    pub scale_factor: f64,
    /// 准谐近似方法
    pub qh_method: QhMethod,
    /// 溶剂（平动熵自由空间修正）
    pub solvent: Solvent,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions::at_temperature(298.15)
    }
}

impl RunOptions {
    /// 指定温度，浓度取该温度下 1 atm
    pub fn at_temperature(temperature: f64) -> Self {
        RunOptions {
            temperature,
            concentration: one_atm_concentration(temperature),
            freq_cutoff: 100.0,
            scale_factor: 1.0,
            qh_method: QhMethod::Grimme,
            solvent: Solvent::None,
        }
    }

    /// 检查参数取值范围
    pub fn validate(self) -> Result<Self> {
        if !(self.temperature > 0.0) {
            return Err(ThermoError::InvalidArgument(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        if !(self.concentration > 0.0) {
            return Err(ThermoError::InvalidArgument(format!(
                "concentration must be positive, got {}",
                self.concentration
            )));
        }
        if !(self.freq_cutoff >= 0.0) {
            return Err(ThermoError::InvalidArgument(format!(
                "frequency cut-off must not be negative, got {}",
                self.freq_cutoff
            )));
        }
        if !(self.scale_factor > 0.0) {
            return Err(ThermoError::InvalidArgument(format!(
                "scale factor must be positive, got {}",
                self.scale_factor
            )));
        }
        Ok(self)
    }
}
