//! # 热化学结果数据模型
//!
//! `ThermoResult` 是引擎对单个结构的计算结果；缺少必要输入时为部分结果
//! （热力学字段为 `None`），并附带警告。`EnergyProfile` 是完整的标量集合，
//! 供 Boltzmann 平均与 PES 相对能量计算使用。
//!
//! ## 依赖关系
//! - 被 `thermo/engine.rs` 构造
//! - 被 `thermo/boltzmann.rs`, `pes/`, `commands/`, `checks/` 使用

use crate::models::record::CpuTime;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// 可恢复的计算异常
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThermoWarning {
    /// 缺少零点能校正、转动温度、能量或分子质量
    IncompleteRecord,
    /// 转动温度只读到两个值，线性分子计算可能无效
    LinearGeometryAmbiguous,
}

impl fmt::Display for ThermoWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThermoWarning::IncompleteRecord => {
                write!(f, "Couldn't find frequency information")
            }
            ThermoWarning::LinearGeometryAmbiguous => {
                write!(f, "Potential invalid calculation of linear molecule from Gaussian")
            }
        }
    }
}

/// 单个结构的热化学结果（单位 Hartree 与 Hartree/K）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermoResult {
    /// 结构名称
    pub name: String,

    /// 频率计算的电子能量
    pub scf_energy: Option<f64>,

    /// 单点能
    pub sp_energy: Option<f64>,

    /// 零点能
    pub zpe: Option<f64>,

    /// 焓 H
    pub enthalpy: Option<f64>,

    /// 谐振子熵 S
    pub entropy: Option<f64>,

    /// 准谐振子熵 qh-S
    pub qh_entropy: Option<f64>,

    /// G = H - T·S
    pub gibbs: Option<f64>,

    /// qh-G = H - T·qh-S
    pub qh_gibbs: Option<f64>,

    /// 实频 (cm⁻¹)
    pub frequencies: Vec<f64>,

    /// 过滤后的虚频 (cm⁻¹)
    pub imaginary_frequencies: Vec<f64>,

    /// CPU 时间
    pub cpu_time: Option<CpuTime>,

    /// 警告
    pub warnings: Vec<ThermoWarning>,
}

impl ThermoResult {
    /// 创建不含热力学量的部分结果
    pub fn partial(name: impl Into<String>) -> Self {
        ThermoResult {
            name: name.into(),
            scf_energy: None,
            sp_energy: None,
            zpe: None,
            enthalpy: None,
            entropy: None,
            qh_entropy: None,
            gibbs: None,
            qh_gibbs: None,
            frequencies: Vec::new(),
            imaginary_frequencies: Vec::new(),
            cpu_time: None,
            warnings: Vec::new(),
        }
    }

    /// 热力学量是否齐全
    pub fn is_complete(&self) -> bool {
        self.profile().is_some()
    }

    /// 是否带有线性分子警告
    pub fn linear_warning(&self) -> bool {
        self.warnings
            .contains(&ThermoWarning::LinearGeometryAmbiguous)
    }

    /// 完整结果的标量集合
    pub fn profile(&self) -> Option<EnergyProfile> {
        Some(EnergyProfile {
            energy: self.scf_energy?,
            sp_energy: self.sp_energy,
            zpe: self.zpe?,
            enthalpy: self.enthalpy?,
            entropy: self.entropy?,
            qh_entropy: self.qh_entropy?,
            gibbs: self.gibbs?,
            qh_gibbs: self.qh_gibbs?,
        })
    }
}

/// 完整的热化学标量集合
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub energy: f64,
    pub sp_energy: Option<f64>,
    pub zpe: f64,
    pub enthalpy: f64,
    pub entropy: f64,
    pub qh_entropy: f64,
    pub gibbs: f64,
    pub qh_gibbs: f64,
}

impl EnergyProfile {
    /// 全零（求和起点）
    pub fn zero() -> Self {
        EnergyProfile {
            energy: 0.0,
            sp_energy: Some(0.0),
            zpe: 0.0,
            enthalpy: 0.0,
            entropy: 0.0,
            qh_entropy: 0.0,
            gibbs: 0.0,
            qh_gibbs: 0.0,
        }
    }
}

fn combine(a: Option<f64>, b: Option<f64>, op: impl Fn(f64, f64) -> f64) -> Option<f64> {
    Some(op(a?, b?))
}

impl Add for EnergyProfile {
    type Output = EnergyProfile;

    fn add(self, rhs: EnergyProfile) -> EnergyProfile {
        EnergyProfile {
            energy: self.energy + rhs.energy,
            sp_energy: combine(self.sp_energy, rhs.sp_energy, |a, b| a + b),
            zpe: self.zpe + rhs.zpe,
            enthalpy: self.enthalpy + rhs.enthalpy,
            entropy: self.entropy + rhs.entropy,
            qh_entropy: self.qh_entropy + rhs.qh_entropy,
            gibbs: self.gibbs + rhs.gibbs,
            qh_gibbs: self.qh_gibbs + rhs.qh_gibbs,
        }
    }
}

impl Sub for EnergyProfile {
    type Output = EnergyProfile;

    fn sub(self, rhs: EnergyProfile) -> EnergyProfile {
        EnergyProfile {
            energy: self.energy - rhs.energy,
            sp_energy: combine(self.sp_energy, rhs.sp_energy, |a, b| a - b),
            zpe: self.zpe - rhs.zpe,
            enthalpy: self.enthalpy - rhs.enthalpy,
            entropy: self.entropy - rhs.entropy,
            qh_entropy: self.qh_entropy - rhs.qh_entropy,
            gibbs: self.gibbs - rhs.gibbs,
            qh_gibbs: self.qh_gibbs - rhs.qh_gibbs,
        }
    }
}

impl Mul<f64> for EnergyProfile {
    type Output = EnergyProfile;

    fn mul(self, w: f64) -> EnergyProfile {
        EnergyProfile {
            energy: self.energy * w,
            sp_energy: self.sp_energy.map(|e| e * w),
            zpe: self.zpe * w,
            enthalpy: self.enthalpy * w,
            entropy: self.entropy * w,
            qh_entropy: self.qh_entropy * w,
            gibbs: self.gibbs * w,
            qh_gibbs: self.qh_gibbs * w,
        }
    }
}

impl std::iter::Sum for EnergyProfile {
    fn sum<I: Iterator<Item = EnergyProfile>>(iter: I) -> EnergyProfile {
        iter.fold(EnergyProfile::zero(), |acc, p| acc + p)
    }
}
