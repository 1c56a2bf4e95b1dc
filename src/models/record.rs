//! # 计算记录数据模型
//!
//! 一个输出文件经提取后得到的原始数值记录，是热化学引擎的唯一输入。
//! 记录创建后不再修改。
//!
//! ## 依赖关系
//! - 被 `parsers/gaussian.rs`, `parsers/orca.rs` 构造
//! - 被 `thermo/engine.rs`, `checks/` 使用

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::time::Duration;

/// 转动温度 (K)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RotationalTemperatures {
    /// 输出中没有转动温度（单原子体系）
    Atomic,
    /// 线性分子，一个转动温度
    Linear(f64),
    /// 只读到两个数值：Gaussian 对线性分子的异常输出
    Ambiguous(f64, f64),
    /// 非线性分子，三个转动温度
    NonLinear(f64, f64, f64),
}

/// 累计 CPU 时间
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CpuTime(pub Duration);

impl CpuTime {
    /// 从 天/时/分/秒/毫秒 构造
    pub fn from_parts(days: u64, hours: u64, minutes: u64, seconds: f64, millis: f64) -> Self {
        let whole = ((days * 24 + hours) * 60 + minutes) * 60;
        let frac = seconds.max(0.0) + millis.max(0.0) / 1000.0;
        CpuTime(Duration::from_secs(whole) + Duration::from_secs_f64(frac))
    }

    /// 拆分为 (天, 时, 分, 秒)
    pub fn components(&self) -> (u64, u64, u64, u64) {
        let total = self.0.as_secs();
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        (days, hours, minutes, seconds)
    }
}

impl Add for CpuTime {
    type Output = CpuTime;

    fn add(self, rhs: CpuTime) -> CpuTime {
        CpuTime(self.0 + rhs.0)
    }
}

impl Sum for CpuTime {
    fn sum<I: Iterator<Item = CpuTime>>(iter: I) -> CpuTime {
        iter.fold(CpuTime::default(), |acc, t| acc + t)
    }
}

impl fmt::Display for CpuTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m, s) = self.components();
        write!(f, "{} days {:>2} hrs {:>2} mins {:>2} secs", d, h, m, s)
    }
}

/// 单个结构的原始计算记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// 结构名称（文件名去扩展名）
    pub name: String,

    /// 电子能量 (Hartree)，取频率计算所在 link 之前最后一个值
    pub scf_energy: Option<f64>,

    /// 整个文件最后一个电子能量（link 单点修正用）
    pub final_energy: Option<f64>,

    /// 实频 (cm⁻¹)，均 > 0
    pub frequencies: Vec<f64>,

    /// 虚频 (cm⁻¹)，均 < 0
    pub imaginary_frequencies: Vec<f64>,

    /// 转动温度，`None` 表示输出中存在但无法读取
    pub rotational_temperatures: Option<RotationalTemperatures>,

    /// 转动对称数
    pub symmetry_number: u32,

    /// 点群为 C*V / D*H
    pub linear: bool,

    /// 自旋多重度
    pub multiplicity: u32,

    /// 分子质量 (amu)
    pub molecular_mass: Option<f64>,

    /// 零点能校正 (Hartree)
    pub zero_point_correction: Option<f64>,

    /// 单点能 (Hartree)，替换 E 但保留热校正
    pub sp_energy: Option<f64>,

    /// 累计 CPU 时间
    pub cpu_time: Option<CpuTime>,
}

impl CalculationRecord {
    pub fn new(name: impl Into<String>) -> Self {
        CalculationRecord {
            name: name.into(),
            scf_energy: None,
            final_energy: None,
            frequencies: Vec::new(),
            imaginary_frequencies: Vec::new(),
            rotational_temperatures: Some(RotationalTemperatures::Atomic),
            symmetry_number: 1,
            linear: false,
            multiplicity: 1,
            molecular_mass: None,
            zero_point_correction: None,
            sp_energy: None,
            cpu_time: None,
        }
    }

    /// 将实频/虚频分拣到对应列表，零频丢弃
    pub fn push_frequency(&mut self, freq: f64) {
        if freq > 0.0 {
            self.frequencies.push(freq);
        } else if freq < 0.0 {
            self.imaginary_frequencies.push(freq);
        }
    }

    /// 附加单点能与单点作业的 CPU 时间
    pub fn with_single_point(mut self, energy: Option<f64>, cpu: Option<CpuTime>) -> Self {
        self.sp_energy = energy;
        self.cpu_time = match (self.cpu_time, cpu) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_frequency_sorts_sign() {
        let mut record = CalculationRecord::new("ts");
        for f in [-350.2, 0.0, 45.1, 1200.0] {
            record.push_frequency(f);
        }
        assert_eq!(record.frequencies, vec![45.1, 1200.0]);
        assert_eq!(record.imaginary_frequencies, vec![-350.2]);
    }

    #[test]
    fn test_cpu_time_rollover() {
        // 23 h 59 min 59.5 s + 0 h 0 min 1.5 s = 1 day 0 h 0 min 1 s
        let a = CpuTime::from_parts(0, 23, 59, 59.5, 0.0);
        let b = CpuTime::from_parts(0, 0, 0, 1.0, 500.0);
        let total: CpuTime = vec![a, b].into_iter().sum();
        assert_eq!(total.components(), (1, 0, 0, 1));
    }

    #[test]
    fn test_single_point_adds_cpu() {
        let mut record = CalculationRecord::new("a");
        record.cpu_time = Some(CpuTime::from_parts(0, 1, 0, 0.0, 0.0));
        let record =
            record.with_single_point(Some(-1.5), Some(CpuTime::from_parts(0, 0, 30, 0.0, 0.0)));
        assert_eq!(record.sp_energy, Some(-1.5));
        assert_eq!(record.cpu_time.unwrap().components(), (0, 1, 30, 0));
    }
}
