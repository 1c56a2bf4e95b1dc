//! # PES 数据模型
//!
//! 反应路径描述（物种、格式、能量零点、路径）与组装后的相对能量表。
//!
//! ## 依赖关系
//! - 被 `parsers/pes_file.rs` 构造
//! - 被 `pes/assembler.rs`, `pes/plot.rs`, `commands/pes.rs` 使用

use crate::models::EnergyUnit;

use serde::Serialize;
use std::fmt;

/// 布居显示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoltzmannDisplay {
    #[default]
    Off,
    On,
    /// 布居并给出两点路径的 ee
    Ee,
}

impl BoltzmannDisplay {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, BoltzmannDisplay::Off)
    }
}

/// FORMAT 段
#[derive(Debug, Clone, PartialEq)]
pub struct PesFormat {
    /// 小数位数
    pub decimals: usize,
    pub units: EnergyUnit,
    pub boltz: BoltzmannDisplay,
}

impl Default for PesFormat {
    fn default() -> Self {
        PesFormat {
            decimals: 2,
            units: EnergyUnit::KcalPerMol,
            boltz: BoltzmannDisplay::Off,
        }
    }
}

/// 物种定义：名称 -> 文件名（或带 `*` 的构象组）
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesDefinition {
    pub name: String,
    pub pattern: String,
}

impl SpeciesDefinition {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        SpeciesDefinition {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// 是否为构象组
    pub fn is_group(&self) -> bool {
        self.pattern.contains('*')
    }

    /// 文件名是否属于该物种
    pub fn matches(&self, stem: &str) -> bool {
        if self.is_group() {
            stem.contains(self.pattern.trim_matches('*'))
        } else {
            stem == self.pattern
        }
    }
}

/// 路径上的一个点，如 `A+B`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PesPoint {
    pub label: String,
    pub fragments: Vec<String>,
}

impl PesPoint {
    /// 按 `+` 拆分片段，忽略空白
    pub fn parse(label: &str) -> Self {
        let compact: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        let fragments = compact
            .split('+')
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        PesPoint {
            label: label.trim().to_string(),
            fragments,
        }
    }
}

/// 一条反应路径
#[derive(Debug, Clone, PartialEq)]
pub struct Pathway {
    pub name: String,
    pub points: Vec<PesPoint>,
}

/// 解析后的 PES 描述
#[derive(Debug, Clone, PartialEq)]
pub struct PesSpec {
    pub species: Vec<SpeciesDefinition>,
    pub format: PesFormat,
    pub zero: PesPoint,
    pub pathways: Vec<Pathway>,
}


// ─────────────────────────────────────────────────────────────
// 组装结果
// ─────────────────────────────────────────────────────────────

/// 相对能量（显示单位）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativeEnergies {
    /// 只有所有片段都有单点能时才存在
    pub sp_energy: Option<f64>,
    pub energy: f64,
    pub zpe: f64,
    pub enthalpy: f64,
    /// T·ΔS
    pub ts: f64,
    /// T·qh-ΔS
    pub qh_ts: f64,
    pub gibbs: f64,
    pub qh_gibbs: f64,
}

/// 各能量量的布居百分比（或 ee）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Populations {
    pub energy: f64,
    pub enthalpy: f64,
    pub gibbs: f64,
    pub qh_gibbs: f64,
}

impl Populations {
    pub fn values(&self) -> [f64; 4] {
        [self.energy, self.enthalpy, self.gibbs, self.qh_gibbs]
    }
}

/// 表中一行
#[derive(Debug, Clone, PartialEq)]
pub struct PesRow {
    pub label: String,
    pub relative: RelativeEnergies,
    pub population: Option<Populations>,
}

/// 一条路径的相对能量表
#[derive(Debug, Clone, PartialEq)]
pub struct PathwayTable {
    pub name: String,
    pub rows: Vec<PesRow>,
    pub ee: Option<Populations>,
}

/// 组装过程中的可恢复问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PesWarning {
    /// SPECIES 中的文件没有可用的热化学数据
    SpeciesUnavailable { species: String, pattern: String },
    /// 构象组中结果不完整的成员，不参与 Boltzmann 平均
    IncompleteConformer { species: String, structure: String },
    /// 路径上的点引用了不可用的结构，该点被跳过
    MissingConformerData {
        pathway: String,
        point: String,
        structure: String,
    },
}

impl fmt::Display for PesWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PesWarning::SpeciesUnavailable { species, pattern } => write!(
                f,
                "{} ({}) is specified but no thermochemistry data found",
                pattern, species
            ),
            PesWarning::IncompleteConformer { species, structure } => write!(
                f,
                "Conformer {} of {} has incomplete thermochemistry data; excluded from the Boltzmann average",
                structure, species
            ),
            PesWarning::MissingConformerData {
                pathway,
                point,
                structure,
            } => write!(
                f,
                "Structure {} in point '{}' of {} has no thermochemistry data; point skipped",
                structure, point, pathway
            ),
        }
    }
}

/// 完整的 PES 相对能量表
#[derive(Debug, Clone, PartialEq)]
pub struct PesTable {
    pub units: EnergyUnit,
    pub decimals: usize,
    pub temperature: f64,
    pub pathways: Vec<PathwayTable>,
    pub warnings: Vec<PesWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_parse() {
        let p = PesPoint::parse(" Int-I + Ph ");
        assert_eq!(p.label, "Int-I + Ph");
        assert_eq!(p.fragments, vec!["Int-I", "Ph"]);
    }

    #[test]
    fn test_species_matching() {
        let single = SpeciesDefinition::new("A", "ts_a");
        assert!(single.matches("ts_a"));
        assert!(!single.matches("ts_a_conf2"));

        let group = SpeciesDefinition::new("TS", "ts_a*");
        assert!(group.is_group());
        assert!(group.matches("ts_a_conf2"));
        assert!(group.matches("ts_a"));
        assert!(!group.matches("ts_b"));
    }
}
