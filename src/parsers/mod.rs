//! # 解析器模块
//!
//! 量子化学输出文件的数值提取，以及 PES 描述文件和缩放因子表的读取。
//! 每种输出方言是一个纯函数：文本 -> `ParsedOutput`，不保留扫描状态。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: gaussian, orca, pes_file, scale_factors

pub mod gaussian;
pub mod orca;
pub mod pes_file;
pub mod scale_factors;

use crate::error::{Result, ThermoError};
use crate::models::CalculationRecord;

use std::fmt;
use std::path::Path;

/// 输出文件方言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Gaussian,
    Orca,
}

impl Dialect {
    /// 根据程序标识判断方言，以先出现者为准
    pub fn detect(text: &str) -> Option<Dialect> {
        for line in text.lines() {
            if line.contains("Gaussian") {
                return Some(Dialect::Gaussian);
            }
            if line.contains("* O   R   C   A *") {
                return Some(Dialect::Orca);
            }
        }
        None
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Gaussian => write!(f, "Gaussian"),
            Dialect::Orca => write!(f, "ORCA"),
        }
    }
}

/// 与热化学无关、但一致性检查需要的元数据
#[derive(Debug, Clone, PartialEq)]
pub struct OutputMeta {
    pub dialect: Dialect,
    /// 如 "Gaussian 16 Revision A.03"
    pub program_version: Option<String>,
    /// 如 "B3LYP/6-31G(d)"
    pub level_of_theory: Option<String>,
    /// 如 "gas phase", "scrf=(smd,solvent=water)"
    pub solvation_model: String,
}

impl OutputMeta {
    pub fn new(dialect: Dialect) -> Self {
        OutputMeta {
            dialect,
            program_version: None,
            level_of_theory: None,
            solvation_model: GAS_PHASE.to_string(),
        }
    }
}

pub const GAS_PHASE: &str = "gas phase";

/// 原子：元素符号与笛卡尔坐标 (Å)
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: String,
    pub position: [f64; 3],
}

/// 最后一次输出的分子几何
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub atoms: Vec<Atom>,
}

impl Geometry {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// 按原子顺序拼接的元素符号，如 "HCCH"
    pub fn element_sequence(&self) -> String {
        self.atoms.iter().map(|a| a.element.as_str()).collect()
    }
}

/// 一个输出文件的提取结果
#[derive(Debug, Clone)]
pub struct ParsedOutput {
    pub record: CalculationRecord,
    pub meta: OutputMeta,
    pub geometry: Option<Geometry>,
}

/// 从文本提取，`name` 为结构名称
pub fn parse_output(text: &str, name: &str) -> Result<ParsedOutput> {
    match Dialect::detect(text) {
        Some(Dialect::Gaussian) => Ok(gaussian::parse(text, name)),
        Some(Dialect::Orca) => Ok(orca::parse(text, name)),
        None => Err(ThermoError::UnsupportedFormat(format!(
            "{} is neither a Gaussian nor an ORCA output",
            name
        ))),
    }
}

/// 读取文件并提取，结构名称取文件名去扩展名
pub fn parse_output_file(path: &Path) -> Result<ParsedOutput> {
    let text = std::fs::read_to_string(path).map_err(|e| ThermoError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_output(&text, &structure_name(path))
}

/// 文件名去扩展名
pub fn structure_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

const ELEMENTS: [&str; 119] = [
    "", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 原子序数 -> 元素符号，超出范围返回 "XX"
pub fn element_symbol(atomic_number: usize) -> &'static str {
    match ELEMENTS.get(atomic_number) {
        Some(s) if !s.is_empty() => s,
        _ => "XX",
    }
}

// ─────────────────────────────────────────────────────────────
// 行内数值提取
// ─────────────────────────────────────────────────────────────

/// 第 `index` 个空白分隔字段解析为 f64（支持 Fortran 的 D 指数）
pub(crate) fn field_f64(line: &str, index: usize) -> Option<f64> {
    line.split_whitespace()
        .nth(index)?
        .replace(['D', 'd'], "E")
        .parse()
        .ok()
}

/// 指定标记之后的第一个数字
pub(crate) fn number_after(line: &str, marker: &str) -> Option<f64> {
    let pos = line.find(marker)?;
    line[pos + marker.len()..]
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}
