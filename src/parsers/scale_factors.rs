//! # 振动缩放因子表
//!
//! 从 CSV 读取 理论级别 -> ZPE 缩放因子 的对照表，列为 `level,zpe_fac,reference`。
//! 查找时忽略大小写，并允许表中级别去掉连字符后匹配（如 `B3LYP/6-31G(d)` 与 `B3LYP/631G(d)`）。
//!
//! ## 依赖关系
//! - 被 `commands/pipeline.rs` 使用
//! - 使用 `csv` + `serde` 反序列化

use crate::error::{Result, ThermoError};

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// 表中一行
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScaleFactorEntry {
    pub level: String,
    pub zpe_fac: f64,
    #[serde(default)]
    pub reference: String,
}

/// 缩放因子表
#[derive(Debug, Clone, Default)]
pub struct ScaleFactorTable {
    entries: Vec<ScaleFactorEntry>,
}

impl ScaleFactorTable {
    /// 从文件读取
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| ThermoError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_reader(file)
    }

    /// 从任意 reader 读取（首行为表头）
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let entries = rdr
            .deserialize::<ScaleFactorEntry>()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
        Ok(ScaleFactorTable { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 查找理论级别对应的条目
    pub fn lookup(&self, level_of_theory: &str) -> Option<&ScaleFactorEntry> {
        let wanted = level_of_theory.to_uppercase();
        self.entries.iter().find(|entry| {
            let level = entry.level.to_uppercase();
            level == wanted || level.replace('-', "") == wanted
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "level,zpe_fac,reference
B3LYP/6-31G(d),0.977,Truhlar 2010
M06-2X/def2TZVP,0.970,Truhlar 2010
";

    #[test]
    fn test_lookup_case_insensitive() {
        let table = ScaleFactorTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let entry = table.lookup("b3lyp/6-31g(d)").unwrap();
        assert!((entry.zpe_fac - 0.977).abs() < 1e-12);
        assert_eq!(entry.reference, "Truhlar 2010");
    }

    #[test]
    fn test_lookup_ignores_hyphens_in_table() {
        let table = ScaleFactorTable::from_reader(TABLE.as_bytes()).unwrap();
        assert!(table.lookup("M062X/def2TZVP").is_some());
        assert!(table.lookup("PBE0/def2SVP").is_none());
    }

    #[test]
    fn test_malformed_row_is_error() {
        let bad = "level,zpe_fac,reference\nB3LYP/6-31G(d),abc,x\n";
        assert!(matches!(
            ScaleFactorTable::from_reader(bad.as_bytes()),
            Err(ThermoError::CsvError(_))
        ));
    }
}
