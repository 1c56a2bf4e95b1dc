//! # 计算一致性检查模块
//!
//! 对一批输出文件做启发式检查：重复构象、线性分子频率数目、
//! 程序版本 / 溶剂化模型 / 理论级别一致性，以及频率与单点几何是否一致。
//! 检查只返回结论，不直接打印。
//!
//! ## 依赖关系
//! - 被 `commands/thermo.rs` 调用（`--check`）
//! - 使用 `parsers/` 的元数据与几何、`models/` 的热化学结果
//! - 子模块: duplicates, linear, consistency

pub mod consistency;
pub mod duplicates;
pub mod linear;

use crate::models::ThermoResult;
use crate::parsers::ParsedOutput;

/// 单项检查结论
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// 通过
    Pass(String),
    /// 需要注意
    Caution(String),
}

impl CheckOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass(_))
    }

    pub fn message(&self) -> &str {
        match self {
            CheckOutcome::Pass(m) | CheckOutcome::Caution(m) => m,
        }
    }
}

/// 一个结构参与检查所需的全部信息
#[derive(Debug, Clone, Copy)]
pub struct CheckSubject<'a> {
    pub parsed: &'a ParsedOutput,
    pub result: &'a ThermoResult,
}

impl<'a> CheckSubject<'a> {
    pub fn name(&self) -> &str {
        &self.parsed.record.name
    }
}

/// 频率文件的全部检查
pub fn run_frequency_checks(subjects: &[CheckSubject<'_>], temperature: f64) -> Vec<CheckOutcome> {
    let parsed: Vec<&ParsedOutput> = subjects.iter().map(|s| s.parsed).collect();
    vec![
        consistency::check_program_versions(&parsed),
        consistency::check_solvation_models(&parsed),
        consistency::check_levels_of_theory(&parsed),
        duplicates::check_duplicates(subjects, temperature),
        linear::check_linear_molecules(subjects),
    ]
}

/// 单点文件的检查；`pairs` 为 (频率文件, 单点文件)
pub fn run_single_point_checks(pairs: &[(&ParsedOutput, &ParsedOutput)]) -> Vec<CheckOutcome> {
    let spc: Vec<&ParsedOutput> = pairs.iter().map(|(_, s)| *s).collect();
    vec![
        consistency::check_program_versions(&spc),
        consistency::check_solvation_models(&spc),
        consistency::check_levels_of_theory(&spc),
        consistency::check_geometries(pairs),
    ]
}


#[cfg(test)]
mod tests {
    use super::fixtures::{parsed, result};
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        assert!(CheckOutcome::Pass("fine".into()).is_pass());
        assert_eq!(CheckOutcome::Caution("bad".into()).message(), "bad");
    }

    #[test]
    fn test_frequency_checks_cover_all_categories() {
        let water = parsed("water", &[("O", [0.0, 0.0, 0.1]), ("H", [0.0, 0.76, -0.47]), ("H", [0.0, -0.76, -0.47])], 3);
        let res = result("water", -76.4, 0.021, 7.2e-5, 7.2e-5);
        let subjects = [CheckSubject { parsed: &water, result: &res }];
        let outcomes = run_frequency_checks(&subjects, 298.15);
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes.iter().all(CheckOutcome::is_pass));
    }
}
