//! # 一致性检查
//!
//! 同一批计算应使用相同的程序版本、溶剂化模型与理论级别；
//! 单点能文件的几何应与对应频率文件一致。
//!
//! ## 依赖关系
//! - 被 `checks/mod.rs` 调用
//! - 使用 `parsers/` 的 OutputMeta 与 Geometry

use crate::checks::CheckOutcome;
use crate::parsers::{Geometry, ParsedOutput};

use std::collections::BTreeSet;

/// 几何比较的坐标容差 (Å)
pub const GEOMETRY_MATCH_TOLERANCE: f64 = 1e-6;

const UNKNOWN: &str = "unknown";

/// 按值分组，保持首次出现的顺序
fn group_by<F>(outputs: &[&ParsedOutput], key: F, same: impl Fn(&str, &str) -> bool) -> Vec<(String, Vec<String>)>
where
    F: Fn(&ParsedOutput) -> String,
{
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for output in outputs {
        let value = key(output);
        let name = output.record.name.clone();
        match groups.iter_mut().find(|(v, _)| same(v, &value)) {
            Some((_, names)) => names.push(name),
            None => groups.push((value, vec![name])),
        }
    }
    groups
}

fn report(groups: Vec<(String, Vec<String>)>, what: &str) -> CheckOutcome {
    match groups.as_slice() {
        [] => CheckOutcome::Pass(format!("No {} to compare", what)),
        [(value, _)] => CheckOutcome::Pass(format!("Using {} in all the calculations", value)),
        _ => {
            let listed: Vec<String> = groups
                .iter()
                .map(|(value, names)| format!("{} ({})", value, names.join(", ")))
                .collect();
            CheckOutcome::Caution(format!("CAUTION: different {} found - {}", what, listed.join(", ")))
        }
    }
}

pub fn check_program_versions(outputs: &[&ParsedOutput]) -> CheckOutcome {
    let groups = group_by(
        outputs,
        |o| o.meta.program_version.clone().unwrap_or_else(|| format!("{} (unknown version)", o.meta.dialect)),
        |a, b| a == b,
    );
    report(groups, "programs or versions")
}

/// 溶剂化关键字拆成集合后比较，`scrf=(smd,solvent=water)` 与 `scrf=(solvent=water,smd)` 视为相同
fn solvation_tokens(model: &str) -> BTreeSet<String> {
    model
        .replace('(', ",")
        .replace(')', "")
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn check_solvation_models(outputs: &[&ParsedOutput]) -> CheckOutcome {
    let groups = group_by(
        outputs,
        |o| o.meta.solvation_model.clone(),
        |a, b| solvation_tokens(a) == solvation_tokens(b),
    );
    report(groups, "solvation models")
}

pub fn check_levels_of_theory(outputs: &[&ParsedOutput]) -> CheckOutcome {
    let groups = group_by(
        outputs,
        |o| o.meta.level_of_theory.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        |a, b| a.eq_ignore_ascii_case(b),
    );
    report(groups, "levels of theory")
}

/// 两个几何是否逐原子一致
pub fn geometries_match(a: &Geometry, b: &Geometry) -> bool {
    a.len() == b.len()
        && a.atoms.iter().zip(b.atoms.iter()).all(|(x, y)| {
            x.element == y.element
                && x.position
                    .iter()
                    .zip(y.position.iter())
                    .all(|(p, q)| (p - q).abs() <= GEOMETRY_MATCH_TOLERANCE)
        })
}

/// 频率文件与单点文件的几何比较
pub fn check_geometries(pairs: &[(&ParsedOutput, &ParsedOutput)]) -> CheckOutcome {
    let mismatched: Vec<String> = pairs
        .iter()
        .filter(|(freq, spc)| match (&freq.geometry, &spc.geometry) {
            (Some(a), Some(b)) if !a.is_empty() => !geometries_match(a, b),
            _ => true,
        })
        .map(|(freq, spc)| format!("{} / {}", freq.record.name, spc.record.name))
        .collect();

    if mismatched.is_empty() {
        CheckOutcome::Pass("Geometries of all input files match the single-point calculations".to_string())
    } else {
        CheckOutcome::Caution(format!(
            "CAUTION: geometries of the frequency and single-point calculations do not match - {}",
            mismatched.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures::parsed;

    #[test]
    fn test_same_version_passes() {
        let a = parsed("a", &[], 0);
        let b = parsed("b", &[], 0);
        let outcome = check_program_versions(&[&a, &b]);
        assert_eq!(
            outcome,
            CheckOutcome::Pass("Using Gaussian 16 Revision A.03 in all the calculations".to_string())
        );
    }

    #[test]
    fn test_different_levels_listed_by_group() {
        let a = parsed("a", &[], 0);
        let b = parsed("b", &[], 0);
        let mut c = parsed("c", &[], 0);
        c.meta.level_of_theory = Some("M062X/def2TZVP".to_string());
        let outcome = check_levels_of_theory(&[&a, &b, &c]);
        assert!(!outcome.is_pass());
        assert_eq!(
            outcome.message(),
            "CAUTION: different levels of theory found - B3LYP/6-31G(d) (a, b), M062X/def2TZVP (c)"
        );
    }

    #[test]
    fn test_solvation_keyword_order_ignored() {
        let mut a = parsed("a", &[], 0);
        let mut b = parsed("b", &[], 0);
        a.meta.solvation_model = "scrf=(smd,solvent=water)".to_string();
        b.meta.solvation_model = "scrf=(solvent=water,smd)".to_string();
        assert!(check_solvation_models(&[&a, &b]).is_pass());

        let c = parsed("c", &[], 0);
        assert!(!check_solvation_models(&[&a, &b, &c]).is_pass());
    }

    #[test]
    fn test_geometry_match() {
        let atoms = [("O", [0.0, 0.0, 0.119]), ("H", [0.0, 0.763, -0.477])];
        let freq = parsed("w", &atoms, 0);
        let spc = parsed("w_TZ", &atoms, 0);
        assert!(check_geometries(&[(&freq, &spc)]).is_pass());

        let moved = parsed("w_TZ", &[("O", [0.0, 0.0, 0.119]), ("H", [0.0, 0.763, -0.470])], 0);
        let outcome = check_geometries(&[(&freq, &moved)]);
        assert!(!outcome.is_pass());
        assert!(outcome.message().contains("w / w_TZ"));
    }
}
