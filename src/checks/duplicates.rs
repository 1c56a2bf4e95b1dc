//! # 重复构象检查
//!
//! 两个结构的 E、ZPE、T·S、T·qh-S 均落在同一绝对窗口内时，
//! 视为可能重复（或对映构象）。E 取文件中最后一个电子能量。
//!
//! ## 依赖关系
//! - 被 `checks/mod.rs` 调用

use crate::checks::{CheckOutcome, CheckSubject};

/// 判定重复的绝对窗口 (Hartree)
pub const DUPLICATE_TOLERANCE_HARTREE: f64 = 0.00016;

/// 参与比较的四个量
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fingerprint {
    energy: f64,
    zpe: f64,
    ts: f64,
    qh_ts: f64,
}

impl Fingerprint {
    fn of(subject: &CheckSubject<'_>, temperature: f64) -> Option<Self> {
        let record = &subject.parsed.record;
        let result = subject.result;
        Some(Fingerprint {
            energy: record.final_energy.or(record.scf_energy)?,
            zpe: result.zpe?,
            ts: temperature * result.entropy?,
            qh_ts: temperature * result.qh_entropy?,
        })
    }

    fn close_to(&self, other: &Fingerprint) -> bool {
        [
            (self.energy, other.energy),
            (self.zpe, other.zpe),
            (self.ts, other.ts),
            (self.qh_ts, other.qh_ts),
        ]
        .iter()
        .all(|(a, b)| (a - b).abs() <= DUPLICATE_TOLERANCE_HARTREE)
    }
}

/// 所有可能重复的结构对，按输入顺序
pub fn find_duplicates(subjects: &[CheckSubject<'_>], temperature: f64) -> Vec<(String, String)> {
    let prints: Vec<(&str, Fingerprint)> = subjects
        .iter()
        .filter_map(|s| Fingerprint::of(s, temperature).map(|f| (s.name(), f)))
        .collect();

    let mut pairs = Vec::new();
    for (i, (name_i, fp_i)) in prints.iter().enumerate() {
        for (name_j, fp_j) in &prints[i + 1..] {
            if fp_i.close_to(fp_j) {
                pairs.push((name_i.to_string(), name_j.to_string()));
            }
        }
    }
    pairs
}

pub fn check_duplicates(subjects: &[CheckSubject<'_>], temperature: f64) -> CheckOutcome {
    let pairs = find_duplicates(subjects, temperature);
    if pairs.is_empty() {
        return CheckOutcome::Pass("No potential duplicates or enantiomeric conformations found".to_string());
    }
    let listed: Vec<String> = pairs.iter().map(|(a, b)| format!("({}, {})", a, b)).collect();
    CheckOutcome::Caution(format!(
        "CAUTION: potential duplicates or enantiomeric conformations found (based on E, ZPE, T.S and T.qh-S within {} Hartree) - {}",
        DUPLICATE_TOLERANCE_HARTREE,
        listed.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures::{parsed, result};

    fn subjects_for(values: &[(&str, f64, f64)]) -> Vec<(crate::parsers::ParsedOutput, crate::models::ThermoResult)> {
        values
            .iter()
            .map(|&(name, e, zpe)| {
                let mut p = parsed(name, &[], 3);
                p.record.final_energy = Some(e);
                (p, result(name, e, zpe, 1.0e-4, 0.9e-4))
            })
            .collect()
    }

    #[test]
    fn test_close_pair_is_duplicate() {
        let data = subjects_for(&[("a", -100.0, 0.05), ("b", -100.0001, 0.05005), ("c", -100.01, 0.05)]);
        let subjects: Vec<CheckSubject> = data
            .iter()
            .map(|(p, r)| CheckSubject { parsed: p, result: r })
            .collect();
        let pairs = find_duplicates(&subjects, 298.15);
        assert_eq!(pairs, vec![("a".to_string(), "b".to_string())]);
        assert!(!check_duplicates(&subjects, 298.15).is_pass());
    }

    #[test]
    fn test_window_is_absolute_on_each_quantity() {
        // 能量一致，ZPE 相差超出窗口
        let data = subjects_for(&[("a", -100.0, 0.05), ("b", -100.0, 0.0502)]);
        let subjects: Vec<CheckSubject> = data
            .iter()
            .map(|(p, r)| CheckSubject { parsed: p, result: r })
            .collect();
        assert!(find_duplicates(&subjects, 298.15).is_empty());
        assert!(check_duplicates(&subjects, 298.15).is_pass());
    }

    #[test]
    fn test_incomplete_results_are_ignored() {
        let mut data = subjects_for(&[("a", -100.0, 0.05), ("b", -100.0, 0.05)]);
        data[1].1.zpe = None;
        let subjects: Vec<CheckSubject> = data
            .iter()
            .map(|(p, r)| CheckSubject { parsed: p, result: r })
            .collect();
        assert!(find_duplicates(&subjects, 298.15).is_empty());
    }
}
