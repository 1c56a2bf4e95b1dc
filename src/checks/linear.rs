//! # 线性分子频率数目检查
//!
//! 按原子组成识别可能的线性分子，并核对实频数目是否为 3N-5：
//! - 双原子: 1
//! - I₃、O₃、HCN，以及含一对关于原点镜像的同种原子的三原子分子: 4
//! - 乙炔（任意原子顺序）: 7
//!
//! ## 依赖关系
//! - 被 `checks/mod.rs` 调用
//! - 使用 `parsers/` 的 Geometry

use crate::checks::{CheckOutcome, CheckSubject};
use crate::parsers::Geometry;

/// 镜像判据：每个坐标分量满足 |x_j + x_k| < 0.1 Å
pub const LINEAR_MIRROR_TOLERANCE: f64 = 0.1;

const LINEAR_TRIATOMICS: [&str; 3] = ["III", "OOO", "HCN"];
const ACETYLENE_ORDERINGS: [&str; 6] = ["CCHH", "CHCH", "CHHC", "HCCH", "HCHC", "HHCC"];

/// 线性分子应有的实频数；非线性（或无法判断）返回 None
pub fn expected_linear_modes(geometry: &Geometry) -> Option<usize> {
    let sequence = geometry.element_sequence();
    match geometry.len() {
        2 => Some(1),
        3 if LINEAR_TRIATOMICS.contains(&sequence.as_str()) => Some(4),
        3 if mirrored_axes(geometry) >= 3 => Some(4),
        4 if ACETYLENE_ORDERINGS.contains(&sequence.as_str()) => Some(7),
        _ => None,
    }
}

/// 同种原子对中互为镜像的坐标分量总数
fn mirrored_axes(geometry: &Geometry) -> usize {
    let atoms = &geometry.atoms;
    let mut count = 0;
    for (j, a) in atoms.iter().enumerate() {
        for b in &atoms[j + 1..] {
            if a.element != b.element {
                continue;
            }
            count += a
                .position
                .iter()
                .zip(b.position.iter())
                .filter(|(x, y)| (*x + *y).abs() < LINEAR_MIRROR_TOLERANCE)
                .count();
        }
    }
    count
}

pub fn check_linear_molecules(subjects: &[CheckSubject<'_>]) -> CheckOutcome {
    let mut correct = Vec::new();
    let mut wrong = Vec::new();

    for subject in subjects {
        let Some(geometry) = subject.parsed.geometry.as_ref() else {
            continue;
        };
        if let Some(expected) = expected_linear_modes(geometry) {
            if subject.parsed.record.frequencies.len() == expected {
                correct.push(subject.name());
            } else {
                wrong.push(subject.name());
            }
        }
    }

    match (correct.is_empty(), wrong.is_empty()) {
        (true, true) => CheckOutcome::Pass("No linear molecules found".to_string()),
        (false, true) => CheckOutcome::Pass(format!(
            "All the linear molecules have the correct number of frequencies - {}",
            correct.join(", ")
        )),
        (true, false) => CheckOutcome::Caution(format!(
            "CAUTION: potential linear molecules with wrong number of frequencies found (correct number = 3N-5) - {}",
            wrong.join(", ")
        )),
        (false, false) => CheckOutcome::Caution(format!(
            "CAUTION: potential linear molecules with wrong number of frequencies found - {}. Correct number of frequencies (3N-5) found in other calculations - {}",
            wrong.join(", "),
            correct.join(", ")
        )),
    }
}
