//! # Boltzmann 加权
//!
//! 以准谐 Gibbs 自由能为权重键，对构象系综做布居平均。
//! 先找最小值再求指数，避免大系综时 exp 溢出。
//!
//! ## 依赖关系
//! - 被 `pes/assembler.rs`（构象组）和 `commands/thermo.rs`（布居列、簇）使用
//! - 使用 `models/thermo.rs` 的 EnergyProfile

use crate::models::EnergyProfile;
use crate::thermo::constants::{GAS_CONSTANT, J_PER_HARTREE};

/// 相对能量 (Hartree) 对应的 Boltzmann 因子
fn factor(relative: f64, temperature: f64) -> f64 {
    (-relative * J_PER_HARTREE / (GAS_CONSTANT * temperature)).exp()
}

fn minimum(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}

/// 归一化的 Boltzmann 权重
///
/// `values` 为各成员的能量 (Hartree)；空输入返回空列表。
pub fn boltzmann_weights(values: &[f64], temperature: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = minimum(values.iter().copied());
    let factors: Vec<f64> = values.iter().map(|v| factor(v - min, temperature)).collect();
    let total: f64 = factors.iter().sum();
    factors.into_iter().map(|f| f / total).collect()
}

/// 构象系综的加权平均热化学量
///
/// 所有字段共用由 qh-G 得到的同一组权重；单点能只有在每个构象都有时才平均。
pub fn aggregate(conformers: &[EnergyProfile], temperature: f64) -> Option<EnergyProfile> {
    if conformers.is_empty() {
        return None;
    }

    // 第一遍：最低 qh-G
    let g_min = minimum(conformers.iter().map(|c| c.qh_gibbs));

    // 第二遍：加权求和
    let (weighted, total) = conformers.iter().fold(
        (EnergyProfile::zero(), 0.0),
        |(acc, total), conformer| {
            let w = factor(conformer.qh_gibbs - g_min, temperature);
            (acc + *conformer * w, total + w)
        },
    );

    Some(weighted * (1.0 / total))
}

/// 一组成员的总布居与加权 qh-G
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub name: String,
    /// 簇内成员布居之和 (%)
    pub population: f64,
    /// 簇内 Boltzmann 加权 qh-G (Hartree)
    pub weighted_qh_gibbs: f64,
}

/// 在全体结构的布居基础上汇总各簇
///
/// `all` 为全部结构的 qh-G；`clusters` 给出簇名与成员在 `all` 中的下标。
pub fn summarize_clusters(
    all: &[f64],
    clusters: &[(String, Vec<usize>)],
    temperature: f64,
) -> Vec<ClusterSummary> {
    let weights = boltzmann_weights(all, temperature);
    clusters
        .iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(name, members)| {
            let population: f64 = members.iter().map(|&i| weights[i]).sum();
            let weighted: f64 = members.iter().map(|&i| weights[i] * all[i]).sum();
            ClusterSummary {
                name: name.clone(),
                population: population * 100.0,
                weighted_qh_gibbs: weighted / population,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: f64 = 298.15;

    fn conformer(qh_g: f64) -> EnergyProfile {
        EnergyProfile {
            energy: qh_g - 0.1,
            sp_energy: None,
            zpe: 0.05,
            enthalpy: qh_g + 0.03,
            entropy: 1.0e-4,
            qh_entropy: 1.0e-4 + qh_g.abs() * 1e-9,
            gibbs: qh_g + 0.001,
            qh_gibbs: qh_g,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let values = [-100.0, -100.001, -99.998, -100.0005];
        let w = boltzmann_weights(&values, T);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        // 最低能量权重最大
        assert!(w[1] > w[3] && w[3] > w[0] && w[0] > w[2]);
    }

    #[test]
    fn test_weights_empty() {
        assert!(boltzmann_weights(&[], T).is_empty());
        assert!(aggregate(&[], T).is_none());
    }

    #[test]
    fn test_degenerate_conformers_weigh_equally() {
        let w = boltzmann_weights(&[-5.0, -5.0], T);
        assert!((w[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_large_energies_do_not_overflow() {
        // 相差 1 Hartree 时未平移的指数会溢出
        let values: Vec<f64> = (0..1000).map(|i| -2000.0 + i as f64 * 0.01).collect();
        let w = boltzmann_weights(&values, T);
        assert!(w.iter().all(|x| x.is_finite()));
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_single_conformer_is_identity() {
        let c = conformer(-300.0);
        let avg = aggregate(&[c], T).unwrap();
        assert!((avg.enthalpy - c.enthalpy).abs() < 1e-12);
        assert!((avg.qh_gibbs - c.qh_gibbs).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_below_arithmetic_mean() {
        let ensemble: Vec<EnergyProfile> = [-300.0, -300.002, -299.999, -300.0015]
            .iter()
            .map(|&g| conformer(g))
            .collect();
        let avg = aggregate(&ensemble, T).unwrap();
        let mean = ensemble.iter().map(|c| c.qh_gibbs).sum::<f64>() / ensemble.len() as f64;
        assert!(avg.qh_gibbs <= mean);
        let min = ensemble.iter().map(|c| c.qh_gibbs).fold(f64::INFINITY, f64::min);
        assert!(avg.qh_gibbs >= min);
    }

    #[test]
    fn test_aggregate_uses_qh_gibbs_weights_for_every_field() {
        let a = conformer(-10.0);
        let b = conformer(-10.001);
        let w = boltzmann_weights(&[a.qh_gibbs, b.qh_gibbs], T);
        let avg = aggregate(&[a, b], T).unwrap();
        let expected_s = w[0] * a.entropy + w[1] * b.entropy;
        assert!((avg.entropy - expected_s).abs() < 1e-15);
        let expected_e = w[0] * a.energy + w[1] * b.energy;
        assert!((avg.energy - expected_e).abs() < 1e-9);
    }

    #[test]
    fn test_cluster_summary() {
        let all = [-1.0, -1.0, -1.0, -1.0];
        let clusters = vec![
            ("cluster-A".to_string(), vec![0, 1, 2]),
            ("cluster-B".to_string(), vec![3]),
        ];
        let summary = summarize_clusters(&all, &clusters, T);
        assert_eq!(summary.len(), 2);
        assert!((summary[0].population - 75.0).abs() < 1e-9);
        assert!((summary[1].population - 25.0).abs() < 1e-9);
        assert!((summary[0].weighted_qh_gibbs + 1.0).abs() < 1e-12);
    }
}
