//! # 热化学计算引擎
//!
//! 由振动频率与转动温度计算 ZPE、焓、熵与 Gibbs 自由能。
//! 截断频率以上使用刚性转子-谐振子 (RRHO) 近似，以下可选两种处理：
//! - Grimme：阻尼函数在 RRHO 熵与自由转子熵之间平滑插值
//! - Truhlar：低频模式上移到截断频率后按 RRHO 计算
//!
//! 截断频率为 0 时结果与 Gaussian 标准输出一致。
//!
//! ## 依赖关系
//! - 被 `commands/pipeline.rs` 调用
//! - 使用 `models/` 的 CalculationRecord, RunOptions, ThermoResult
//! - 使用 `thermo/constants.rs`, `thermo/solvent.rs`

use crate::models::{
    CalculationRecord, QhMethod, RotationalTemperatures, RunOptions, ThermoResult, ThermoWarning,
};
use crate::thermo::constants::*;
use crate::thermo::solvent::Solvent;

use std::f64::consts::PI;

/// 低于 -IMAGINARY_FREQ_CUTOFF 的虚频才会被报告 (cm⁻¹)
pub const IMAGINARY_FREQ_CUTOFF: f64 = 0.0;

/// 阻尼函数指数
const DAMPING_ALPHA: i32 = 4;

/// 计算单个结构的热化学量
pub fn evaluate(record: &CalculationRecord, options: &RunOptions) -> ThermoResult {
    let mut result = ThermoResult::partial(record.name.clone());
    result.scf_energy = record.scf_energy;
    result.sp_energy = record.sp_energy;
    result.cpu_time = record.cpu_time;
    result.frequencies = record.frequencies.clone();
    result.imaginary_frequencies = record
        .imaginary_frequencies
        .iter()
        .copied()
        .filter(|f| *f < -IMAGINARY_FREQ_CUTOFF)
        .collect();

    let rotemp = match record.rotational_temperatures {
        Some(RotationalTemperatures::Ambiguous(..)) => {
            result.warnings.push(ThermoWarning::LinearGeometryAmbiguous);
            return result;
        }
        Some(rt) => rt,
        None => {
            result.warnings.push(ThermoWarning::IncompleteRecord);
            return result;
        }
    };

    let (zpe_corr, scf_energy, mass) = match (
        record.zero_point_correction,
        record.scf_energy,
        record.molecular_mass,
    ) {
        (Some(z), Some(e), Some(m)) => (z, e, m),
        _ => {
            result.warnings.push(ThermoWarning::IncompleteRecord);
            return result;
        }
    };

    let t = options.temperature;
    let scale = options.scale_factor;
    let freqs = &record.frequencies;

    // 平动与电子贡献与频率无关
    let u_trans = translational_energy(t);
    let s_trans = translational_entropy(mass, options.concentration, t, options.solvent);
    let s_elec = electronic_entropy(record.multiplicity);

    // 单原子体系没有振动/转动自由度
    let (zpe, u_rot, u_vib, s_rot, h_svib, qh_svib) = if freqs.is_empty() {
        (0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    } else {
        let (h_svib, qh_svib) = vibrational_entropies(freqs, options);
        (
            zero_point_energy(freqs, scale),
            rotational_energy(zpe_corr, record.linear, t),
            vibrational_energy(freqs, t, scale),
            rotational_entropy(zpe_corr, &rotemp, record.symmetry_number, t),
            h_svib,
            qh_svib,
        )
    };

    // 单点能替换优化能量，热校正保持不变
    let electronic = record.sp_energy.unwrap_or(scf_energy);
    let enthalpy = electronic + (u_trans + u_rot + u_vib + GAS_CONSTANT * t) / J_PER_HARTREE;
    let entropy = (s_trans + s_rot + h_svib + s_elec) / J_PER_HARTREE;
    let qh_entropy = (s_trans + s_rot + qh_svib + s_elec) / J_PER_HARTREE;

    result.zpe = Some(zpe / J_PER_HARTREE);
    result.enthalpy = Some(enthalpy);
    result.entropy = Some(entropy);
    result.qh_entropy = Some(qh_entropy);
    result.gibbs = Some(enthalpy - t * entropy);
    result.qh_gibbs = Some(enthalpy - t * qh_entropy);
    result
}

/// h·c·ν·scale/(k·T)
fn reduced_frequency(freq: f64, temperature: f64, scale: f64) -> f64 {
    PLANCK_CONSTANT * freq * SPEED_OF_LIGHT * scale / (BOLTZMANN_CONSTANT * temperature)
}

// ─────────────────────────────────────────────────────────────
// 能量项 (J/mol)
// ─────────────────────────────────────────────────────────────

/// 理想气体平动能 3/2·RT
pub fn translational_energy(temperature: f64) -> f64 {
    1.5 * GAS_CONSTANT * temperature
}

/// 转动能：单原子 0，线性 RT，非线性 3/2·RT
pub fn rotational_energy(zpe_corr: f64, linear: bool, temperature: f64) -> f64 {
    if zpe_corr == 0.0 {
        0.0
    } else if linear {
        GAS_CONSTANT * temperature
    } else {
        1.5 * GAS_CONSTANT * temperature
    }
}

/// 振动能（含零点能）：R·Σ(hν/k)·(1/2 + 1/(e^x − 1))
pub fn vibrational_energy(freqs: &[f64], temperature: f64, scale: f64) -> f64 {
    freqs
        .iter()
        .map(|&f| {
            let x = reduced_frequency(f, temperature, scale);
            x * GAS_CONSTANT * temperature * (0.5 + 1.0 / x.exp_m1())
        })
        .sum()
}

/// 零点能：R·Σ hν/(2k)，与温度无关
pub fn zero_point_energy(freqs: &[f64], scale: f64) -> f64 {
    freqs
        .iter()
        .map(|&f| 0.5 * GAS_CONSTANT * PLANCK_CONSTANT * f * SPEED_OF_LIGHT * scale / BOLTZMANN_CONSTANT)
        .sum()
}

// ─────────────────────────────────────────────────────────────
// 熵项 (J/(mol·K))
// ─────────────────────────────────────────────────────────────

/// 平动熵 R·(5/2 + ln(λ³/N))
///
/// 质量 amu -> kg，浓度 mol/L -> 每 m³ 分子数，并按溶剂自由空间修正。
pub fn translational_entropy(mass: f64, conc: f64, temperature: f64, solvent: Solvent) -> f64 {
    let lambda =
        (2.0 * PI * mass * AMU_TO_KG * BOLTZMANN_CONSTANT * temperature).sqrt() / PLANCK_CONSTANT;
    let freespace = solvent.free_space();
    let n_density = conc * 1000.0 * AVOGADRO_CONSTANT / (freespace / 1000.0);
    GAS_CONSTANT * (2.5 + (lambda.powi(3) / n_density).ln())
}

/// 电子熵 R·ln(多重度)
pub fn electronic_entropy(multiplicity: u32) -> f64 {
    GAS_CONSTANT * f64::from(multiplicity.max(1)).ln()
}

/// 转动熵
///
/// 线性 R·(ln(q/σ)+1)，非线性 R·(ln(q/σ)+3/2)。
/// 两个转动温度的情况无法判断几何，贡献记为 0（经验处理）。
pub fn rotational_entropy(
    zpe_corr: f64,
    rotemp: &RotationalTemperatures,
    symmetry_number: u32,
    temperature: f64,
) -> f64 {
    if zpe_corr == 0.0 {
        return 0.0;
    }
    let sigma = f64::from(symmetry_number.max(1));
    match *rotemp {
        RotationalTemperatures::Atomic => 0.0,
        RotationalTemperatures::NonLinear(a, b, c) if a == 0.0 && b == 0.0 && c == 0.0 => 0.0,
        RotationalTemperatures::Linear(theta) => {
            let qrot = temperature / theta;
            GAS_CONSTANT * ((qrot / sigma).ln() + 1.0)
        }
        RotationalTemperatures::Ambiguous(..) => 0.0,
        RotationalTemperatures::NonLinear(a, b, c) => {
            let qrot = (PI * temperature.powi(3) / (a * b * c)).sqrt();
            GAS_CONSTANT * ((qrot / sigma).ln() + 1.5)
        }
    }
}

/// 单个模式的 RRHO 振动熵
///
/// S = R·y/(e^y − 1) − R·ln(1 − e^(−y))
pub fn rrho_entropy(freq: f64, temperature: f64, scale: f64) -> f64 {
    let y = reduced_frequency(freq, temperature, scale);
    y * GAS_CONSTANT / y.exp_m1() - GAS_CONSTANT * (-(-y).exp_m1()).ln()
}

/// 单个模式的自由转子熵
///
/// S = R·(1/2 + 1/2·ln(8π³μ'kT/h²))，μ' = μ·B_av/(μ + B_av)
pub fn free_rotor_entropy(freq: f64, temperature: f64, scale: f64) -> f64 {
    let mu = PLANCK_CONSTANT / (8.0 * PI.powi(2) * freq * SPEED_OF_LIGHT * scale);
    let mu_primed = mu * AVERAGE_MOMENT_OF_INERTIA / (mu + AVERAGE_MOMENT_OF_INERTIA);
    let factor =
        8.0 * PI.powi(3) * mu_primed * BOLTZMANN_CONSTANT * temperature / PLANCK_CONSTANT.powi(2);
    (0.5 + factor.sqrt().ln()) * GAS_CONSTANT
}

/// Grimme 阻尼函数 1/(1 + (cutoff/ν)⁴)
pub fn damping(freq: f64, cutoff: f64) -> f64 {
    1.0 / (1.0 + (cutoff / freq).powi(DAMPING_ALPHA))
}

/// 单个模式的准谐振动熵
pub fn quasi_harmonic_entropy(freq: f64, options: &RunOptions) -> f64 {
    let t = options.temperature;
    let scale = options.scale_factor;
    let cutoff = options.freq_cutoff;
    match options.qh_method {
        QhMethod::Grimme => {
            let damp = damping(freq, cutoff);
            rrho_entropy(freq, t, scale) * damp + (1.0 - damp) * free_rotor_entropy(freq, t, scale)
        }
        QhMethod::Truhlar => {
            if cutoff > 0.0 && freq <= cutoff {
                // 截断值本身不再缩放
                rrho_entropy(cutoff, t, 1.0)
            } else {
                rrho_entropy(freq, t, scale)
            }
        }
    }
}

/// 总振动熵 (谐振子, 准谐振子)
pub fn vibrational_entropies(freqs: &[f64], options: &RunOptions) -> (f64, f64) {
    freqs.iter().fold((0.0, 0.0), |(h, qh), &f| {
        (
            h + rrho_entropy(f, options.temperature, options.scale_factor),
            qh + quasi_harmonic_entropy(f, options),
        )
    })
}
