//! # 物理常数与单位换算
//!
//! CODATA 2010 推荐值，所有热化学公式共用。
//!
//! ## 依赖关系
//! - 被 `thermo/`, `pes/`, `parsers/orca.rs` 使用
//! - 无外部模块依赖

/// 气体常数 R (J/(mol·K))
pub const GAS_CONSTANT: f64 = 8.3144621;

/// Planck 常数 h (J·s)
pub const PLANCK_CONSTANT: f64 = 6.62606957e-34;

/// Boltzmann 常数 k (J/K)
pub const BOLTZMANN_CONSTANT: f64 = 1.3806488e-23;

/// 光速 c (cm/s)，频率以波数 cm⁻¹ 给出
pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

/// Avogadro 常数 (mol⁻¹)
pub const AVOGADRO_CONSTANT: f64 = 6.0221415e23;

/// 原子质量单位 (kg)
pub const AMU_TO_KG: f64 = 1.66053886e-27;

/// 1 atm (kPa)
pub const ATMOSPHERE_KPA: f64 = 101.325;

/// 1 Hartree = 627.509541 kcal/mol
pub const KCAL_PER_HARTREE: f64 = 627.509541;

/// 1 Hartree (J/mol)
pub const J_PER_HARTREE: f64 = 4.184 * KCAL_PER_HARTREE * 1000.0;

/// Grimme 自由转子模型中的平均转动惯量 (kg·m²)
pub const AVERAGE_MOMENT_OF_INERTIA: f64 = 10.0e-44;

/// 1 atm 理想气体在温度 T 下的浓度 (mol/L)
pub fn one_atm_concentration(temperature: f64) -> f64 {
    ATMOSPHERE_KPA / (GAS_CONSTANT * temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_atm_concentration_at_room_temperature() {
        // 约 0.040876 mol/L
        let conc = one_atm_concentration(298.15);
        assert!((conc - 0.040876).abs() < 1e-5);
    }

    #[test]
    fn test_hartree_in_joules() {
        assert!((J_PER_HARTREE - 2_625_499.6).abs() < 1.0);
    }
}
