//! # ORCA 输出解析器
//!
//! 从 ORCA .out 提取能量、振动频率与热化学块中的数值。
//! ORCA 给出的是转动常数 (cm⁻¹)，在此换算为转动温度 θ = h·c·B/k。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `models/record.rs`, `thermo/constants.rs`

use crate::models::{CalculationRecord, CpuTime, RotationalTemperatures};
use crate::parsers::{field_f64, number_after, Atom, Dialect, Geometry, OutputMeta, ParsedOutput, GAS_PHASE};
use crate::thermo::constants::{BOLTZMANN_CONSTANT, PLANCK_CONSTANT, SPEED_OF_LIGHT};

use regex::Regex;

/// 解析 ORCA 输出文本
pub fn parse(text: &str, name: &str) -> ParsedOutput {
    let lines: Vec<&str> = text.lines().collect();
    let mut record = CalculationRecord::new(name);
    let mut meta = OutputMeta::new(Dialect::Orca);
    let (mut cpcm, mut smd) = (false, false);
    let mut solvent: Option<String> = None;

    let mode_re = Regex::new(r"^\s*\d+:\s+(-?\d+\.\d+)\s+cm\*\*-1").unwrap();
    let mut in_frequencies = false;

    for line in &lines {
        let trimmed = line.trim();

        // 最后一个频率块为准
        if trimmed == "VIBRATIONAL FREQUENCIES" {
            in_frequencies = true;
            record.frequencies.clear();
            record.imaginary_frequencies.clear();
            continue;
        }
        if in_frequencies {
            if trimmed == "NORMAL MODES" {
                in_frequencies = false;
            } else if let Some(caps) = mode_re.captures(line) {
                if let Ok(freq) = caps[1].parse::<f64>() {
                    record.push_frequency(freq);
                }
            }
            continue;
        }

        // "FINAL SINGLE POINT ENERGY       -76.408953360000"
        if trimmed.starts_with("FINAL SINGLE POINT ENERGY") {
            if let Some(e) = field_f64(trimmed, 4) {
                record.scf_energy = Some(e);
                record.final_energy = Some(e);
            }
        }

        // "Multiplicity           Mult            ....    1"
        if trimmed.starts_with("Multiplicity") && trimmed.contains("....") {
            if let Some(m) = trimmed.split_whitespace().last().and_then(|s| s.parse::<u32>().ok()) {
                record.multiplicity = m.max(1);
            }
        }

        if trimmed.starts_with("Total Mass") {
            record.molecular_mass = number_after(trimmed, "...");
        }

        // "Zero point energy                ...      0.02116300 Eh      13.28 kcal/mol"
        if trimmed.starts_with("Zero point energy") {
            record.zero_point_correction = number_after(trimmed, "...");
        }

        // "Point Group:  C2v, Symmetry Number:   2"
        if trimmed.starts_with("Point Group:") {
            let group = trimmed
                .trim_start_matches("Point Group:")
                .split(',')
                .next()
                .unwrap_or("")
                .trim()
                .to_lowercase();
            record.linear = group.contains("inf");
            if let Some(n) = number_after(trimmed, "Symmetry Number:") {
                record.symmetry_number = (n as u32).max(1);
            }
        }

        if trimmed.starts_with("Rotational constants in cm-1:") {
            record.rotational_temperatures = Some(rotational_temperatures(trimmed));
        }

        // "TOTAL RUN TIME: 0 days 0 hours 0 minutes 12 seconds 345 msec"
        if trimmed.starts_with("TOTAL RUN TIME") {
            if let Some(cpu) = run_time(trimmed) {
                record.cpu_time = Some(record.cpu_time.unwrap_or_default() + cpu);
            }
        }

        if trimmed.contains("Program Version") {
            meta.program_version = trimmed
                .split_whitespace()
                .nth(2)
                .map(|v| format!("ORCA version {}", v));
        }

        if trimmed.contains("DLPNO BASED TRIPLES CORRECTION") {
            meta.level_of_theory = Some("DLPNO-CCSD(T)".to_string());
        }

        cpcm |= trimmed.contains("CPCM SOLVATION MODEL");
        smd |= trimmed.contains("SMD CDS free energy correction energy");
        if trimmed.starts_with("Solvent:") {
            solvent = trimmed.split_whitespace().last().map(|s| s.to_lowercase());
        }
    }

    meta.solvation_model = solvation_model(cpcm, smd, solvent);

    ParsedOutput {
        record,
        meta,
        geometry: last_cartesian_block(&lines),
    }
}

/// 如 "CPCM,SMD,water"；未检测到溶剂化时为气相
fn solvation_model(cpcm: bool, smd: bool, solvent: Option<String>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if cpcm {
        parts.push("CPCM".to_string());
    }
    if smd {
        parts.push("SMD".to_string());
    }
    parts.extend(solvent);
    if parts.is_empty() {
        GAS_PHASE.to_string()
    } else {
        parts.join(",")
    }
}

/// 转动常数 (cm⁻¹) -> 转动温度 (K)
pub fn rotational_constant_to_temperature(constant: f64) -> f64 {
    PLANCK_CONSTANT * SPEED_OF_LIGHT * constant / BOLTZMANN_CONSTANT
}

/// "Rotational constants in cm-1:    27.208571    14.634101     9.515818"
///
/// 零值对应的轴不计入：全零为单原子，仅一个非零值（或两个相等非零值）为线性分子。
fn rotational_temperatures(line: &str) -> RotationalTemperatures {
    let constants: Vec<f64> = line
        .split(':')
        .nth(1)
        .unwrap_or("")
        .split_whitespace()
        .filter_map(|s| s.parse::<f64>().ok())
        .filter(|&b| b > 0.0)
        .map(rotational_constant_to_temperature)
        .collect();

    match constants.as_slice() {
        [] => RotationalTemperatures::Atomic,
        [a] => RotationalTemperatures::Linear(*a),
        [a, b] if (a - b).abs() < 1e-8 * a.abs().max(1.0) => RotationalTemperatures::Linear(*a),
        [a, b] => RotationalTemperatures::Ambiguous(*a, *b),
        [a, b, c, ..] => RotationalTemperatures::NonLinear(*a, *b, *c),
    }
}

fn run_time(line: &str) -> Option<CpuTime> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let days = parts.get(3)?.parse::<u64>().ok()?;
    let hours = parts.get(5)?.parse::<u64>().ok()?;
    let minutes = parts.get(7)?.parse::<u64>().ok()?;
    let seconds = parts.get(9)?.parse::<f64>().ok()?;
    let millis = parts.get(11).and_then(|s| s.parse::<f64>().ok()).unwrap_or(0.0);
    Some(CpuTime::from_parts(days, hours, minutes, seconds, millis))
}

/// 最后一个 CARTESIAN COORDINATES (ANGSTROEM) 块
fn last_cartesian_block(lines: &[&str]) -> Option<Geometry> {
    let start = lines
        .iter()
        .rposition(|l| l.contains("CARTESIAN COORDINATES (ANGSTROEM)"))?;

    let atoms = lines
        .iter()
        .skip(start + 1)
        .skip_while(|l| l.trim().starts_with("---"))
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| {
            let fields: Vec<&str> = l.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            Some(Atom {
                element: fields[0].to_string(),
                position: [
                    fields[1].parse().ok()?,
                    fields[2].parse().ok()?,
                    fields[3].parse().ok()?,
                ],
            })
        })
        .collect();

    Some(Geometry { atoms })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = r#"
                                 *****************
                                 * O   R   C   A *
                                 *****************
                          Program Version 5.0.3 -  RELEASE  -

 Multiplicity           Mult            ....    1

---------------------------------
CARTESIAN COORDINATES (ANGSTROEM)
---------------------------------
  O      0.000000    0.000000    0.119262
  H      0.000000    0.763239   -0.477047
  H      0.000000   -0.763239   -0.477047

FINAL SINGLE POINT ENERGY       -76.408953360000

-----------------------
VIBRATIONAL FREQUENCIES
-----------------------

Scaling factor for frequencies =  1.000000000  (already applied!)

   0:         0.00 cm**-1
   1:         0.00 cm**-1
   2:         0.00 cm**-1
   3:         0.00 cm**-1
   4:         0.00 cm**-1
   5:         0.00 cm**-1
   6:      1713.11 cm**-1
   7:      3727.35 cm**-1
   8:      3849.17 cm**-1

------------
NORMAL MODES
------------

Total Mass                    ...     18.02 AMU
Zero point energy                ...      0.02116300 Eh      13.28 kcal/mol
Point Group:  C2v, Symmetry Number:   2
Rotational constants in cm-1:    27.208571    14.634101     9.515818

TOTAL RUN TIME: 0 days 0 hours 1 minutes 12 seconds 345 msec
"#;

    #[test]
    fn test_water() {
        let parsed = parse(WATER, "water");
        let r = &parsed.record;
        assert_eq!(r.frequencies, vec![1713.11, 3727.35, 3849.17]);
        assert!(r.imaginary_frequencies.is_empty());
        assert!((r.scf_energy.unwrap() + 76.40895336).abs() < 1e-9);
        assert!((r.molecular_mass.unwrap() - 18.02).abs() < 1e-9);
        assert!((r.zero_point_correction.unwrap() - 0.021163).abs() < 1e-9);
        assert_eq!(r.symmetry_number, 2);
        assert!(!r.linear);
        assert_eq!(r.cpu_time.unwrap().components(), (0, 0, 1, 12));
    }

    #[test]
    fn test_rotational_constants_converted_to_kelvin() {
        let r = parse(WATER, "water").record;
        match r.rotational_temperatures {
            Some(RotationalTemperatures::NonLinear(a, _, c)) => {
                // 27.208571 cm⁻¹ ≈ 39.15 K
                assert!((a - 39.147).abs() < 0.01);
                assert!((c - 13.691).abs() < 0.01);
            }
            other => panic!("unexpected rotational temperatures: {:?}", other),
        }
    }

    #[test]
    fn test_metadata_and_geometry() {
        let parsed = parse(WATER, "water");
        assert_eq!(parsed.meta.program_version.as_deref(), Some("ORCA version 5.0.3"));
        assert_eq!(parsed.meta.solvation_model, "gas phase");
        let geom = parsed.geometry.unwrap();
        assert_eq!(geom.len(), 3);
        assert_eq!(geom.element_sequence(), "OHH");
    }

    #[test]
    fn test_linear_and_solvated() {
        let text = r#"* O   R   C   A *
CPCM SOLVATION MODEL
Solvent:              WATER
   6:       -52.40 cm**-1 ***imaginary mode***
Point Group:  Dinfh, Symmetry Number:   2
Rotational constants in cm-1:     0.000000     0.390218     0.390218
"#;
        let parsed = parse(text, "co2");
        assert!(parsed.record.linear);
        assert!(matches!(
            parsed.record.rotational_temperatures,
            Some(RotationalTemperatures::Linear(_))
        ));
        assert_eq!(parsed.meta.solvation_model, "CPCM,water");
        // 频率块之外的行不计入
        assert!(parsed.record.imaginary_frequencies.is_empty());
    }

    #[test]
    fn test_imaginary_mode_in_block() {
        let text = "* O   R   C   A *\nVIBRATIONAL FREQUENCIES\n   6:      -52.40 cm**-1 ***imaginary mode***\n   7:      100.00 cm**-1\nNORMAL MODES\n";
        let r = parse(text, "ts").record;
        assert_eq!(r.imaginary_frequencies, vec![-52.4]);
        assert_eq!(r.frequencies, vec![100.0]);
    }
}
