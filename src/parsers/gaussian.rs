//! # Gaussian 输出解析器
//!
//! 从 Gaussian .log/.out 提取热化学所需数值。
//!
//! 输出按 `Normal termination` 划分为若干 link；最后一个打印
//! `Frequencies --` 的 link 为频率计算。频率只取该 link，其他标量取到该 link
//! 结束为止的最后一个值；`final_energy` 取整个文件最后的能量（link 单点用）。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `models/record.rs`
//! - 使用 `regex` 提取溶剂化关键词与版本号

use crate::models::{CalculationRecord, CpuTime, RotationalTemperatures};
use crate::parsers::{element_symbol, field_f64, Atom, Dialect, Geometry, OutputMeta, ParsedOutput};

use regex::Regex;

const TERMINATION: &str = "Normal termination";
/// 结尾空格排除 `freq=HPModes` 的高精度 `Frequencies ---` 行
const FREQUENCY_LINE: &str = "Frequencies -- ";

/// 解析 Gaussian 输出文本
pub fn parse(text: &str, name: &str) -> ParsedOutput {
    let lines: Vec<&str> = text.lines().collect();
    let segments = link_indices(&lines);
    let freq_link = lines
        .iter()
        .zip(&segments)
        .filter(|(line, _)| line.contains(FREQUENCY_LINE))
        .map(|(_, &seg)| seg)
        .last();

    let mut record = CalculationRecord::new(name);

    for (line, &seg) in lines.iter().zip(&segments) {
        if let Some(e) = electronic_energy(line) {
            record.final_energy = Some(e);
        }
        if freq_link.map_or(false, |f| seg > f) {
            continue;
        }
        if freq_link == Some(seg) && line.trim_start().starts_with(FREQUENCY_LINE) {
            // "Frequencies --    -45.1234    1612.5433    3725.9871"
            for freq in line.split_whitespace().skip(2).filter_map(|w| w.parse::<f64>().ok()) {
                record.push_frequency(freq);
            }
        }
        read_scalar(line, &mut record);
    }

    ParsedOutput {
        record,
        meta: OutputMeta {
            dialect: Dialect::Gaussian,
            program_version: program_version(&lines),
            level_of_theory: level_of_theory(&lines),
            solvation_model: solvation_model(&lines),
        },
        geometry: last_orientation(&lines),
    }
}

/// 每行所属的 link 序号（终止行属于它所结束的 link）
fn link_indices(lines: &[&str]) -> Vec<usize> {
    let mut current = 0;
    lines
        .iter()
        .map(|line| {
            let seg = current;
            if line.contains(TERMINATION) {
                current += 1;
            }
            seg
        })
        .collect()
}

/// 各类电子能量行
fn electronic_energy(line: &str) -> Option<f64> {
    let trimmed = line.trim();
    // "SCF Done:  E(RB3LYP) =  -76.4089533     A.U. after   10 cycles"
    if trimmed.starts_with("SCF Done:") || trimmed.starts_with("Counterpoise corrected energy") {
        return field_f64(trimmed, 4);
    }
    // "E2 =    -0.2039D+00 EUMP2 =    -0.76328D+02"
    if trimmed.contains("EUMP2 =") {
        return field_f64(trimmed, 5);
    }
    if trimmed.contains("ONIOM: extrapolated energy") {
        return field_f64(trimmed, 4);
    }
    // 半经验 / 分子力学: "Energy=   -0.123456789 NIter=   0."
    if trimmed.contains("Energy= ") && !trimmed.contains("Predicted") && !trimmed.contains("Thermal")
    {
        return field_f64(trimmed, 1);
    }
    None
}

/// 频率 link 结束前的标量
fn read_scalar(line: &str, record: &mut CalculationRecord) {
    let trimmed = line.trim();

    if let Some(e) = electronic_energy(line) {
        record.scf_energy = Some(e);
    }

    if trimmed.starts_with("Zero-point correction=") {
        record.zero_point_correction = field_f64(trimmed, 2);
    }

    // "Charge =  0 Multiplicity = 1"
    if trimmed.contains("Multiplicity") {
        if let Some(mult) = trimmed
            .rsplit('=')
            .next()
            .and_then(|s| s.split_whitespace().next())
            .and_then(|s| s.parse::<f64>().ok())
        {
            record.multiplicity = mult.max(1.0) as u32;
        }
    }

    if trimmed.starts_with("Molecular mass:") {
        record.molecular_mass = field_f64(trimmed, 2);
    }

    // "Rotational symmetry number  2."
    if trimmed.starts_with("Rotational symmetry number") {
        if let Some(n) = trimmed
            .split_whitespace()
            .nth(3)
            .and_then(|s| s.split('.').next())
            .and_then(|s| s.parse::<u32>().ok())
        {
            record.symmetry_number = n.max(1);
        }
    }

    // "Full point group                 D*H     NOp   8"
    if trimmed.starts_with("Full point group") {
        if let Some(group) = trimmed.split_whitespace().nth(3) {
            record.linear = group == "D*H" || group == "C*V";
        }
    }

    if trimmed.starts_with("Rotational temperature ") {
        record.rotational_temperatures = field_f64(trimmed, 3).map(RotationalTemperatures::Linear);
    }

    if trimmed.starts_with("Rotational temperatures") {
        record.rotational_temperatures = rotational_temperatures(trimmed);
    }

    // "Job cpu time:       0 days  0 hours  1 minutes 23.4 seconds."
    if trimmed.contains("Job cpu time") {
        if let Some(cpu) = job_cpu_time(trimmed) {
            record.cpu_time = Some(record.cpu_time.unwrap_or_default() + cpu);
        }
    }
}

/// "Rotational temperatures (Kelvin)      0.00000     0.56187     0.56187"
///
/// 线性分子偶尔输出 `************` 占位，此时只剩两个可读值。
fn rotational_temperatures(line: &str) -> Option<RotationalTemperatures> {
    match (field_f64(line, 3), field_f64(line, 4), field_f64(line, 5)) {
        (Some(a), Some(b), Some(c)) => Some(RotationalTemperatures::NonLinear(a, b, c)),
        (None, Some(b), Some(c)) => Some(RotationalTemperatures::Ambiguous(b, c)),
        _ => None,
    }
}

fn job_cpu_time(line: &str) -> Option<CpuTime> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let days = parts.get(3)?.parse::<u64>().ok()?;
    let hours = parts.get(5)?.parse::<u64>().ok()?;
    let minutes = parts.get(7)?.parse::<u64>().ok()?;
    let seconds = parts.get(9)?.parse::<f64>().ok()?;
    Some(CpuTime::from_parts(days, hours, minutes, seconds, 0.0))
}

/// "Gaussian 16, Revision A.03," -> "Gaussian 16 Revision A.03"
fn program_version(lines: &[&str]) -> Option<String> {
    let re = Regex::new(r"Gaussian\s+(\d+),\s*Revision\s+([A-Za-z]\.\d+)").unwrap();
    lines.iter().find_map(|line| {
        re.captures(line)
            .map(|caps| format!("Gaussian {} Revision {}", &caps[1], &caps[2]))
    })
}

/// 从归档块读取泛函/基组，去掉 R/U 前缀
fn level_of_theory(lines: &[&str]) -> Option<String> {
    let mut level: Option<(String, String)> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.contains("External calculation") {
            return Some("ext/ext".to_string());
        }
        for (marker, sep) in [("\\Freq\\", '\\'), ("|Freq|", '|'), ("\\SP\\", '\\'), ("|SP|", '|')] {
            if trimmed.contains(marker) {
                let fields: Vec<&str> = trimmed.split(sep).collect();
                if let (Some(l), Some(b)) = (fields.get(4), fields.get(5)) {
                    level = Some((l.to_string(), b.to_string()));
                }
                break;
            }
        }
    }

    level.map(|(l, b)| {
        let l = l
            .strip_prefix('R')
            .or_else(|| l.strip_prefix('U'))
            .unwrap_or(l.as_str())
            .to_string();
        format!("{}/{}", l, b)
    })
}

/// 路由段中的 scrf 关键词
fn solvation_model(lines: &[&str]) -> String {
    let route: String = lines
        .iter()
        .skip_while(|line| !line.contains('#'))
        .take(10)
        .take_while(|line| !line.contains("--"))
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("")
        .to_lowercase();

    let re = Regex::new(r"scrf\s*=?\s*(\([^)]*\)|[^\s]+)").unwrap();
    match re.captures(&route) {
        Some(caps) => format!("scrf={}", &caps[1]),
        None => super::GAS_PHASE.to_string(),
    }
}

/// 最后一个 Standard/Input orientation 块
fn last_orientation(lines: &[&str]) -> Option<Geometry> {
    let start = lines
        .iter()
        .rposition(|l| l.contains("Standard orientation") || l.contains("Input orientation"))?;

    // 表头之后 5 行为原子行
    let atoms = lines
        .iter()
        .skip(start + 5)
        .take_while(|l| !l.contains("-----"))
        .filter_map(|l| {
            let fields: Vec<&str> = l.split_whitespace().collect();
            let z = fields.get(1)?.parse::<usize>().ok()?;
            let coords = if fields.len() > 5 { &fields[3..6] } else { fields.get(2..5)? };
            let mut position = [0.0; 3];
            for (p, c) in position.iter_mut().zip(coords) {
                *p = c.parse().ok()?;
            }
            Some(Atom {
                element: element_symbol(z).to_string(),
                position,
            })
        })
        .collect::<Vec<_>>();

    Some(Geometry { atoms })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = r#" Entering Gaussian System, Link 0=g16
 ----------------------------------------------
 #p opt freq b3lyp/6-31g(d) scrf=(smd,solvent=water)
 ----------------------------------------------
 Charge =  0 Multiplicity = 1
 SCF Done:  E(RB3LYP) =  -76.4089000     A.U. after   10 cycles
                         Standard orientation:
 ---------------------------------------------------------------------
 Center     Atomic      Atomic             Coordinates (Angstroms)
 Number     Number       Type             X           Y           Z
 ---------------------------------------------------------------------
      1          8           0        0.000000    0.000000    0.119262
      2          1           0        0.000000    0.763239   -0.477047
      3          1           0        0.000000   -0.763239   -0.477047
 ---------------------------------------------------------------------
 SCF Done:  E(RB3LYP) =  -76.4089533     A.U. after    6 cycles
 Job cpu time:       0 days  0 hours  1 minutes 30.5 seconds.
 Normal termination of Gaussian 16 at Mon Jan  1 00:00:00 2024.
 ----------------------------------------------
 #P Geom=AllCheck Guess=TCheck SCRF=Check GenChk RB3LYP/6-31G(d) Freq
 ----------------------------------------------
 SCF Done:  E(RB3LYP) =  -76.4089534     A.U. after    1 cycles
 Frequencies --   1713.1097              3727.3536              3849.1749
 Full point group                 C2V     NOp   4
 Rotational symmetry number  2.
 Rotational temperatures (Kelvin)     40.20467    20.88123    13.74280
 Molecular mass:    18.01056 amu.
 Zero-point correction=                           0.021163 (Hartree/Particle)
 1\1\GINC-NODE\Freq\RB3LYP\6-31G(d)\H2O1\USER\01-Jan-2024\0\\#P Geom=AllCheck
 Gaussian 16, Revision A.03,
 Job cpu time:       0 days  0 hours  0 minutes 20.0 seconds.
 Normal termination of Gaussian 16 at Mon Jan  1 00:01:00 2024.
 SCF Done:  E(RB3LYP) =  -76.4500000     A.U. after   12 cycles
 Job cpu time:       0 days  0 hours  5 minutes  0.0 seconds.
 Normal termination of Gaussian 16 at Mon Jan  1 00:06:00 2024.
"#;

    #[test]
    fn test_water_frequency_link() {
        let parsed = parse(WATER, "water");
        let r = &parsed.record;
        assert_eq!(r.frequencies.len(), 3);
        assert!((r.frequencies[0] - 1713.1097).abs() < 1e-9);
        assert!((r.scf_energy.unwrap() + 76.4089534).abs() < 1e-9);
        assert!((r.final_energy.unwrap() + 76.45).abs() < 1e-9);
        assert!((r.zero_point_correction.unwrap() - 0.021163).abs() < 1e-9);
        assert!((r.molecular_mass.unwrap() - 18.01056).abs() < 1e-9);
        assert_eq!(r.symmetry_number, 2);
        assert_eq!(r.multiplicity, 1);
        assert!(!r.linear);
        assert_eq!(
            r.rotational_temperatures,
            Some(RotationalTemperatures::NonLinear(40.20467, 20.88123, 13.74280))
        );
    }

    #[test]
    fn test_cpu_time_stops_at_frequency_link() {
        let parsed = parse(WATER, "water");
        // 1 min 30.5 s + 20 s，最后单点 link 的 5 min 不计入
        let cpu = parsed.record.cpu_time.unwrap();
        assert_eq!(cpu.components(), (0, 0, 1, 50));
    }

    #[test]
    fn test_metadata() {
        let parsed = parse(WATER, "water");
        assert_eq!(parsed.meta.dialect, Dialect::Gaussian);
        assert_eq!(
            parsed.meta.program_version.as_deref(),
            Some("Gaussian 16 Revision A.03")
        );
        assert_eq!(parsed.meta.level_of_theory.as_deref(), Some("B3LYP/6-31G(d)"));
        assert_eq!(parsed.meta.solvation_model, "scrf=(smd,solvent=water)");

        let geom = parsed.geometry.unwrap();
        assert_eq!(geom.element_sequence(), "OHH");
        assert!((geom.atoms[1].position[1] - 0.763239).abs() < 1e-9);
    }

    #[test]
    fn test_imaginary_modes_are_separated() {
        let text = " Gaussian\n Frequencies --   -345.2100    120.5000    980.0000\n";
        let parsed = parse(text, "ts");
        assert_eq!(parsed.record.frequencies, vec![120.5, 980.0]);
        assert_eq!(parsed.record.imaginary_frequencies, vec![-345.21]);
        assert_eq!(parsed.meta.solvation_model, "gas phase");
    }

    #[test]
    fn test_high_precision_modes_not_counted_twice() {
        let text = " Gaussian\n Frequencies ---  1713.1097  3727.3536  3849.1749\n Frequencies --   1713.1097 3727.3536 3849.1749\n";
        let parsed = parse(text, "w");
        assert_eq!(parsed.record.frequencies, vec![1713.1097, 3727.3536, 3849.1749]);

        // 只有高精度块时不算作频率任务
        let hp_only = parse(" Gaussian\n Frequencies ---  1713.1097  3727.3536\n", "w");
        assert!(hp_only.record.frequencies.is_empty());
    }

    #[test]
    fn test_linear_with_starred_rotational_temperature() {
        let text = r#" Gaussian
 Frequencies --    667.0000    667.0000   1372.0000
 Full point group                 D*H     NOp   8
 Rotational temperatures (Kelvin) ************     0.56187     0.56187
"#;
        let r = parse(text, "co2").record;
        assert!(r.linear);
        assert_eq!(
            r.rotational_temperatures,
            Some(RotationalTemperatures::Ambiguous(0.56187, 0.56187))
        );
    }

    #[test]
    fn test_single_rotational_temperature() {
        let text = " Gaussian\n Rotational temperature (Kelvin)      2.77000\n";
        let r = parse(text, "co").record;
        assert_eq!(
            r.rotational_temperatures,
            Some(RotationalTemperatures::Linear(2.77))
        );
    }

    #[test]
    fn test_mp2_energy_with_fortran_exponent() {
        let text = " Gaussian\n E2 =    -0.2039D+00 EUMP2 =    -0.76328D+02\n";
        let r = parse(text, "mp2").record;
        assert!((r.scf_energy.unwrap() + 76.328).abs() < 1e-9);
    }
}
