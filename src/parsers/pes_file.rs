//! # PES 描述文件解析器
//!
//! 文件由 PES、SPECIES、FORMAT 三段组成，段标题去掉 `-`、`#` 与空格后即为段名，
//! 以 `---` 开头的行结束当前段。
//!
//! ```text
//! #### PES
//!    Rxn: [A+B, TS, P]
//! ---
//! #### SPECIES
//!    A  : reactant_a
//!    B  : reactant_b
//!    TS : ts_conf*
//!    P  : product
//! ---
//! #### FORMAT
//!    zero  : A+B
//!    dp    : 1
//!    units : kJ/mol
//!    boltz : ee
//! ---
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/pes.rs` 调用
//! - 构造 `pes/model.rs` 的 PesSpec

use crate::error::{Result, ThermoError};
use crate::models::EnergyUnit;
use crate::pes::model::{BoltzmannDisplay, Pathway, PesFormat, PesPoint, PesSpec, SpeciesDefinition};

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Pes,
    Species,
    Format,
}

/// 解析结果与格式警告
#[derive(Debug, Clone)]
pub struct ParsedPes {
    pub spec: PesSpec,
    pub warnings: Vec<String>,
}

/// 读取并解析 PES 文件
pub fn parse_pes_file(path: &Path) -> Result<ParsedPes> {
    let text = std::fs::read_to_string(path).map_err(|e| ThermoError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_pes(&text, &path.display().to_string())
}

/// 解析 PES 文本；`source` 仅用于错误信息
pub fn parse_pes(text: &str, source: &str) -> Result<ParsedPes> {
    let mut section = Section::None;
    let mut species = Vec::new();
    let mut pathways = Vec::new();
    let mut format = PesFormat::default();
    let mut zero: Option<PesPoint> = None;
    let mut warnings = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(header) = section_header(line) {
            section = header;
            continue;
        }
        if line.starts_with("---") {
            section = Section::None;
            continue;
        }
        if line.starts_with('#') || line.len() < 2 {
            continue;
        }

        match section {
            Section::None => {}
            Section::Pes => match split_entry(line) {
                Some((name, value)) => pathways.push(Pathway {
                    name: name.to_string(),
                    points: value
                        .trim_start_matches('[')
                        .trim_end_matches(']')
                        .split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(PesPoint::parse)
                        .collect(),
                }),
                None => warnings.push(format!("{}: pathway line '{}' is incorrectly formatted", source, line)),
            },
            Section::Species => {
                if line.to_lowercase().contains("folder") {
                    continue;
                }
                match split_entry(line) {
                    Some((name, pattern)) if !pattern.is_empty() => {
                        species.push(SpeciesDefinition::new(name, pattern))
                    }
                    _ => warnings.push(format!("{}: species line '{}' is incorrectly formatted", source, line)),
                }
            }
            Section::Format => {
                let Some((key, value)) = split_entry(line) else {
                    warnings.push(format!("{}: format line '{}' is incorrectly formatted", source, line));
                    continue;
                };
                match key.to_lowercase().as_str() {
                    "zero" => zero = Some(PesPoint::parse(value)),
                    "dp" => match value.parse::<usize>() {
                        Ok(dp) => format.decimals = dp,
                        Err(_) => warnings.push(format!("{}: invalid decimal places '{}'", source, value)),
                    },
                    "units" => match value.parse::<EnergyUnit>() {
                        Ok(units) => format.units = units,
                        Err(e) => warnings.push(format!("{}: {}", source, e)),
                    },
                    "boltz" => match parse_boltz(value) {
                        Some(b) => format.boltz = b,
                        None => warnings.push(format!("{}: invalid boltz option '{}'", source, value)),
                    },
                    other => warnings.push(format!("{}: unknown FORMAT key '{}'", source, other)),
                }
            }
        }
    }

    let zero = zero
        .filter(|z| !z.fragments.is_empty())
        .ok_or_else(|| ThermoError::PesFormat {
            path: source.to_string(),
            reason: "no energy zero defined (add 'zero : <species>' to the FORMAT section)".to_string(),
        })?;

    if pathways.is_empty() {
        warnings.push(format!("{}: no pathways defined in the PES section", source));
    }

    Ok(ParsedPes {
        spec: PesSpec {
            species,
            format,
            zero,
            pathways,
        },
        warnings,
    })
}

/// 段标题识别
fn section_header(line: &str) -> Option<Section> {
    let bare: String = line
        .chars()
        .filter(|c| !matches!(c, '-' | '#') && !c.is_whitespace())
        .collect();
    match bare.to_uppercase().as_str() {
        "PES" => Some(Section::Pes),
        "SPECIES" => Some(Section::Species),
        "FORMAT" => Some(Section::Format),
        _ => None,
    }
}

/// `key = value` 或 `key : value`
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    let value = line[pos + 1..].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_boltz(value: &str) -> Option<BoltzmannDisplay> {
    match value.trim().to_lowercase().as_str() {
        "ee" => Some(BoltzmannDisplay::Ee),
        "true" | "yes" | "on" => Some(BoltzmannDisplay::On),
        "false" | "no" | "off" => Some(BoltzmannDisplay::Off),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
#### PES
   Rxn:  [A+B, TS, P]
   Side = [A+B, , Int]
---
#### SPECIES
   folder = ./logs
   A  : reactant_a
   B  = reactant_b
   TS : ts_conf*
   P  : product
   broken line
---
#### FORMAT
   zero  : A + B
   dp    : 1
   units : kJ/mol
   boltz : ee
---
"#;

    #[test]
    fn test_parse_sample() {
        let parsed = parse_pes(SAMPLE, "sample.yaml").unwrap();
        let spec = &parsed.spec;

        assert_eq!(spec.pathways.len(), 2);
        assert_eq!(spec.pathways[0].name, "Rxn");
        assert_eq!(spec.pathways[0].points.len(), 3);
        assert_eq!(spec.pathways[0].points[0].fragments, vec!["A", "B"]);
        // 空点被忽略
        assert_eq!(spec.pathways[1].points.len(), 2);

        assert_eq!(spec.species.len(), 4);
        let find = |name: &str| spec.species.iter().find(|s| s.name == name).unwrap();
        assert!(find("TS").is_group());
        assert_eq!(find("B").pattern, "reactant_b");

        assert_eq!(spec.zero.fragments, vec!["A", "B"]);
        assert_eq!(spec.format.decimals, 1);
        assert_eq!(spec.format.units, EnergyUnit::KjPerMol);
        assert_eq!(spec.format.boltz, BoltzmannDisplay::Ee);

        // "broken line" 没有分隔符
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_missing_zero_is_error() {
        let text = "--- PES ---\nRxn: [A]\n---\n--- SPECIES ---\nA: a\n---\n";
        assert!(matches!(
            parse_pes(text, "x"),
            Err(ThermoError::PesFormat { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let text = "#PES\nRxn: [A]\n---\n#FORMAT\nzero: A\n---\n";
        let parsed = parse_pes(text, "x").unwrap();
        assert_eq!(parsed.spec.format, PesFormat::default());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_invalid_format_values_warn() {
        let text = "#PES\nRxn: [A]\n---\n#FORMAT\nzero: A\ndp: two\nboltz: maybe\n---\n";
        let parsed = parse_pes(text, "x").unwrap();
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.spec.format.decimals, 2);
    }
}
