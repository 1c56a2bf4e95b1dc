//! # PES 组装
//!
//! 将各结构的热化学结果按 PES 描述组合为相对能量表：
//! 物种解析（单文件或构象组 Boltzmann 平均）、片段求和、减去能量零点、
//! 单位换算，以及每条路径的布居与 ee。
//!
//! ## 依赖关系
//! - 被 `commands/pes.rs` 调用
//! - 使用 `thermo/boltzmann.rs` 的 aggregate, boltzmann_weights
//! - 使用 `pes/model.rs`

use crate::error::{Result, ThermoError};
use crate::models::{EnergyProfile, EnergyUnit, RunOptions, ThermoResult};
use crate::pes::model::{
    BoltzmannDisplay, PathwayTable, PesPoint, PesRow, PesSpec, PesTable, PesWarning,
    Populations, RelativeEnergies,
};
use crate::thermo::boltzmann::{aggregate, boltzmann_weights};

use std::collections::HashMap;

/// 组装 PES 相对能量表
///
/// 零点中任一片段不可用即返回 `MissingZeroReference`；
/// 路径上的点若引用不可用结构则跳过并记录警告。
pub fn assemble(spec: &PesSpec, results: &[ThermoResult], options: &RunOptions) -> Result<PesTable> {
    let temperature = options.temperature;
    let mut warnings = Vec::new();

    let resolved = resolve_species(spec, results, temperature, &mut warnings);

    let zero = sum_fragments(&spec.zero, &resolved).map_err(|structure| {
        ThermoError::MissingZeroReference { structure }
    })?;

    let units = spec.format.units;
    let mut pathways = Vec::with_capacity(spec.pathways.len());

    for pathway in &spec.pathways {
        let mut points: Vec<(String, EnergyProfile)> = Vec::new();
        for point in &pathway.points {
            match sum_fragments(point, &resolved) {
                Ok(profile) => points.push((point.label.clone(), profile - zero)),
                Err(structure) => warnings.push(PesWarning::MissingConformerData {
                    pathway: pathway.name.clone(),
                    point: point.label.clone(),
                    structure,
                }),
            }
        }

        let populations = if spec.format.boltz.is_enabled() {
            Some(path_populations(&points, temperature))
        } else {
            None
        };

        let rows: Vec<PesRow> = points
            .iter()
            .enumerate()
            .map(|(i, (label, relative))| PesRow {
                label: label.clone(),
                relative: to_display(relative, units, temperature),
                population: populations.as_ref().map(|p| p[i]),
            })
            .collect();

        let ee = match (&spec.format.boltz, populations.as_deref()) {
            (BoltzmannDisplay::Ee, Some([first, second])) => Some(enantiomeric_excess(first, second)),
            _ => None,
        };

        pathways.push(PathwayTable {
            name: pathway.name.clone(),
            rows,
            ee,
        });
    }

    Ok(PesTable {
        units,
        decimals: spec.format.decimals,
        temperature,
        pathways,
        warnings,
    })
}

/// 将 SPECIES 名称解析为绝对热化学量
///
/// 构象组在此处做 Boltzmann 平均，组内结果不完整的构象被排除并记录警告；
/// 没有完整结果的物种不进入映射。
fn resolve_species(
    spec: &PesSpec,
    results: &[ThermoResult],
    temperature: f64,
    warnings: &mut Vec<PesWarning>,
) -> HashMap<String, EnergyProfile> {
    let mut resolved = HashMap::new();

    for definition in &spec.species {
        let mut members: Vec<EnergyProfile> = Vec::new();
        for result in results.iter().filter(|r| definition.matches(&r.name)) {
            match result.profile() {
                Some(p) => members.push(p),
                None if definition.is_group() => warnings.push(PesWarning::IncompleteConformer {
                    species: definition.name.clone(),
                    structure: result.name.clone(),
                }),
                None => {}
            }
        }

        let profile = if definition.is_group() {
            aggregate(&members, temperature)
        } else {
            members.first().copied()
        };

        match profile {
            Some(p) => {
                resolved.insert(definition.name.clone(), p);
            }
            None => warnings.push(PesWarning::SpeciesUnavailable {
                species: definition.name.clone(),
                pattern: definition.pattern.clone(),
            }),
        }
    }

    resolved
}

/// 片段求和；返回第一个不可用片段的名称作为错误
fn sum_fragments(
    point: &PesPoint,
    resolved: &HashMap<String, EnergyProfile>,
) -> std::result::Result<EnergyProfile, String> {
    if point.fragments.is_empty() {
        return Err(point.label.clone());
    }
    point
        .fragments
        .iter()
        .map(|f| resolved.get(f).copied().ok_or_else(|| f.clone()))
        .sum()
}

/// Hartree 相对量 -> 显示单位，熵项乘以 T
fn to_display(relative: &EnergyProfile, units: EnergyUnit, temperature: f64) -> RelativeEnergies {
    let conv = |v: f64| units.from_hartree(v);
    RelativeEnergies {
        sp_energy: relative.sp_energy.map(conv),
        energy: conv(relative.energy),
        zpe: conv(relative.zpe),
        enthalpy: conv(relative.enthalpy),
        ts: conv(temperature * relative.entropy),
        qh_ts: conv(temperature * relative.qh_entropy),
        gibbs: conv(relative.gibbs),
        qh_gibbs: conv(relative.qh_gibbs),
    }
}

/// 路径内各点的布居 (%)，E/H/G/qh-G 各自独立归一化
fn path_populations(points: &[(String, EnergyProfile)], temperature: f64) -> Vec<Populations> {
    let column = |f: fn(&EnergyProfile) -> f64| -> Vec<f64> {
        let values: Vec<f64> = points.iter().map(|(_, p)| f(p)).collect();
        boltzmann_weights(&values, temperature)
            .into_iter()
            .map(|w| w * 100.0)
            .collect()
    };

    let e = column(|p| p.energy);
    let h = column(|p| p.enthalpy);
    let g = column(|p| p.gibbs);
    let qh_g = column(|p| p.qh_gibbs);

    (0..points.len())
        .map(|i| Populations {
            energy: e[i],
            enthalpy: h[i],
            gibbs: g[i],
            qh_gibbs: qh_g[i],
        })
        .collect()
}

fn enantiomeric_excess(first: &Populations, second: &Populations) -> Populations {
    Populations {
        energy: first.energy - second.energy,
        enthalpy: first.enthalpy - second.enthalpy,
        gibbs: first.gibbs - second.gibbs,
        qh_gibbs: first.qh_gibbs - second.qh_gibbs,
    }
}
