//! # thermo 子命令实现
//!
//! 逐结构输出热化学表，并按需附加 Boltzmann 布居、簇汇总、CPU 时间、
//! 一致性检查、CSV 导出与 PES 报告。
//!
//! ## 依赖关系
//! - 使用 `cli/thermo.rs` 定义的参数
//! - 使用 `commands/pipeline.rs` 取得结构与结果
//! - 使用 `checks/`, `thermo/boltzmann.rs`, `utils/output.rs`

use crate::checks::{self, CheckOutcome, CheckSubject};
use crate::cli::thermo::ThermoArgs;
use crate::commands::pipeline::{self, ScaleChoice, Structure};
use crate::commands::pes::{self as pes_command, DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH};
use crate::error::{Result, ThermoError};
use crate::models::{CpuTime, RunOptions, ThermoResult, ThermoWarning};
use crate::thermo::{boltzmann_weights, summarize_clusters, ClusterSummary};
use crate::utils::output;

use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

const MISSING: &str = "---";

/// 执行 thermo 子命令
pub fn execute(args: ThermoArgs) -> Result<()> {
    output::print_header("Quasi-Harmonic Thermochemistry");

    let (structures, options, scale) = pipeline::prepare(&args.run)?;
    print_settings(&options, &scale);

    let results = pipeline::evaluate_all(&structures, &options);
    let show_spc = structures.iter().any(|s| s.parsed.record.sp_energy.is_some());
    let populations = args.boltz.then(|| populations(&results, options.temperature));

    let table = build_table(&results, &options, show_spc, populations.as_deref(), args.imag);
    println!("{}", table);
    report_warnings(&results);

    if !args.clusters.is_empty() {
        let summaries = clusters(&results, &args.clusters, options.temperature)?;
        print_clusters(&summaries);
    }

    if args.cpu {
        let total: CpuTime = results.iter().filter_map(|r| r.cpu_time).sum();
        output::print_info(&format!("TOTAL CPU {}", total));
    }

    if args.check {
        print_checks(&structures, &results, options.temperature);
    }

    if let Some(path) = &args.csv {
        save_results_csv(&results, &options, path)?;
        output::print_success(&format!("Thermochemistry table saved to '{}'", path.display()));
    }

    if let Some(pes_file) = &args.pes {
        pes_command::report(
            pes_file,
            &results,
            &options,
            args.plot.as_deref(),
            (DEFAULT_PLOT_WIDTH, DEFAULT_PLOT_HEIGHT),
        )?;
    }

    Ok(())
}

/// 打印本次运行的参数与文献
pub(crate) fn print_settings(options: &RunOptions, scale: &ScaleChoice) {
    output::print_info(&format!("Temperature = {} Kelvin", options.temperature));
    output::print_info(&format!("Concentration = {:.6} mol/L", options.concentration));
    output::print_info(&format!(
        "Quasi-harmonic model: {} ({}); frequency cut-off = {} wavenumbers",
        options.qh_method.description(),
        options.qh_method.reference(),
        options.freq_cutoff
    ));
    output::print_info(&format!(
        "Frequency scale factor = {} ({})",
        options.scale_factor, scale.source
    ));
    if options.solvent.is_corrected() {
        output::print_info(&format!(
            "Free space in {} = {:.1} mL/L (Shakhnovich and Whitesides)",
            options.solvent,
            options.solvent.free_space()
        ));
    }
}

/// 全部完整结果的 qh-G 布居 (%)；不完整的结构为 None
fn populations(results: &[ThermoResult], temperature: f64) -> Vec<Option<f64>> {
    let complete: Vec<f64> = results.iter().filter_map(|r| r.qh_gibbs).collect();
    let mut weights = boltzmann_weights(&complete, temperature).into_iter();
    results
        .iter()
        .map(|r| r.qh_gibbs.and_then(|_| weights.next()).map(|w| w * 100.0))
        .collect()
}

fn fmt_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_else(|| MISSING.to_string())
}

fn build_table(
    results: &[ThermoResult],
    options: &RunOptions,
    show_spc: bool,
    populations: Option<&[Option<f64>]>,
    show_imag: bool,
) -> tabled::Table {
    let t = options.temperature;
    let mut builder = Builder::default();

    let mut header = vec!["".to_string(), "Structure".to_string()];
    if show_spc {
        header.push("E_SPC".to_string());
    }
    header.extend(
        ["E", "ZPE", "H", "T.S", "T.qh-S", "G(T)", "qh-G(T)"]
            .iter()
            .map(|s| s.to_string()),
    );
    if populations.is_some() {
        header.push("Boltz (%)".to_string());
    }
    if show_imag {
        header.push("im freq".to_string());
    }
    builder.push_record(header);

    for (i, r) in results.iter().enumerate() {
        let mut row = vec![
            if r.is_complete() { "o" } else { "x" }.to_string(),
            r.name.clone(),
        ];
        if show_spc {
            row.push(fmt_value(r.sp_energy));
        }
        row.extend([
            fmt_value(r.scf_energy),
            fmt_value(r.zpe),
            fmt_value(r.enthalpy),
            fmt_value(r.entropy.map(|s| s * t)),
            fmt_value(r.qh_entropy.map(|s| s * t)),
            fmt_value(r.gibbs),
            fmt_value(r.qh_gibbs),
        ]);
        if let Some(pops) = populations {
            row.push(
                pops[i]
                    .map(|p| format!("{:.2}", p))
                    .unwrap_or_else(|| MISSING.to_string()),
            );
        }
        if show_imag {
            let imag: Vec<String> = r.imaginary_frequencies.iter().map(|f| format!("{:.2}", f)).collect();
            row.push(imag.join(" "));
        }
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::psql());
    table
}

fn report_warnings(results: &[ThermoResult]) {
    for r in results {
        if r.linear_warning() {
            output::print_warning(&format!(
                "{}: WARNING! {}",
                r.name,
                ThermoWarning::LinearGeometryAmbiguous
            ));
        } else if !r.is_complete() {
            output::print_warning(&format!("{}: {}", r.name, ThermoWarning::IncompleteRecord));
        }
    }
}

/// 按通配符把结构名分组，布居以全部完整结构为基准
fn clusters(results: &[ThermoResult], patterns: &[String], temperature: f64) -> Result<Vec<ClusterSummary>> {
    let complete: Vec<(&str, f64)> = results
        .iter()
        .filter_map(|r| r.qh_gibbs.map(|g| (r.name.as_str(), g)))
        .collect();
    let values: Vec<f64> = complete.iter().map(|(_, g)| *g).collect();

    let mut groups = Vec::with_capacity(patterns.len());
    for (n, pattern) in patterns.iter().enumerate() {
        let glob = glob::Pattern::new(pattern)
            .map_err(|e| ThermoError::InvalidArgument(format!("Invalid cluster pattern '{}': {}", pattern, e)))?;
        let members: Vec<usize> = complete
            .iter()
            .enumerate()
            .filter(|(_, (name, _))| glob.matches(name))
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            output::print_warning(&format!("Cluster pattern '{}' matches no complete structure", pattern));
        }
        groups.push((format!("Boltzmann-weighted Cluster {}", cluster_label(n)), members));
    }

    Ok(summarize_clusters(&values, &groups, temperature))
}

/// 0 -> A, 25 -> Z, 26 -> AA
fn cluster_label(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if index < 26 {
        letter.to_string()
    } else {
        format!("{}{}", cluster_label(index / 26 - 1), letter)
    }
}

fn print_clusters(summaries: &[ClusterSummary]) {
    let mut builder = Builder::default();
    builder.push_record(["Cluster", "qh-G(T)", "Boltz (%)"]);
    for c in summaries {
        builder.push_record([
            c.name.clone(),
            format!("{:.6}", c.weighted_qh_gibbs),
            format!("{:.2}", c.population),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::psql());
    println!("\n{}", table);
}

fn print_outcomes(outcomes: &[CheckOutcome]) {
    for outcome in outcomes {
        if outcome.is_pass() {
            output::print_success(outcome.message());
        } else {
            output::print_warning(outcome.message());
        }
    }
}

fn print_checks(structures: &[Structure], results: &[ThermoResult], temperature: f64) {
    output::print_header("Checks for thermochemistry calculations (frequency calculations)");
    let subjects: Vec<CheckSubject> = structures
        .iter()
        .zip(results)
        .map(|(s, r)| CheckSubject { parsed: &s.parsed, result: r })
        .collect();
    print_outcomes(&checks::run_frequency_checks(&subjects, temperature));

    let pairs: Vec<_> = structures
        .iter()
        .filter_map(|s| s.spc.as_ref().map(|spc| (&s.parsed, spc)))
        .collect();
    if !pairs.is_empty() {
        output::print_header("Checks for single-point corrections");
        print_outcomes(&checks::run_single_point_checks(&pairs));
    }
}

/// 保存结果到 CSV
fn save_results_csv(results: &[ThermoResult], options: &RunOptions, output_path: &Path) -> Result<()> {
    let t = options.temperature;
    let mut wtr = csv::Writer::from_path(output_path).map_err(ThermoError::CsvError)?;

    wtr.write_record([
        "structure", "e_spc", "e", "zpe", "h", "t_s", "t_qh_s", "g", "qh_g", "im_freq", "status",
    ])
    .map_err(ThermoError::CsvError)?;

    let cell = |v: Option<f64>| v.map(|x| format!("{:.10}", x)).unwrap_or_default();

    for r in results {
        let imag: Vec<String> = r.imaginary_frequencies.iter().map(|f| format!("{:.4}", f)).collect();
        wtr.write_record([
            r.name.clone(),
            cell(r.sp_energy),
            cell(r.scf_energy),
            cell(r.zpe),
            cell(r.enthalpy),
            cell(r.entropy.map(|s| s * t)),
            cell(r.qh_entropy.map(|s| s * t)),
            cell(r.gibbs),
            cell(r.qh_gibbs),
            imag.join(" "),
            if r.is_complete() { "ok" } else { "incomplete" }.to_string(),
        ])
        .map_err(ThermoError::CsvError)?;
    }

    wtr.flush().map_err(|e| ThermoError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
