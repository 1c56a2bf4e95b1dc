//! # scan 子命令实现
//!
//! 在温度区间内逐点重新计算热化学；未指定 `-c` 时浓度随温度取 1 atm。
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `commands/pipeline.rs`, `thermo/`

use crate::cli::scan::ScanArgs;
use crate::commands::pipeline::{self, Structure};
use crate::commands::thermo::print_settings;
use crate::error::Result;
use crate::models::RunOptions;
use crate::thermo::constants::one_atm_concentration;
use crate::utils::output;

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// 变温表的一行
#[derive(Debug, Clone, Tabled)]
struct ScanRow {
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "T (K)")]
    temperature: String,
    #[tabled(rename = "H")]
    enthalpy: String,
    #[tabled(rename = "T.S")]
    ts: String,
    #[tabled(rename = "T.qh-S")]
    qh_ts: String,
    #[tabled(rename = "G(T)")]
    gibbs: String,
    #[tabled(rename = "qh-G(T)")]
    qh_gibbs: String,
}

/// 执行 scan 子命令
pub fn execute(args: ScanArgs) -> Result<()> {
    output::print_header("Variable-Temperature Thermochemistry");

    let temperatures = args.temperatures()?;
    let (structures, options, scale) = pipeline::prepare(&args.run)?;
    print_settings(&options, &scale);
    output::print_info(&format!(
        "Temperature range {} - {} K ({} points)",
        temperatures.first().copied().unwrap_or_default(),
        temperatures.last().copied().unwrap_or_default(),
        temperatures.len()
    ));

    let rows = scan_rows(&structures, &options, &temperatures, args.run.concentration.is_some());
    let mut table = Table::new(&rows);
    table.with(Style::psql());
    println!("{}", table);

    Ok(())
}

/// 每个结构在每个温度下一行，结构优先排序
fn scan_rows(structures: &[Structure], base: &RunOptions, temperatures: &[f64], fixed_conc: bool) -> Vec<ScanRow> {
    let mut per_temperature: Vec<Vec<ScanRow>> = Vec::with_capacity(temperatures.len());

    for &t in temperatures {
        let options = RunOptions {
            temperature: t,
            concentration: if fixed_conc { base.concentration } else { one_atm_concentration(t) },
            ..base.clone()
        };
        let results = pipeline::evaluate_all(structures, &options);
        per_temperature.push(
            results
                .iter()
                .map(|r| {
                    let cell = |v: Option<f64>| v.map(|x| format!("{:.6}", x)).unwrap_or_else(|| "---".to_string());
                    ScanRow {
                        structure: r.name.clone(),
                        temperature: format!("{:.1}", t),
                        enthalpy: cell(r.enthalpy),
                        ts: cell(r.entropy.map(|s| s * t)),
                        qh_ts: cell(r.qh_entropy.map(|s| s * t)),
                        gibbs: cell(r.gibbs),
                        qh_gibbs: cell(r.qh_gibbs),
                    }
                })
                .collect(),
        );
    }

    (0..structures.len())
        .flat_map(|i| per_temperature.iter().map(move |rows| rows[i].clone()))
        .collect()
}
