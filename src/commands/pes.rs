//! # pes 子命令实现
//!
//! 读取 PES 描述文件，把各结构的热化学结果汇总为每条路径的相对能量表，
//! 可选输出布居、对映体过量 (ee) 与能量剖面图。
//!
//! ## 依赖关系
//! - 使用 `cli/pes.rs` 定义的参数
//! - 使用 `parsers/pes_file.rs`, `pes/`
//! - 被 `commands/thermo.rs` 复用（`--pes`）

use crate::cli::pes::PesArgs;
use crate::commands::pipeline;
use crate::commands::thermo::print_settings;
use crate::error::Result;
use crate::models::{RunOptions, ThermoResult};
use crate::parsers::pes_file;
use crate::pes::model::{PathwayTable, Populations};
use crate::pes::{self, PesTable};
use crate::utils::output;

use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

pub const DEFAULT_PLOT_WIDTH: u32 = 1024;
pub const DEFAULT_PLOT_HEIGHT: u32 = 768;

/// 执行 pes 子命令
pub fn execute(args: PesArgs) -> Result<()> {
    output::print_header("Potential Energy Surface");

    let (structures, options, scale) = pipeline::prepare(&args.run)?;
    print_settings(&options, &scale);
    let results = pipeline::evaluate_all(&structures, &options);

    report(
        &args.pes_file,
        &results,
        &options,
        args.plot.as_deref(),
        (args.width, args.height),
    )
}

/// 解析 PES 文件、汇总并打印；`plot` 给出时同时保存剖面图
pub fn report(
    pes_file: &Path,
    results: &[ThermoResult],
    options: &RunOptions,
    plot: Option<&Path>,
    (width, height): (u32, u32),
) -> Result<()> {
    let parsed = pes_file::parse_pes_file(pes_file)?;
    for warning in &parsed.warnings {
        output::print_warning(warning);
    }

    let table = pes::assemble(&parsed.spec, results, options)?;
    for warning in &table.warnings {
        output::print_warning(&warning.to_string());
    }

    for pathway in &table.pathways {
        output::print_header(&format!(
            "RXN: {} ({}) at T: {} K",
            pathway.name, table.units, table.temperature
        ));
        println!("{}", render_pathway(pathway, &table));
    }

    if let Some(path) = plot {
        pes::plot::generate_profile_plot(&table, path, width, height)?;
        output::print_success(&format!("Energy profile saved to '{}'", path.display()));
    }

    Ok(())
}

fn render_pathway(pathway: &PathwayTable, table: &PesTable) -> String {
    let dp = table.decimals;
    let show_spc = pathway.rows.iter().any(|r| r.relative.sp_energy.is_some());
    let show_pop = pathway.rows.iter().any(|r| r.population.is_some());

    let mut header: Vec<String> = vec!["Point".to_string()];
    if show_spc {
        header.push("DE_SPC".to_string());
    }
    header.extend(
        ["DE", "DZPE", "DH", "T.DS", "T.qh-DS", "DG(T)", "qh-DG(T)"]
            .iter()
            .map(|s| s.to_string()),
    );
    if show_pop {
        header.extend(["Boltz E (%)", "Boltz H (%)", "Boltz G (%)", "Boltz qh-G (%)"].iter().map(|s| s.to_string()));
    }

    let mut builder = Builder::default();
    builder.push_record(header);

    let blank_energies = 7 + usize::from(show_spc);
    let pop_cells = |p: &Populations| p.values().iter().map(|v| format!("{:.1}", v)).collect::<Vec<_>>();

    for row in &pathway.rows {
        let r = &row.relative;
        let mut cells = vec![row.label.clone()];
        if show_spc {
            cells.push(
                r.sp_energy
                    .map(|v| format!("{:.*}", dp, v))
                    .unwrap_or_else(|| "---".to_string()),
            );
        }
        cells.extend(
            [r.energy, r.zpe, r.enthalpy, r.ts, r.qh_ts, r.gibbs, r.qh_gibbs]
                .iter()
                .map(|v| format!("{:.*}", dp, v)),
        );
        if show_pop {
            match &row.population {
                Some(p) => cells.extend(pop_cells(p)),
                None => cells.extend(std::iter::repeat(String::new()).take(4)),
            }
        }
        builder.push_record(cells);
    }

    if let Some(ee) = &pathway.ee {
        let mut cells = vec!["ee (%)".to_string()];
        cells.extend(std::iter::repeat(String::new()).take(blank_energies));
        cells.extend(pop_cells(ee));
        builder.push_record(cells);
    }

    let mut rendered = builder.build();
    rendered.with(Style::psql());
    rendered.to_string()
}
