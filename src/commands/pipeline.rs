//! # 共用处理流程
//!
//! 收集文件 -> 并行解析（附加单点能）-> 决定缩放因子 -> 并行计算热化学。
//! 三个子命令都从这里取得结构与结果。
//!
//! ## 依赖关系
//! - 被 `commands/thermo.rs`, `commands/pes.rs`, `commands/scan.rs` 调用
//! - 使用 `batch/`, `parsers/`, `thermo/`

use crate::batch::{single_point_path, BatchRunner, FileCollector, ProcessResult};
use crate::cli::run::{RunArgs, SpcMode};
use crate::error::{Result, ThermoError};
use crate::models::{RunOptions, ThermoResult};
use crate::parsers::scale_factors::ScaleFactorTable;
use crate::parsers::{self, ParsedOutput};
use crate::thermo;
use crate::utils::output;

use rayon::prelude::*;
use std::path::Path;

/// 一个结构：频率文件及（可选的）单点能文件
#[derive(Debug, Clone)]
pub struct Structure {
    /// 频率文件解析结果，记录中已附加单点能
    pub parsed: ParsedOutput,
    /// `--spc <suffix>` 时的单点能文件
    pub spc: Option<ParsedOutput>,
}

/// 缩放因子及其来源说明
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleChoice {
    pub value: f64,
    pub source: String,
}

/// 校验参数、读取文件并确定最终运行参数
///
/// 未知的准谐方法或溶剂在读取文件之前即报错。
pub fn prepare(args: &RunArgs) -> Result<(Vec<Structure>, RunOptions, ScaleChoice)> {
    args.to_options(1.0)?;
    let structures = load_structures(args)?;
    let scale = resolve_scale_factor(args, &structures)?;
    let options = args.to_options(scale.value)?;
    Ok((structures, options, scale))
}

/// 收集并并行解析全部输入；单个文件失败只产生警告
pub fn load_structures(args: &RunArgs) -> Result<Vec<Structure>> {
    let files = FileCollector::new(args.inputs.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .excluding_spc(args.spc_suffix())
        .collect()?;

    let spc_mode = args.spc_mode();
    let mut runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Reading {} output file(s) with {} thread(s)...",
        files.len(),
        runner.jobs()
    ));
    if files.len() < 2 {
        runner = runner.quiet();
    }
    let batch = runner.run(&files, |path| match load_one(path, spc_mode.as_ref()) {
        Ok(structure) => ProcessResult::Success(structure),
        Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
    })?;

    for (path, err) in &batch.failures {
        output::print_warning(&format!("Skipping {}: {}", path, err));
    }
    if !batch.failures.is_empty() {
        output::print_info(&format!("Read {} of {} file(s)", batch.outputs.len(), batch.total()));
    }

    if batch.outputs.is_empty() {
        return Err(ThermoError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }
    Ok(batch.outputs)
}

/// 解析单个频率文件并附加单点能
fn load_one(path: &Path, spc: Option<&SpcMode>) -> Result<Structure> {
    let mut parsed = parsers::parse_output_file(path)?;

    let spc_output = match spc {
        None => None,
        Some(SpcMode::Link) => {
            let energy = parsed.record.final_energy;
            parsed.record = parsed.record.with_single_point(energy, None);
            None
        }
        Some(SpcMode::Suffix(suffix)) => {
            let spc_path = single_point_path(path, suffix).ok_or_else(|| ThermoError::FileNotFound {
                path: format!("{}_{}.*", parsers::structure_name(path), suffix),
            })?;
            let spc_parsed = parsers::parse_output_file(&spc_path)?;
            let energy = spc_parsed.record.final_energy.or(spc_parsed.record.scf_energy);
            parsed.record = parsed.record.with_single_point(energy, spc_parsed.record.cpu_time);
            Some(spc_parsed)
        }
    };

    Ok(Structure {
        parsed,
        spc: spc_output,
    })
}

/// 显式 `-v` 优先；否则所有文件理论级别相同且能在表中找到时取表值；否则 1.0
pub fn resolve_scale_factor(args: &RunArgs, structures: &[Structure]) -> Result<ScaleChoice> {
    if let Some(value) = args.scale_factor {
        return Ok(ScaleChoice {
            value,
            source: "user-defined".to_string(),
        });
    }

    let default = ScaleChoice {
        value: 1.0,
        source: "default".to_string(),
    };
    let Some(table_path) = &args.scale_table else {
        return Ok(default);
    };
    let table = ScaleFactorTable::from_path(table_path)?;
    if table.is_empty() {
        output::print_warning(&format!("Scale-factor table {} is empty", table_path.display()));
        return Ok(default);
    }
    output::print_info(&format!(
        "Loaded {} scale factor(s) from {}",
        table.len(),
        table_path.display()
    ));

    let levels: Vec<Option<&str>> = structures
        .iter()
        .map(|s| s.parsed.meta.level_of_theory.as_deref())
        .collect();
    let Some(Some(level)) = levels.first().copied() else {
        return Ok(default);
    };
    if levels.iter().any(|l| !l.is_some_and(|l| l.eq_ignore_ascii_case(level))) {
        output::print_warning("Different levels of theory found; using a scale factor of 1.0");
        return Ok(default);
    }

    match table.lookup(level) {
        Some(entry) => Ok(ScaleChoice {
            value: entry.zpe_fac,
            source: if entry.reference.is_empty() {
                format!("{} from {}", level, table_path.display())
            } else {
                format!("{} ({})", level, entry.reference)
            },
        }),
        None => {
            output::print_warning(&format!(
                "No scale factor for {} in {}; using 1.0",
                level,
                table_path.display()
            ));
            Ok(default)
        }
    }
}

/// 并行计算热化学，结果顺序与结构顺序一致
pub fn evaluate_all(structures: &[Structure], options: &RunOptions) -> Vec<ThermoResult> {
    structures
        .par_iter()
        .map(|s| thermo::evaluate(&s.parsed.record, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        run: RunArgs,
    }

    fn run_args(args: &[&str]) -> RunArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(args);
        Harness::try_parse_from(full).unwrap().run
    }

    fn structure(level: Option<&str>) -> Structure {
        let mut parsed = parsers::parse_output(" Entering Gaussian System\n", "x").unwrap();
        parsed.meta.level_of_theory = level.map(str::to_string);
        Structure {
            parsed,
            spc: None,
        }
    }

    #[test]
    fn test_explicit_scale_factor_wins() {
        let args = run_args(&["x.log", "-v", "0.95", "--scale-table", "missing.csv"]);
        let choice = resolve_scale_factor(&args, &[structure(Some("B3LYP/6-31G(d)"))]).unwrap();
        assert!((choice.value - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_scale_table_lookup() {
        let dir = std::env::temp_dir().join(format!("qhthermo_scale_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let table = dir.join("scale.csv");
        fs::write(&table, "level,zpe_fac,reference\nB3LYP/6-31G(d),0.977,Truhlar\n").unwrap();
        let table_arg = table.display().to_string();
        let args = run_args(&["x.log", "--scale-table", &table_arg]);

        let same = [structure(Some("B3LYP/6-31G(d)")), structure(Some("b3lyp/6-31g(d)"))];
        let choice = resolve_scale_factor(&args, &same).unwrap();
        assert!((choice.value - 0.977).abs() < 1e-12);

        let mixed = [structure(Some("B3LYP/6-31G(d)")), structure(Some("M062X/def2TZVP"))];
        assert!((resolve_scale_factor(&args, &mixed).unwrap().value - 1.0).abs() < 1e-12);

        let unknown = [structure(None)];
        assert!((resolve_scale_factor(&args, &unknown).unwrap().value - 1.0).abs() < 1e-12);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_link_single_point_uses_final_energy() {
        let dir = std::env::temp_dir().join(format!("qhthermo_link_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("m.log");
        fs::write(
            &file,
            " Entering Gaussian System\n SCF Done:  E(RB3LYP) =  -76.4089533     A.U. after   10 cycles\n Normal termination of Gaussian 16\n SCF Done:  E(RM062X) =  -76.5000000     A.U. after   10 cycles\n",
        )
        .unwrap();

        let structure = load_one(&file, Some(&SpcMode::Link)).unwrap();
        assert!((structure.parsed.record.sp_energy.unwrap() + 76.5).abs() < 1e-9);
        assert!(structure.spc.is_none());

        let missing = load_one(&file, Some(&SpcMode::Suffix("TZ".to_string())));
        assert!(matches!(missing, Err(ThermoError::FileNotFound { .. })));
        fs::remove_dir_all(dir).unwrap();
    }
}
