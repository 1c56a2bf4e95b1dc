//! # PES 能量剖面图
//!
//! 使用 `plotters` 绘制各路径的 qh-ΔG 剖面：每个点画一条水平短线，
//! 相邻点之间以细线连接。支持 PNG 与 SVG 输出。
//!
//! ## 依赖关系
//! - 被 `commands/pes.rs` 调用
//! - 使用 `pes/model.rs` 的 PesTable

use crate::error::{Result, ThermoError};
use crate::pes::model::PesTable;

use plotters::prelude::*;
use std::path::Path;

/// 水平短线半宽（以点序号为单位）
const LEVEL_HALF_WIDTH: f64 = 0.3;

const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 102, 204),
    RGBColor(204, 51, 0),
    RGBColor(0, 153, 76),
    RGBColor(153, 51, 153),
    RGBColor(230, 140, 0),
    RGBColor(80, 80, 80),
];

/// 生成能量剖面图，按扩展名选择后端
pub fn generate_profile_plot(
    table: &PesTable,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    let use_svg = output_path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_profile(&root, table)?;
        root.present()
            .map_err(|e| ThermoError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_profile(&root, table)?;
        root.present()
            .map_err(|e| ThermoError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 纵轴范围，上下各留 10% 余量
fn energy_range(table: &PesTable) -> (f64, f64) {
    let values: Vec<f64> = table
        .pathways
        .iter()
        .flat_map(|p| p.rows.iter().map(|r| r.relative.qh_gibbs))
        .collect();
    if values.is_empty() {
        return (-1.0, 1.0);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}

fn draw_profile<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    table: &PesTable,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?;

    let (y_min, y_max) = energy_range(table);
    let n_points = table
        .pathways
        .iter()
        .map(|p| p.rows.len())
        .max()
        .unwrap_or(1)
        .max(1);

    let mut chart = ChartBuilder::on(root)
        .caption("Reaction profile", ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(n_points as f64 - 0.5), y_min..y_max)
        .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(format!("qh-ΔG ({})", table.units))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?;

    for (idx, pathway) in table.pathways.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];

        // 能级
        for (x, row) in pathway.rows.iter().enumerate() {
            let x = x as f64;
            let y = row.relative.qh_gibbs;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x - LEVEL_HALF_WIDTH, y), (x + LEVEL_HALF_WIDTH, y)],
                    color.stroke_width(3),
                )))
                .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?;

            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{} ({:.prec$})", row.label, y, prec = table.decimals),
                    (x - LEVEL_HALF_WIDTH, y + (y_max - y_min) * 0.02),
                    ("sans-serif", 12).into_font().color(&BLACK),
                )))
                .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?;
        }

        // 连接线
        for (x, pair) in pathway.rows.windows(2).enumerate() {
            let x = x as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![
                        (x + LEVEL_HALF_WIDTH, pair[0].relative.qh_gibbs),
                        (x + 1.0 - LEVEL_HALF_WIDTH, pair[1].relative.qh_gibbs),
                    ],
                    color.mix(0.6).stroke_width(1),
                )))
                .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?;
        }

        chart
            .draw_series(std::iter::once(PathElement::new(
                Vec::<(f64, f64)>::new(),
                color.stroke_width(3),
            )))
            .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?
            .label(pathway.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| ThermoError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnergyUnit;
    use crate::pes::model::{PathwayTable, PesRow, RelativeEnergies};

    fn row(label: &str, g: f64) -> PesRow {
        PesRow {
            label: label.to_string(),
            relative: RelativeEnergies {
                sp_energy: None,
                energy: g,
                zpe: 0.0,
                enthalpy: g,
                ts: 0.0,
                qh_ts: 0.0,
                gibbs: g,
                qh_gibbs: g,
            },
            population: None,
        }
    }

    #[test]
    fn test_energy_range_pads_extremes() {
        let table = PesTable {
            units: EnergyUnit::KcalPerMol,
            decimals: 2,
            temperature: 298.15,
            pathways: vec![PathwayTable {
                name: "Rxn".to_string(),
                rows: vec![row("R", 0.0), row("TS", 20.0), row("P", -10.0)],
                ee: None,
            }],
            warnings: Vec::new(),
        };
        let (lo, hi) = energy_range(&table);
        assert!((lo + 13.0).abs() < 1e-9);
        assert!((hi - 23.0).abs() < 1e-9);
    }
}
