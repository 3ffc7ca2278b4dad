//! # GW 分析子命令实现
//!
//! 扫描 GW 计算目录并汇总准粒子带隙。
//!
//! ## 功能
//! - 扫描每个子目录的 GW_INFO.OUT / EVALQP.DAT
//! - 终端表格和 CSV 输出
//! - 可选带隙收敛图
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 GwArgs
//! - 使用 `parsers/gw_info.rs`, `parsers/evalqp.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::analyze::GwArgs;
use crate::error::{EsutilError, Result};
use crate::models::{EigenvalueSet, GwReport, HA_TO_EV};
use crate::parsers::{evalqp, gw_info};
use crate::utils::{output, progress};

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 汇总表格行
#[derive(Debug, Clone, Tabled)]
struct GapRow {
    #[tabled(rename = "Calculation")]
    label: String,
    #[tabled(rename = "KS gap (eV)")]
    ks_gap: String,
    #[tabled(rename = "G0W0 gap (eV)")]
    qp_gap: String,
    #[tabled(rename = "G0W0 direct (eV)")]
    qp_direct: String,
    #[tabled(rename = "ΔGW (eV)")]
    correction: String,
}

/// 执行 GW 分析
pub fn execute(args: GwArgs) -> Result<()> {
    output::print_header("GW Band Gap Summary");

    if !args.job_dir.exists() {
        return Err(EsutilError::DirectoryNotFound {
            path: args.job_dir.display().to_string(),
        });
    }

    output::print_info(&format!(
        "Scanning '{}' for GW calculations...",
        args.job_dir.display()
    ));

    let mut entries: Vec<_> = fs::read_dir(&args.job_dir)
        .map_err(|e| EsutilError::FileReadError {
            path: args.job_dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .collect();

    entries.sort_by(|a, b| {
        natural_cmp(
            &a.file_name().to_string_lossy(),
            &b.file_name().to_string_lossy(),
        )
    });

    let pb = progress::create_progress_bar(entries.len() as u64, "Parsing");

    let mut reports: Vec<GwReport> = Vec::new();

    for entry in &entries {
        let label = entry.file_name().to_string_lossy().to_string();
        let calc_dir = entry.path();

        if let Some(report) = parse_calculation(&calc_dir, &label, args.nval) {
            reports.push(report);
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if reports.is_empty() {
        output::print_warning("No GW calculations with band gap data found.");
        return Ok(());
    }

    output::print_info(&format!("Found {} GW calculations", reports.len()));

    let rows: Vec<GapRow> = reports
        .iter()
        .map(|r| GapRow {
            label: r.label.clone(),
            ks_gap: fmt_opt(r.ks_gap_ev),
            qp_gap: fmt_opt(r.qp_gap_ev),
            qp_direct: fmt_opt(r.qp_direct_gap_ev),
            correction: fmt_opt(r.gap_correction_ev()),
        })
        .collect();

    println!("{}", Table::new(&rows));

    save_reports_csv(&reports, &args.output_csv)?;
    output::print_success(&format!(
        "Gap summary saved to '{}'",
        args.output_csv.display()
    ));

    if !args.no_plot {
        if reports.len() < 2 {
            output::print_warning("Need at least 2 calculations for a convergence plot, skipping.");
        } else {
            generate_plot(&reports, &args.output_plot)?;
            output::print_success(&format!(
                "Convergence plot saved to '{}'",
                args.output_plot.display()
            ));
        }
    }

    Ok(())
}

/// 解析单个计算目录
///
/// 优先 GW_INFO.OUT；缺失时用 EVALQP.DAT + nval 重算带隙
fn parse_calculation(calc_dir: &Path, label: &str, nval: Option<usize>) -> Option<GwReport> {
    let info_path = calc_dir.join("GW_INFO.OUT");
    if info_path.exists() {
        return gw_info::parse_gw_info_file(&info_path, label).ok();
    }

    let evalqp_path = calc_dir.join("EVALQP.DAT");
    if evalqp_path.exists() {
        let n_val = nval?;
        let spectrum = evalqp::parse_evalqp_file(&evalqp_path).ok()?;

        let mut report = GwReport::new(label);
        report.ks_gap_ev = spectrum
            .fundamental_gap(n_val, EigenvalueSet::KohnSham)
            .map(|g| g * HA_TO_EV);
        report.qp_gap_ev = spectrum
            .fundamental_gap(n_val, EigenvalueSet::Gw)
            .map(|g| g * HA_TO_EV);
        report.ks_direct_gap_ev = spectrum
            .direct_gap(n_val, EigenvalueSet::KohnSham)
            .map(|g| g * HA_TO_EV);
        report.qp_direct_gap_ev = spectrum
            .direct_gap(n_val, EigenvalueSet::Gw)
            .map(|g| g * HA_TO_EV);
        report.source_file = Some(evalqp_path.display().to_string());

        if report.ks_gap_ev.is_none() && report.qp_gap_ev.is_none() {
            return None;
        }
        return Some(report);
    }

    None
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// 数字感知的目录名排序（"222" < "444" < "666"，"k4" < "k12"）
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let na = take_number(&mut ca);
                    let nb = take_number(&mut cb);
                    match na.cmp(&nb) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                } else {
                    match x.cmp(&y) {
                        Ordering::Equal => {
                            ca.next();
                            cb.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars>) -> u64 {
    let mut value = 0u64;
    while let Some(c) = chars.peek() {
        if let Some(d) = c.to_digit(10) {
            value = value.saturating_mul(10).saturating_add(d as u64);
            chars.next();
        } else {
            break;
        }
    }
    value
}

/// 保存结果到 CSV
fn save_reports_csv(reports: &[GwReport], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(EsutilError::CsvError)?;

    wtr.write_record([
        "calculation",
        "ks_gap_eV",
        "ks_direct_gap_eV",
        "qp_gap_eV",
        "qp_direct_gap_eV",
        "gw_correction_eV",
    ])
    .map_err(EsutilError::CsvError)?;

    for r in reports {
        wtr.write_record(&[
            r.label.clone(),
            csv_opt(r.ks_gap_ev),
            csv_opt(r.ks_direct_gap_ev),
            csv_opt(r.qp_gap_ev),
            csv_opt(r.qp_direct_gap_ev),
            csv_opt(r.gap_correction_ev()),
        ])
        .map_err(EsutilError::CsvError)?;
    }

    wtr.flush().map_err(|e| EsutilError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

fn csv_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.10}", v)).unwrap_or_default()
}

/// 生成带隙收敛图
fn generate_plot(reports: &[GwReport], output_path: &Path) -> Result<()> {
    use plotters::prelude::*;

    let ks_data: Vec<(f64, f64)> = reports
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.ks_gap_ev.map(|g| (i as f64 + 1.0, g)))
        .collect();
    let qp_data: Vec<(f64, f64)> = reports
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.qp_gap_ev.map(|g| (i as f64 + 1.0, g)))
        .collect();

    if qp_data.is_empty() && ks_data.is_empty() {
        return Err(EsutilError::Other("No data to plot".to_string()));
    }

    let all_y = ks_data.iter().chain(qp_data.iter()).map(|(_, y)| *y);
    let y_min = all_y.clone().fold(f64::INFINITY, f64::min);
    let y_max = all_y.fold(f64::NEG_INFINITY, f64::max);
    let y_margin = ((y_max - y_min).abs() * 0.1).max(0.05);

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("GW Band Gap Convergence", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            0.5..(reports.len() as f64 + 0.5),
            (y_min - y_margin)..(y_max + y_margin),
        )
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    let labels: Vec<String> = reports.iter().map(|r| r.label.clone()).collect();

    chart
        .configure_mesh()
        .x_desc("Calculation")
        .y_desc("Fundamental gap (eV)")
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if (x - idx as f64).abs() < 1e-6 && idx >= 1 && idx <= labels.len() {
                labels[idx - 1].clone()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    if !ks_data.is_empty() {
        chart
            .draw_series(LineSeries::new(ks_data.iter().copied(), BLUE.stroke_width(2)))
            .map_err(|e| EsutilError::Other(e.to_string()))?
            .label("KS gap")
            .legend(|(x, y)| Circle::new((x + 10, y), 5, BLUE.filled()));
        chart
            .draw_series(
                ks_data
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 5, BLUE.filled())),
            )
            .map_err(|e| EsutilError::Other(e.to_string()))?;
    }

    if !qp_data.is_empty() {
        chart
            .draw_series(LineSeries::new(qp_data.iter().copied(), RED.stroke_width(2)))
            .map_err(|e| EsutilError::Other(e.to_string()))?
            .label("G0W0 gap")
            .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));
        chart
            .draw_series(
                qp_data
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 5, RED.filled())),
            )
            .map_err(|e| EsutilError::Other(e.to_string()))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    root.present()
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_cmp_numeric_dirs() {
        let mut dirs = vec!["666", "222", "444", "888"];
        dirs.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(dirs, vec!["222", "444", "666", "888"]);
    }

    #[test]
    fn test_natural_cmp_mixed() {
        let mut dirs = vec!["k12", "k4", "k8"];
        dirs.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(dirs, vec!["k4", "k8", "k12"]);
    }

    #[test]
    fn test_natural_cmp_prefix() {
        assert_eq!(natural_cmp("abc", "abc"), Ordering::Equal);
        assert_eq!(natural_cmp("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.23456)), "1.2346");
        assert_eq!(fmt_opt(None), "-");
    }
}
