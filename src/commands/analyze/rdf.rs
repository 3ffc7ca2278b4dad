//! # RDF 分析子命令实现
//!
//! 从 RDFDAT 转储绘制径向分布函数。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 每个原子对一条曲线，共享 r 轴
//! - 输出图像 (PNG/SVG) 或数据文件 (CSV/XY)
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 RdfArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/rdfdat.rs` 读取数据
//! - 使用 `plotters` 渲染图表

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::analyze::{RdfArgs, RdfOutputFormat};
use crate::error::{EsutilError, Result};
use crate::parsers::rdfdat::{parse_rdfdat_file, RdfData};
use crate::utils::output;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 执行 RDF 分析
pub fn execute(args: RdfArgs) -> Result<()> {
    output::print_header("Radial Distribution Function Plot");

    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(EsutilError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &RdfArgs) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    let format = resolve_format(args.format, &args.output);

    match process_file(&args.input, &args.output, format, args) {
        ProcessResult::Success(msg) => {
            output::print_success(&msg);
            Ok(())
        }
        ProcessResult::Skipped(msg) => {
            output::print_warning(&msg);
            Ok(())
        }
        ProcessResult::Failed(_, err) => Err(EsutilError::Other(err)),
    }
}

/// 批量处理模式
fn execute_batch(args: &RdfArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive);

    let files = collector.collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} RDF dumps", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| EsutilError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let format = args.format.unwrap_or(RdfOutputFormat::Png);

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, "Plotting", |file| {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("rdf");
        let out = args.output.join(format!("{}.{}", stem, extension(format)));
        process_file(file, &out, format, args)
    });

    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_done(&format!(
        "Processed {} dumps ({} ok, {} skipped, {} failed)",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    Ok(())
}

/// 处理单个 RDFDAT 文件
fn process_file(
    input: &Path,
    output_path: &PathBuf,
    format: RdfOutputFormat,
    args: &RdfArgs,
) -> ProcessResult {
    if output_path.exists() && !args.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists: '{}' (use --overwrite)",
            output_path.display()
        ));
    }

    let rdf = match parse_rdfdat_file(input) {
        Ok(r) => r,
        Err(e) => return ProcessResult::Failed(input.display().to_string(), e.to_string()),
    };

    let title = args.title.clone().unwrap_or_else(|| rdf.name.clone());

    let result = match format {
        RdfOutputFormat::Png => plot_png(&rdf, output_path, &title, args.width, args.height),
        RdfOutputFormat::Svg => plot_svg(&rdf, output_path, &title, args.width, args.height),
        RdfOutputFormat::Csv => to_csv(&rdf, output_path),
        RdfOutputFormat::Xy => to_xy(&rdf, output_path),
    };

    match result {
        Ok(()) => ProcessResult::Success(format!(
            "{} -> {}",
            input.display(),
            output_path.display()
        )),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 从参数或输出扩展名推断格式
fn resolve_format(format: Option<RdfOutputFormat>, output: &Path) -> RdfOutputFormat {
    if let Some(f) = format {
        return f;
    }

    match output
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => RdfOutputFormat::Svg,
        Some("csv") => RdfOutputFormat::Csv,
        Some("xy") => RdfOutputFormat::Xy,
        _ => RdfOutputFormat::Png,
    }
}

fn extension(format: RdfOutputFormat) -> &'static str {
    match format {
        RdfOutputFormat::Png => "png",
        RdfOutputFormat::Svg => "svg",
        RdfOutputFormat::Csv => "csv",
        RdfOutputFormat::Xy => "xy",
    }
}

// ─────────────────────────────────────────────────────────────
// 图表渲染
// ─────────────────────────────────────────────────────────────

fn plot_png(rdf: &RdfData, path: &Path, title: &str, width: u32, height: u32) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    draw_chart(&root, rdf, title)?;
    root.present()
        .map_err(|e| EsutilError::Other(e.to_string()))?;
    Ok(())
}

fn plot_svg(rdf: &RdfData, path: &Path, title: &str, width: u32, height: u32) -> Result<()> {
    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    draw_chart(&root, rdf, title)?;
    root.present()
        .map_err(|e| EsutilError::Other(e.to_string()))?;
    Ok(())
}

/// 绘制 g(r) 曲线族
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rdf: &RdfData,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| EsutilError::Other(format!("{:?}", e)))?;

    let x_min = rdf.r.first().copied().unwrap_or(0.0);
    let x_max = rdf.r.last().copied().unwrap_or(10.0);
    let y_max = (rdf.max_value() * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("r (Å)")
        .y_desc("g(r)")
        .draw()
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    for (idx, (label, curve)) in rdf.pair_labels.iter().zip(rdf.curves.iter()).enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                rdf.r.iter().copied().zip(curve.iter().copied()),
                color.stroke_width(2),
            ))
            .map_err(|e| EsutilError::Other(e.to_string()))?
            .label(label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| EsutilError::Other(e.to_string()))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────
// 数据导出
// ─────────────────────────────────────────────────────────────

/// 导出为 CSV 格式（r + 每个原子对一列）
fn to_csv(rdf: &RdfData, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(EsutilError::CsvError)?;

    let mut header = vec!["r".to_string()];
    header.extend(rdf.pair_labels.iter().cloned());
    wtr.write_record(&header).map_err(EsutilError::CsvError)?;

    for (i, &r) in rdf.r.iter().enumerate() {
        let mut record = vec![format!("{:.6}", r)];
        for curve in &rdf.curves {
            record.push(format!("{:.6}", curve[i]));
        }
        wtr.write_record(&record).map_err(EsutilError::CsvError)?;
    }

    wtr.flush().map_err(|e| EsutilError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出为 XY 格式（每个原子对一个数据块）
fn to_xy(rdf: &RdfData, output_path: &Path) -> Result<()> {
    let mut file = fs::File::create(output_path).map_err(|e| EsutilError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    let write_err = |e: std::io::Error| EsutilError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    writeln!(file, "# RDF: {}", rdf.name).map_err(write_err)?;
    writeln!(file, "# Columns: r (Angstrom), g(r)").map_err(write_err)?;

    for (label, curve) in rdf.pair_labels.iter().zip(rdf.curves.iter()) {
        writeln!(file, "# pair: {}", label).map_err(write_err)?;
        for (&r, &g) in rdf.r.iter().zip(curve.iter()) {
            writeln!(file, "{:.6}\t{:.6}", r, g).map_err(write_err)?;
        }
        writeln!(file).map_err(write_err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_from_extension() {
        assert_eq!(
            resolve_format(None, Path::new("out.svg")),
            RdfOutputFormat::Svg
        );
        assert_eq!(
            resolve_format(None, Path::new("out.csv")),
            RdfOutputFormat::Csv
        );
        assert_eq!(
            resolve_format(None, Path::new("out.xy")),
            RdfOutputFormat::Xy
        );
        assert_eq!(
            resolve_format(None, Path::new("out.png")),
            RdfOutputFormat::Png
        );
        assert_eq!(
            resolve_format(None, Path::new("noext")),
            RdfOutputFormat::Png
        );
    }

    #[test]
    fn test_explicit_format_wins() {
        assert_eq!(
            resolve_format(Some(RdfOutputFormat::Csv), Path::new("out.png")),
            RdfOutputFormat::Csv
        );
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension(RdfOutputFormat::Png), "png");
        assert_eq!(extension(RdfOutputFormat::Xy), "xy");
    }
}
