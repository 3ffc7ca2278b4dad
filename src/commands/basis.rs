//! # basis 命令实现
//!
//! 从 lorecommendations 生成 exciting 局域轨道基组片段。
//!
//! ## 功能
//! - 解析 lorecommendations 试探能量表
//! - 按截断筛选并渲染每个物种的 XML 片段
//! - 可选对照 LINENGY.OUT 当前线性化能量
//! - 终端汇总表
//!
//! ## 依赖关系
//! - 使用 `cli/basis.rs` 定义的参数
//! - 使用 `lobasis/`, `parsers/lorecommendations.rs`, `parsers/linengy.rs`
//! - 使用 `utils/output.rs`

use crate::cli::basis::BasisArgs;
use crate::error::{EsutilError, Result};
use crate::lobasis::template::{channel_counts, render_species_basis};
use crate::lobasis::{shell_index_ranges, Shell};
use crate::parsers::linengy::{parse_linengy_file, Linengy};
use crate::parsers::lorecommendations::parse_lorecommendations_file;
use crate::utils::output;

use std::fs;
use tabled::{Table, Tabled};

/// 汇总表格行
#[derive(Debug, Tabled)]
struct ChannelRow {
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "l")]
    l: usize,
    #[tabled(rename = "Recommended")]
    recommended: usize,
    #[tabled(rename = "Kept")]
    kept: usize,
    #[tabled(rename = "Fn range")]
    fn_range: String,
    #[tabled(rename = "Current E_max (Ha)")]
    current_max: String,
}

/// 执行 basis 命令
pub fn execute(args: BasisArgs) -> Result<()> {
    output::print_header("Local-Orbital Basis Generation");

    let recommendations = parse_lorecommendations_file(&args.recommendations)?;
    let species = parse_species_spec(&args.species)?;

    let linengy = match &args.linengy {
        Some(path) => Some(parse_linengy_file(path)?),
        None => None,
    };

    fs::create_dir_all(&args.output).map_err(|e| EsutilError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    output::print_info(&format!(
        "Cutoff {:.4} Ha, l_max {}, {} species selected",
        args.cutoff,
        args.l_max,
        species.len()
    ));

    let mut rows: Vec<ChannelRow> = Vec::new();

    for (index, symbol) in &species {
        let table = recommendations.species_table(*index).ok_or_else(|| {
            EsutilError::InvalidArgument(format!(
                "Species index {} not present in '{}'",
                index,
                args.recommendations.display()
            ))
        })?;

        let rendered =
            render_species_basis(table, symbol, args.cutoff, args.l_max, args.max_per_channel);

        let snippet_path = args.output.join(format!("{}_lo.xml", symbol));
        fs::write(&snippet_path, &rendered).map_err(|e| EsutilError::FileWriteError {
            path: snippet_path.display().to_string(),
            source: e,
        })?;

        let counts = channel_counts(table, args.cutoff, args.l_max, args.max_per_channel);

        // 每个保留轨道是一个 (2l+1) 重壳层，按通道顺序累积下标
        let shells: Vec<Shell> = counts
            .iter()
            .flat_map(|&(l, _, kept)| {
                let symbol = symbol.clone();
                (0..kept).map(move |n| Shell::new(symbol.clone(), n, l))
            })
            .collect();
        let ranges = shell_index_ranges(&shells);

        let mut shell_cursor = 0;
        for (l, recommended, kept) in counts {
            let fn_range = if kept == 0 {
                "-".to_string()
            } else {
                let start = ranges[shell_cursor].start;
                let end = ranges[shell_cursor + kept - 1].end;
                format!("{}..{}", start, end)
            };
            shell_cursor += kept;

            let current_max = linengy
                .as_ref()
                .and_then(|le: &Linengy| le.max_lo_energy(*index, l))
                .map(|e| format!("{:.4}", e))
                .unwrap_or_else(|| "-".to_string());

            rows.push(ChannelRow {
                species: symbol.clone(),
                l,
                recommended,
                kept,
                fn_range,
                current_max,
            });
        }

        output::print_success(&format!(
            "{} basis snippet written to '{}'",
            symbol,
            snippet_path.display()
        ));
    }

    println!("{}", Table::new(&rows));

    let total_kept: usize = rows.iter().map(|r| r.kept).sum();
    output::print_done(&format!(
        "Generated {} local orbitals across {} species",
        total_kept,
        species.len()
    ));

    Ok(())
}

/// 解析 '1:Zr,2:O' 形式的物种选择
fn parse_species_spec(spec: &str) -> Result<Vec<(usize, String)>> {
    let mut species = Vec::new();

    for chunk in spec.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        let parts: Vec<&str> = chunk.splitn(2, ':').collect();
        if parts.len() != 2 || parts[1].trim().is_empty() {
            return Err(EsutilError::InvalidArgument(format!(
                "Invalid species entry '{}', expected index:symbol",
                chunk
            )));
        }

        let index: usize = parts[0].trim().parse().map_err(|_| {
            EsutilError::InvalidArgument(format!("Invalid species index in '{}'", chunk))
        })?;

        species.push((index, parts[1].trim().to_string()));
    }

    if species.is_empty() {
        return Err(EsutilError::InvalidArgument(
            "No species selected".to_string(),
        ));
    }

    Ok(species)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_species_spec() {
        let species = parse_species_spec("1:Zr, 2:O").unwrap();
        assert_eq!(species, vec![(1, "Zr".to_string()), (2, "O".to_string())]);
    }

    #[test]
    fn test_parse_species_spec_rejects_bad_entries() {
        assert!(parse_species_spec("Zr").is_err());
        assert!(parse_species_spec("x:Zr").is_err());
        assert!(parse_species_spec("1:").is_err());
        assert!(parse_species_spec("").is_err());
    }
}
