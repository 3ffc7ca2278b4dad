//! # kgrid 命令实现
//!
//! 生成并展示 Monkhorst-Pack k 点网格。
//!
//! ## 功能
//! - 从结构文件或晶胞参数获得晶格
//! - 生成 MP 网格并打印倒格矢
//! - 终端表格展示和 CSV 导出
//!
//! ## 依赖关系
//! - 使用 `cli/kgrid.rs` 定义的参数
//! - 使用 `kspace/`, `parsers/`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::kgrid::KgridArgs;
use crate::error::{EsutilError, Result};
use crate::kspace::{export, KpointGrid, MonkhorstPack};
use crate::models::Lattice;
use crate::parsers;
use crate::utils::output;

use tabled::{Table, Tabled};

/// k 点表格行
#[derive(Debug, Tabled)]
struct KpointRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "k1")]
    k1: String,
    #[tabled(rename = "k2")]
    k2: String,
    #[tabled(rename = "k3")]
    k3: String,
    #[tabled(rename = "kx (1/Å)")]
    kx: String,
    #[tabled(rename = "ky (1/Å)")]
    ky: String,
    #[tabled(rename = "kz (1/Å)")]
    kz: String,
}

/// 执行 kgrid 命令
pub fn execute(args: KgridArgs) -> Result<()> {
    output::print_header("Monkhorst-Pack k-point Grid");

    let lattice = resolve_lattice(&args)?;
    let divisions = parse_divisions(&args.grid)?;
    let shift = parse_shift(&args.shift)?;

    let grid = MonkhorstPack::new(divisions)?
        .with_shift(shift)
        .generate(&lattice);

    print_lattice_summary(&lattice, &grid);

    let rows: Vec<KpointRow> = grid
        .points
        .iter()
        .take(args.max_print)
        .enumerate()
        .map(|(i, p)| KpointRow {
            index: i + 1,
            k1: format!("{:8.5}", p.frac[0]),
            k2: format!("{:8.5}", p.frac[1]),
            k3: format!("{:8.5}", p.frac[2]),
            kx: format!("{:9.6}", p.cart[0]),
            ky: format!("{:9.6}", p.cart[1]),
            kz: format!("{:9.6}", p.cart[2]),
        })
        .collect();

    println!("{}", Table::new(&rows));

    if grid.len() > args.max_print {
        output::print_info(&format!(
            "Showing {} of {} k-points (use --max-print or --output for the rest)",
            args.max_print,
            grid.len()
        ));
    }

    if let Some(ref csv_path) = args.output {
        export::to_csv(&grid, csv_path)?;
        output::print_success(&format!("Full grid saved to '{}'", csv_path.display()));
    }

    Ok(())
}

/// 从参数中解析晶格：结构文件或 --params
fn resolve_lattice(args: &KgridArgs) -> Result<Lattice> {
    if let Some(ref input) = args.input {
        let structure = parsers::parse_structure_file(input)?;
        output::print_kv(
            "Structure",
            &format!("{} ({})", structure.name, structure.formula()),
        );
        return structure.lattice.ok_or_else(|| {
            EsutilError::InvalidArgument(format!(
                "Structure '{}' carries no lattice (molecular xyz?)",
                input.display()
            ))
        });
    }

    if let Some(ref params) = args.params {
        let values: Vec<f64> = params
            .split(',')
            .map(|s| s.trim().parse())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| {
                EsutilError::InvalidArgument(format!("Invalid cell parameters: '{}'", params))
            })?;

        if values.len() != 6 {
            return Err(EsutilError::InvalidArgument(format!(
                "Expected 6 cell parameters (a,b,c,alpha,beta,gamma), got {}",
                values.len()
            )));
        }

        return Ok(Lattice::from_parameters(
            values[0], values[1], values[2], values[3], values[4], values[5],
        ));
    }

    Err(EsutilError::InvalidArgument(
        "Provide a structure file or --params".to_string(),
    ))
}

/// 解析 '4x4x4' 形式的网格尺寸
fn parse_divisions(grid: &str) -> Result<[usize; 3]> {
    let parts: Vec<usize> = grid
        .to_lowercase()
        .split(['x', ','])
        .map(|s| s.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| EsutilError::InvalidArgument(format!("Invalid grid spec: '{}'", grid)))?;

    if parts.len() != 3 {
        return Err(EsutilError::InvalidArgument(format!(
            "Grid spec needs 3 divisions, got '{}'",
            grid
        )));
    }

    Ok([parts[0], parts[1], parts[2]])
}

/// 解析 '0.5,0.5,0.5' 形式的平移
fn parse_shift(shift: &str) -> Result<[f64; 3]> {
    let parts: Vec<f64> = shift
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| EsutilError::InvalidArgument(format!("Invalid shift spec: '{}'", shift)))?;

    if parts.len() != 3 {
        return Err(EsutilError::InvalidArgument(format!(
            "Shift spec needs 3 components, got '{}'",
            shift
        )));
    }

    Ok([parts[0], parts[1], parts[2]])
}

/// 打印晶格与网格概要
fn print_lattice_summary(lattice: &Lattice, grid: &KpointGrid) {
    let (a, b, c, alpha, beta, gamma) = lattice.parameters();

    output::print_kv("Cell", &format!("a={:.4} b={:.4} c={:.4} Å", a, b, c));
    output::print_kv(
        "Angles",
        &format!("α={:.2} β={:.2} γ={:.2}°", alpha, beta, gamma),
    );
    output::print_kv("Volume", &format!("{:.4} Å³", lattice.volume().abs()));

    let recip = lattice.reciprocal();
    for (label, row) in ["b1", "b2", "b3"].iter().zip(recip.iter()) {
        output::print_kv(
            label,
            &format!("[{:9.6} {:9.6} {:9.6}] 1/Å", row[0], row[1], row[2]),
        );
    }

    output::print_kv(
        "Grid",
        &format!(
            "{}x{}x{} + shift ({:.3}, {:.3}, {:.3}) = {} points",
            grid.divisions[0],
            grid.divisions[1],
            grid.divisions[2],
            grid.shift[0],
            grid.shift[1],
            grid.shift[2],
            grid.len()
        ),
    );
    output::print_kv(
        "Gamma point",
        if grid.contains_gamma() {
            "included"
        } else {
            "not included"
        },
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_divisions() {
        assert_eq!(parse_divisions("4x4x4").unwrap(), [4, 4, 4]);
        assert_eq!(parse_divisions("6X6X4").unwrap(), [6, 6, 4]);
        assert_eq!(parse_divisions("2,3,4").unwrap(), [2, 3, 4]);
        assert!(parse_divisions("4x4").is_err());
        assert!(parse_divisions("axbxc").is_err());
    }

    #[test]
    fn test_parse_shift() {
        assert_eq!(parse_shift("0,0,0").unwrap(), [0.0, 0.0, 0.0]);
        assert_eq!(parse_shift("0.5, 0.5, 0.5").unwrap(), [0.5, 0.5, 0.5]);
        assert!(parse_shift("0.5").is_err());
        assert!(parse_shift("a,b,c").is_err());
    }

    #[test]
    fn test_resolve_lattice_from_params() {
        let args = KgridArgs {
            input: None,
            params: Some("4,4,4,90,90,90".to_string()),
            grid: "2x2x2".to_string(),
            shift: "0,0,0".to_string(),
            output: None,
            max_print: 16,
        };
        let lattice = resolve_lattice(&args).unwrap();
        assert!((lattice.volume().abs() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_lattice_requires_source() {
        let args = KgridArgs {
            input: None,
            params: None,
            grid: "2x2x2".to_string(),
            shift: "0,0,0".to_string(),
            output: None,
            max_print: 16,
        };
        assert!(resolve_lattice(&args).is_err());
    }
}
