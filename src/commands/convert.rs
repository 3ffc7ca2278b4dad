//! # convert 命令实现
//!
//! 批量转换结构文件格式。
//!
//! ## 功能
//! - 读取 .xyz / .gen 文件
//! - 转换为 .xyz, .gen, .gin 格式
//! - 支持并行批量处理
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `parsers/`, `models/`
//! - 使用 `batch/`, `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::{ConvertArgs, OutputFormat};
use crate::error::{EsutilError, Result};
use crate::models::Structure;
use crate::parsers;
use crate::parsers::gen::to_gen_string;
use crate::parsers::xyz::to_xyz_string;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header(&format!("Converting to {} format", args.target));

    if !args.input.exists() {
        return Err(EsutilError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive);

    let files = collector.collect();

    if files.is_empty() {
        return Err(EsutilError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    fs::create_dir_all(&args.output).map_err(|e| EsutilError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    // 单文件模式：直接转换并报告
    if collector.is_single_file() {
        match convert_one(&files[0], &args.output, args.target, args.overwrite)? {
            ConvertStatus::Success(dest) => {
                output::print_success(&format!(
                    "{} -> {}",
                    files[0].display(),
                    dest.display()
                ));
            }
            ConvertStatus::Skipped => {
                output::print_warning("Output exists, use --overwrite to replace");
            }
        }
        return Ok(());
    }

    // 批量模式
    output::print_info(&format!("Found {} files to convert", files.len()));

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, "Converting", |input_path| {
        match convert_one(input_path, &args.output, args.target, args.overwrite) {
            Ok(ConvertStatus::Success(_)) => {
                ProcessResult::Success(input_path.display().to_string())
            }
            Ok(ConvertStatus::Skipped) => ProcessResult::Skipped(input_path.display().to_string()),
            Err(e) => ProcessResult::Failed(input_path.display().to_string(), e.to_string()),
        }
    });

    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_done(&format!(
        "Converted {} file(s) to '{}' in '{}' ({} skipped, {} failed)",
        result.success,
        args.target,
        args.output.display(),
        result.skipped,
        result.failed
    ));

    Ok(())
}

enum ConvertStatus {
    Success(PathBuf),
    Skipped,
}

/// 转换单个文件
fn convert_one(
    input_path: &Path,
    output_dir: &Path,
    target: OutputFormat,
    overwrite: bool,
) -> Result<ConvertStatus> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure");

    let output_path = match target {
        OutputFormat::Xyz => output_dir.join(format!("{}.xyz", stem)),
        OutputFormat::Gen => output_dir.join(format!("{}.gen", stem)),
        OutputFormat::Gin => output_dir.join(format!("{}.gin", stem)),
    };

    if output_path.exists() && !overwrite {
        return Ok(ConvertStatus::Skipped);
    }

    let structure = parsers::parse_structure_file(input_path)?;

    let content = match target {
        OutputFormat::Xyz => to_xyz_string(&structure),
        OutputFormat::Gen => to_gen_string(&structure),
        OutputFormat::Gin => to_gin_string(&structure),
    };

    fs::write(&output_path, content).map_err(|e| EsutilError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(ConvertStatus::Success(output_path))
}

// ─────────────────────────────────────────────────────────────
// GIN 格式输出
// ─────────────────────────────────────────────────────────────

/// 转换为 GULP 输入格式
///
/// 周期性结构写 cell + fractional 块，分子写 cartesian 块
fn to_gin_string(structure: &Structure) -> String {
    let mut result = String::new();
    result.push_str("opti conp\n");
    result.push_str("title\n");
    result.push_str(&format!("{}\n", structure.name));
    result.push_str("end\n");

    match &structure.lattice {
        Some(lattice) => {
            let (a, b, c, alpha, beta, gamma) = lattice.parameters();
            result.push_str("cell\n");
            result.push_str(&format!(
                "  {:.6} {:.6} {:.6} {:.4} {:.4} {:.4}\n",
                a, b, c, alpha, beta, gamma
            ));
            result.push_str("fractional\n");
            let fracs = structure.fractional_positions().unwrap_or_default();
            for (atom, frac) in structure.atoms.iter().zip(&fracs) {
                result.push_str(&format!(
                    "{:4} core {:12.8} {:12.8} {:12.8}\n",
                    atom.species, frac[0], frac[1], frac[2]
                ));
            }
        }
        None => {
            result.push_str("cartesian\n");
            for atom in &structure.atoms {
                result.push_str(&format!(
                    "{:4} core {:12.8} {:12.8} {:12.8}\n",
                    atom.species, atom.position[0], atom.position[1], atom.position[2]
                ));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    #[test]
    fn test_gin_periodic_uses_fractional() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let atoms = vec![Atom::new("Si", [2.0, 0.0, 1.0])];
        let structure = Structure::new("si-cell", Some(lattice), atoms);

        let gin = to_gin_string(&structure);
        assert!(gin.starts_with("opti conp"));
        assert!(gin.contains("cell\n"));
        assert!(gin.contains("fractional"));
        assert!(gin.contains("0.50000000"));
        assert!(gin.contains("0.25000000"));
        assert!(!gin.contains("cartesian"));
    }

    #[test]
    fn test_gin_molecular_uses_cartesian() {
        let atoms = vec![
            Atom::new("O", [0.0, 0.0, 0.117]),
            Atom::new("H", [0.0, 0.757, -0.469]),
        ];
        let structure = Structure::new("water", None, atoms);

        let gin = to_gin_string(&structure);
        assert!(gin.contains("cartesian"));
        assert!(!gin.contains("cell\n"));
        assert!(gin.contains("O    core"));
    }
}
