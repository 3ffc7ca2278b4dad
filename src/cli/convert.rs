//! # convert 子命令 CLI 定义
//!
//! 结构文件格式转换参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// XYZ coordinate file (extended-xyz lattice attribute for periodic structures)
    Xyz,
    /// DFTB+ .gen structure file
    Gen,
    /// GULP input file (.gin)
    Gin,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Xyz => write!(f, "xyz"),
            OutputFormat::Gen => write!(f, "gen"),
            OutputFormat::Gin => write!(f, "gin"),
        }
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input: structure file or directory containing structure files
    pub input: PathBuf,

    /// Target format
    #[arg(short, long, value_enum)]
    pub target: OutputFormat,

    /// Output directory
    #[arg(short, long, default_value = "converted")]
    pub output: PathBuf,

    /// Glob pattern for input files (batch mode, comma-separated)
    #[arg(long, default_value = "*.xyz,*.gen")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
