//! # analyze 子命令 CLI 定义
//!
//! 分析功能统一入口，包含多个子命令：
//! - `gw`: GW 计算结果汇总
//! - `rdf`: 径向分布函数绘图
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze/` 相应模块

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// Analyze 主命令
// ─────────────────────────────────────────────────────────────

/// analyze 主命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(subcommand)]
    pub command: AnalyzeCommands,
}

/// analyze 子命令
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Summarize GW quasiparticle band gaps from calculation directories
    Gw(GwArgs),

    /// Plot radial distribution functions from RDFDAT dumps
    Rdf(RdfArgs),
}

// ─────────────────────────────────────────────────────────────
// GW 分析子命令
// ─────────────────────────────────────────────────────────────

/// GW 分析子命令参数
#[derive(Args, Debug)]
pub struct GwArgs {
    /// Root directory containing one subdirectory per GW calculation
    pub job_dir: PathBuf,

    /// Number of occupied states, for recomputing gaps from EVALQP.DAT
    /// when GW_INFO.OUT is absent
    #[arg(long)]
    pub nval: Option<usize>,

    /// Filename for the gap summary CSV output
    #[arg(long, default_value = "gw_gaps.csv")]
    pub output_csv: PathBuf,

    /// Filename for the gap convergence plot (PNG format)
    #[arg(long, default_value = "gw_gap_convergence.png")]
    pub output_plot: PathBuf,

    /// Skip plot generation
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}

// ─────────────────────────────────────────────────────────────
// RDF 分析子命令
// ─────────────────────────────────────────────────────────────

/// RDF 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RdfOutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (r, one column per pair)
    Csv,
    /// XY data file (r, intensity per pair block)
    Xy,
}

/// RDF 分析子命令参数
#[derive(Args, Debug)]
pub struct RdfArgs {
    /// Input: RDFDAT file or directory containing RDF dumps
    pub input: PathBuf,

    /// Output: file path (single mode) or directory (batch mode)
    #[arg(short, long, default_value = "rdf_plot.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<RdfOutputFormat>,

    /// Title for the plot (default: data name from the file)
    #[arg(long)]
    pub title: Option<String>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, comma-separated)
    #[arg(long, default_value = "RDFDAT*")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
