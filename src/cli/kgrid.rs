//! # kgrid 子命令 CLI 定义
//!
//! Monkhorst-Pack k 点网格生成参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/kgrid.rs`

use clap::Args;
use std::path::PathBuf;

/// kgrid 子命令参数
#[derive(Args, Debug)]
pub struct KgridArgs {
    /// Structure file providing the lattice (.xyz with Lattice attribute, or .gen)
    pub input: Option<PathBuf>,

    /// Cell parameters instead of a structure file: "a,b,c,alpha,beta,gamma"
    #[arg(long, conflicts_with = "input")]
    pub params: Option<String>,

    /// Grid divisions (e.g., '4x4x4' or '6x6x4')
    #[arg(short, long, default_value = "4x4x4")]
    pub grid: String,

    /// Fractional grid shift (e.g., '0.5,0.5,0.5')
    #[arg(short, long, default_value = "0,0,0")]
    pub shift: String,

    /// Write the full grid to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of k-points to print as a table
    #[arg(long, default_value_t = 16)]
    pub max_print: usize,
}
