//! # basis 子命令 CLI 定义
//!
//! exciting 局域轨道基组生成参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/basis.rs`

use clap::Args;
use std::path::PathBuf;

/// basis 子命令参数
#[derive(Args, Debug)]
pub struct BasisArgs {
    /// Path to the lorecommendations file
    pub recommendations: PathBuf,

    /// Species selection as index:symbol pairs (e.g., '1:Zr,2:O')
    #[arg(short = 'S', long)]
    pub species: String,

    /// Trial-energy cutoff in Hartree; only energies strictly below are kept
    #[arg(short, long, default_value_t = 100.0)]
    pub cutoff: f64,

    /// Maximum angular momentum channel to include
    #[arg(long, default_value_t = 3)]
    pub l_max: usize,

    /// Cap on the number of local orbitals per channel
    #[arg(long)]
    pub max_per_channel: Option<usize>,

    /// Optional LINENGY.OUT for cross-referencing current linearization energies
    #[arg(long)]
    pub linengy: Option<PathBuf>,

    /// Output directory for the per-species XML snippets
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}
