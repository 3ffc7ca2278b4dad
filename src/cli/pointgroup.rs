//! # pointgroup 子命令 CLI 定义
//!
//! 点群数据查询参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pointgroup.rs`

use clap::Args;
use std::path::PathBuf;

/// pointgroup 子命令参数
#[derive(Args, Debug)]
pub struct PointgroupArgs {
    /// Point group label to look up (e.g., 'C2v'); omit to list all groups
    pub group: Option<String>,

    /// Path to the JSON point-group data table
    #[arg(short, long)]
    pub data: PathBuf,
}
