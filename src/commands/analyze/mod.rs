//! # analyze 命令实现
//!
//! 分析功能统一入口，包含多个子命令：
//! - `gw`: GW 计算结果汇总
//! - `rdf`: 径向分布函数绘图
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 子模块: gw, rdf

pub mod gw;
pub mod rdf;

use crate::cli::analyze::{AnalyzeArgs, AnalyzeCommands};
use crate::error::Result;

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    match args.command {
        AnalyzeCommands::Gw(gw_args) => gw::execute(gw_args),
        AnalyzeCommands::Rdf(rdf_args) => rdf::execute(rdf_args),
    }
}
