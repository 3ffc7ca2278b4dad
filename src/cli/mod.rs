//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 结构格式转换
//! - `kgrid`: Monkhorst-Pack k 点网格生成
//! - `basis`: exciting 局域轨道基组生成
//! - `analyze`: 分析功能（嵌套子命令）
//!   - `gw`: GW 计算结果汇总
//!   - `rdf`: 径向分布函数绘图
//! - `submit`: 批量作业提交
//! - `pointgroup`: 点群数据查询
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, kgrid, basis, analyze, submit, pointgroup

pub mod analyze;
pub mod basis;
pub mod convert;
pub mod kgrid;
pub mod pointgroup;
pub mod submit;

use clap::{Parser, Subcommand};

/// esutil - 电子结构计算统一工具箱
#[derive(Parser)]
#[command(name = "esutil")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A unified electronic-structure workflow toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert structure files between formats (.xyz, .gen, .gin)
    Convert(convert::ConvertArgs),

    /// Generate a Monkhorst-Pack k-point grid for a lattice
    Kgrid(kgrid::KgridArgs),

    /// Generate exciting local-orbital basis sets from lorecommendations
    Basis(basis::BasisArgs),

    /// Analyze calculation outputs
    Analyze(analyze::AnalyzeArgs),

    /// Generate and submit batch jobs to SLURM/PBS schedulers
    Submit(submit::SubmitArgs),

    /// Look up point-group classes and irreps from a JSON table
    Pointgroup(pointgroup::PointgroupArgs),
}
