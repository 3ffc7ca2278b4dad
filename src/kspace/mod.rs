//! # 倒空间采样模块
//!
//! 提供 Monkhorst-Pack k 点网格生成功能。
//!
//! ## 子模块
//! - `grid`: 网格生成核心算法
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/kgrid.rs` 使用
//! - 使用 `models/structure.rs` 的 Lattice

pub mod export;
pub mod grid;

pub use grid::{Kpoint, KpointGrid, MonkhorstPack};
