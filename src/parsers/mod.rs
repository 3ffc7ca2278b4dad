//! # 解析器模块
//!
//! 提供各种结构文件和电子结构输出格式的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: xyz, gen, lorecommendations, linengy, evalqp, gw_info, rdfdat, pointgroup

pub mod evalqp;
pub mod gen;
pub mod gw_info;
pub mod linengy;
pub mod lorecommendations;
pub mod pointgroup;
pub mod rdfdat;
pub mod xyz;

use crate::error::{EsutilError, Result};
use crate::models::Structure;
use std::path::Path;

/// 从文件路径推断格式并解析结构文件
pub fn parse_structure_file(path: &Path) -> Result<Structure> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xyz" => xyz::parse_xyz_file(path),
        "gen" => gen::parse_gen_file(path),
        _ => Err(EsutilError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        ))),
    }
}
