//! # 点群数据表解析器
//!
//! 读取 JSON 点群数据表（群 -> 阶数 / 共轭类 / 不可约表示）。
//!
//! ## 格式说明
//! ```json
//! {
//!   "C2v": { "order": 4, "classes": ["E", "C2", "sv", "sv'"],
//!            "irreps": ["A1", "A2", "B1", "B2"] }
//! }
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/pointgroup.rs` 使用
//! - 使用 `serde_json` 反序列化

use crate::error::{EsutilError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 单个点群的记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGroup {
    /// 群阶
    pub order: usize,
    /// 共轭类标签
    pub classes: Vec<String>,
    /// 不可约表示标签
    pub irreps: Vec<String>,
}

/// 点群数据表，按群标签排序
pub type PointGroupTable = BTreeMap<String, PointGroup>;

/// 解析点群 JSON 数据表
pub fn parse_pointgroup_file(path: &Path) -> Result<PointGroupTable> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let table: PointGroupTable = serde_json::from_str(&content)?;
    Ok(table)
}

/// 查找点群；大小写敏感，未命中返回可用群列表
pub fn lookup<'a>(table: &'a PointGroupTable, label: &str) -> Result<&'a PointGroup> {
    table.get(label).ok_or_else(|| {
        let available: Vec<&str> = table.keys().map(|s| s.as_str()).collect();
        EsutilError::InvalidArgument(format!(
            "Unknown point group '{}'. Available: {}",
            label,
            available.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "C2v": { "order": 4, "classes": ["E", "C2", "sv", "sv'"],
                 "irreps": ["A1", "A2", "B1", "B2"] },
        "D3h": { "order": 12,
                 "classes": ["E", "2C3", "3C2", "sh", "2S3", "3sv"],
                 "irreps": ["A1'", "A2'", "E'", "A1''", "A2''", "E''"] }
    }"#;

    #[test]
    fn test_parse_table() {
        let table: PointGroupTable = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(table.len(), 2);

        let c2v = &table["C2v"];
        assert_eq!(c2v.order, 4);
        assert_eq!(c2v.classes.len(), 4);
        assert_eq!(c2v.irreps, vec!["A1", "A2", "B1", "B2"]);
    }

    #[test]
    fn test_lookup_hit() {
        let table: PointGroupTable = serde_json::from_str(SAMPLE).unwrap();
        let d3h = lookup(&table, "D3h").unwrap();
        assert_eq!(d3h.order, 12);
    }

    #[test]
    fn test_lookup_miss_lists_available() {
        let table: PointGroupTable = serde_json::from_str(SAMPLE).unwrap();
        let err = lookup(&table, "Oh").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown point group 'Oh'"));
        assert!(msg.contains("C2v"));
        assert!(msg.contains("D3h"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result: std::result::Result<PointGroupTable, _> = serde_json::from_str("{ broken");
        assert!(result.is_err());
    }
}
