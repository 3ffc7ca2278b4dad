//! # RDFDAT 解析器
//!
//! 解析径向分布函数文本转储（GULP 风格的 RDFDAT）。
//!
//! ## 格式说明
//! ```text
//! # RDF for liquid GeO2, 300 K
//! r  Ge-O  O-O
//! 0.05  0.0000  0.0000
//! 0.10  0.0013  0.0001
//! ...
//! ```
//!
//! `#` 开头的行为注释；第一非注释行是列标题（首列为 r，其余为原子对标签）；
//! 其后为数字行，所有曲线共享 r 轴。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/rdf.rs` 使用
//! - 无外部模块依赖

use crate::error::{EsutilError, Result};
use std::fs;
use std::path::Path;

/// 一组径向分布函数曲线
#[derive(Debug, Clone)]
pub struct RdfData {
    /// 数据名称（文件名或首条注释）
    pub name: String,
    /// 原子对标签，每条曲线一个
    pub pair_labels: Vec<String>,
    /// r 轴 (Å)
    pub r: Vec<f64>,
    /// g(r) 曲线，与 pair_labels 对应；每条与 r 等长
    pub curves: Vec<Vec<f64>>,
}

impl RdfData {
    /// 按标签取一条曲线
    pub fn curve(&self, label: &str) -> Option<&[f64]> {
        let idx = self.pair_labels.iter().position(|l| l == label)?;
        Some(&self.curves[idx])
    }

    /// 所有曲线的全局最大 g(r)（用于确定绘图范围）
    pub fn max_value(&self) -> f64 {
        self.curves
            .iter()
            .flat_map(|c| c.iter())
            .fold(0.0_f64, |acc, &v| acc.max(v))
    }
}

/// 解析 RDFDAT 文件
pub fn parse_rdfdat_file(path: &Path) -> Result<RdfData> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_rdfdat_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("rdf"),
    )
}

/// 从字符串内容解析 RDFDAT 格式
pub fn parse_rdfdat_content(content: &str, default_name: &str) -> Result<RdfData> {
    let parse_error = |reason: String| EsutilError::ParseError {
        format: "rdfdat".to_string(),
        path: default_name.to_string(),
        reason,
    };

    let mut name = default_name.to_string();
    let mut pair_labels: Option<Vec<String>> = None;
    let mut r: Vec<f64> = Vec::new();
    let mut curves: Vec<Vec<f64>> = Vec::new();

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            // 首条注释作为数据名称
            if name == default_name && !comment.trim().is_empty() {
                name = comment.trim().to_string();
            }
            continue;
        }

        match &pair_labels {
            None => {
                // 列标题行：首列为 r 轴标签，其余为原子对
                let labels: Vec<String> =
                    line.split_whitespace().skip(1).map(|s| s.to_string()).collect();
                if labels.is_empty() {
                    return Err(parse_error(format!(
                        "Header line {} has no pair columns: '{}'",
                        lineno + 1,
                        line
                    )));
                }
                curves = vec![Vec::new(); labels.len()];
                pair_labels = Some(labels);
            }
            Some(labels) => {
                let values: Vec<f64> = line
                    .split_whitespace()
                    .filter_map(|s| s.parse().ok())
                    .collect();

                if values.len() != labels.len() + 1 {
                    return Err(parse_error(format!(
                        "Row {} has {} columns, expected {}",
                        lineno + 1,
                        values.len(),
                        labels.len() + 1
                    )));
                }

                r.push(values[0]);
                for (curve, &v) in curves.iter_mut().zip(&values[1..]) {
                    curve.push(v);
                }
            }
        }
    }

    let pair_labels = pair_labels.ok_or_else(|| parse_error("No header line found".to_string()))?;

    if r.is_empty() {
        return Err(parse_error("No data rows found".to_string()));
    }

    Ok(RdfData {
        name,
        pair_labels,
        r,
        curves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# RDF for liquid GeO2, 300 K
r  Ge-O  O-O
0.05  0.0000  0.0000
0.10  0.0013  0.0001
0.15  1.8042  0.2200
0.20  0.9911  1.1021
"#;

    #[test]
    fn test_parse_rdfdat() {
        let rdf = parse_rdfdat_content(SAMPLE, "RDFDAT").unwrap();
        assert_eq!(rdf.name, "RDF for liquid GeO2, 300 K");
        assert_eq!(rdf.pair_labels, vec!["Ge-O", "O-O"]);
        assert_eq!(rdf.r.len(), 4);
        assert_eq!(rdf.curves.len(), 2);
        assert!((rdf.r[2] - 0.15).abs() < 1e-12);
        assert!((rdf.curves[0][2] - 1.8042).abs() < 1e-12);
        assert!((rdf.curves[1][3] - 1.1021).abs() < 1e-12);
    }

    #[test]
    fn test_curve_lookup() {
        let rdf = parse_rdfdat_content(SAMPLE, "RDFDAT").unwrap();
        let oo = rdf.curve("O-O").unwrap();
        assert!((oo[3] - 1.1021).abs() < 1e-12);
        assert!(rdf.curve("Ge-Ge").is_none());
    }

    #[test]
    fn test_max_value() {
        let rdf = parse_rdfdat_content(SAMPLE, "RDFDAT").unwrap();
        assert!((rdf.max_value() - 1.8042).abs() < 1e-12);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let content = "r A-B\n0.05 1.0\n0.10 1.0 2.0\n";
        assert!(parse_rdfdat_content(content, "bad").is_err());
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(parse_rdfdat_content("# only comments\n", "bad").is_err());
    }
}
