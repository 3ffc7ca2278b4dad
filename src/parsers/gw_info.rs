//! # GW_INFO.OUT 解析器
//!
//! 解析 exciting GW 主输出文件，提取 Kohn-Sham 与 G0W0 带隙。
//!
//! ## 格式说明
//! ```text
//!  Kohn-Sham band structure
//!   ...
//!   Fundamental BandGap (eV):              0.6105
//!   Direct BandGap (eV):                   1.1723
//!  G0W0 band structure
//!   ...
//!   Fundamental BandGap (eV):              1.2554
//!   Direct BandGap (eV):                   1.8342
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/analyze/gw.rs` 使用
//! - 使用 `models/gw.rs` 的 GwReport

use crate::error::{EsutilError, Result};
use crate::models::GwReport;
use std::fs;
use std::path::Path;

/// 解析 GW_INFO.OUT 文件
pub fn parse_gw_info_file(path: &Path, label: &str) -> Result<GwReport> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut report = parse_gw_info_content(&content, label)?;
    report.source_file = Some(path.display().to_string());
    Ok(report)
}

/// 从字符串内容解析 GW INFO 格式
pub fn parse_gw_info_content(content: &str, label: &str) -> Result<GwReport> {
    #[derive(Clone, Copy, PartialEq)]
    enum Section {
        None,
        KohnSham,
        Gw,
    }

    let mut report = GwReport::new(label);
    let mut section = Section::None;

    for raw in content.lines() {
        let line = raw.trim();

        if line.contains("Kohn-Sham band structure") {
            section = Section::KohnSham;
            continue;
        }
        if line.contains("G0W0 band structure") {
            section = Section::Gw;
            continue;
        }

        if line.contains("Fundamental BandGap (eV)") {
            if let Some(val) = extract_last_number(line) {
                match section {
                    Section::KohnSham => report.ks_gap_ev = Some(val),
                    Section::Gw => report.qp_gap_ev = Some(val),
                    Section::None => {}
                }
            }
        }

        if line.contains("Direct BandGap (eV)") {
            if let Some(val) = extract_last_number(line) {
                match section {
                    Section::KohnSham => report.ks_direct_gap_ev = Some(val),
                    Section::Gw => report.qp_direct_gap_ev = Some(val),
                    Section::None => {}
                }
            }
        }
    }

    if report.ks_gap_ev.is_none() && report.qp_gap_ev.is_none() {
        return Err(EsutilError::ParseError {
            format: "gw_info".to_string(),
            path: label.to_string(),
            reason: "No band gap entries found".to_string(),
        });
    }

    Ok(report)
}

/// 提取字符串中最后一个数字
fn extract_last_number(s: &str) -> Option<f64> {
    s.split_whitespace()
        .filter_map(|w| w.parse::<f64>().ok())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
 Kohn-Sham band structure
 Fermi energy:     0.0000
  Fundamental BandGap (eV):              0.6105
  Direct BandGap (eV):                   1.1723

 G0W0 band structure
 Fermi energy:     0.0312
  Fundamental BandGap (eV):              1.2554
  Direct BandGap (eV):                   1.8342
"#;

    #[test]
    fn test_parse_both_sections() {
        let report = parse_gw_info_content(SAMPLE, "444").unwrap();

        assert!((report.ks_gap_ev.unwrap() - 0.6105).abs() < 1e-12);
        assert!((report.ks_direct_gap_ev.unwrap() - 1.1723).abs() < 1e-12);
        assert!((report.qp_gap_ev.unwrap() - 1.2554).abs() < 1e-12);
        assert!((report.qp_direct_gap_ev.unwrap() - 1.8342).abs() < 1e-12);
    }

    #[test]
    fn test_gap_correction_from_report() {
        let report = parse_gw_info_content(SAMPLE, "444").unwrap();
        let correction = report.gap_correction_ev().unwrap();
        assert!((correction - 0.6449).abs() < 1e-9);
    }

    #[test]
    fn test_ks_only_output() {
        let content = " Kohn-Sham band structure\n  Fundamental BandGap (eV):  0.5\n";
        let report = parse_gw_info_content(content, "ks").unwrap();
        assert!(report.ks_gap_ev.is_some());
        assert!(report.qp_gap_ev.is_none());
    }

    #[test]
    fn test_gap_outside_section_ignored() {
        let content = "  Fundamental BandGap (eV):  0.5\n";
        assert!(parse_gw_info_content(content, "bad").is_err());
    }

    #[test]
    fn test_no_gaps_rejected() {
        assert!(parse_gw_info_content("nothing\n", "empty").is_err());
    }
}
