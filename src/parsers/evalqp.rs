//! # EVALQP.DAT 解析器
//!
//! 解析 exciting GW 输出的准粒子能量文件。
//!
//! ## 格式说明
//! ```text
//! k-point #     1:    0.000000    0.000000    0.000000    0.125000
//!  state   E_KS     E_HF     E_GW     Sx     Re(Sc)   Im(Sc)   Vxc    DE_HF   DE_GW   Znk
//!      1  -11.870  -19.199  -13.475  -7.328  ...
//! ```
//!
//! 逐块扫描：`k-point #` 行开启新块，随后的 11 列数字行为态记录。
//! 列数不足的行按固定布局解析器的惯例跳过。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/gw.rs` 使用
//! - 使用 `models/gw.rs`

use crate::error::{EsutilError, Result};
use crate::models::{KpointBlock, QpEnergy, QpSpectrum};
use std::fs;
use std::path::Path;

/// 解析 EVALQP.DAT 文件
pub fn parse_evalqp_file(path: &Path) -> Result<QpSpectrum> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_evalqp_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 EVALQP 格式
pub fn parse_evalqp_content(content: &str, source: &str) -> Result<QpSpectrum> {
    let mut spectrum = QpSpectrum::default();
    let mut current: Option<KpointBlock> = None;

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("k-point") {
            if let Some(block) = current.take() {
                spectrum.kpoints.push(block);
            }
            current = parse_kpoint_header(line);
            continue;
        }

        // 列标题行（以 state 开头）跳过
        if line.starts_with("state") {
            continue;
        }

        if let Some(block) = current.as_mut() {
            if let Some(state) = parse_state_row(line) {
                block.states.push(state);
            }
        }
    }

    if let Some(block) = current.take() {
        spectrum.kpoints.push(block);
    }

    if spectrum.kpoints.is_empty() {
        return Err(EsutilError::ParseError {
            format: "evalqp".to_string(),
            path: source.to_string(),
            reason: "No k-point blocks found".to_string(),
        });
    }

    Ok(spectrum)
}

/// 解析 "k-point #     1:    0.0  0.0  0.0  0.125" 行
fn parse_kpoint_header(line: &str) -> Option<KpointBlock> {
    let after_hash = line.split('#').nth(1)?;
    let mut parts = after_hash.split(':');

    let index: usize = parts.next()?.trim().parse().ok()?;
    let numbers: Vec<f64> = parts
        .next()?
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();

    if numbers.len() < 4 {
        return None;
    }

    Some(KpointBlock {
        index,
        coords: [numbers[0], numbers[1], numbers[2]],
        weight: numbers[3],
        states: Vec::new(),
    })
}

/// 解析 11 列态记录行
fn parse_state_row(line: &str) -> Option<QpEnergy> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 11 {
        return None;
    }

    let state: usize = parts[0].parse().ok()?;
    let values: Vec<f64> = parts[1..11]
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();
    if values.len() < 10 {
        return None;
    }

    Some(QpEnergy {
        state,
        e_ks: values[0],
        e_hf: values[1],
        e_gw: values[2],
        sx: values[3],
        re_sc: values[4],
        im_sc: values[5],
        vxc: values[6],
        de_hf: values[7],
        de_gw: values[8],
        znk: values[9],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EigenvalueSet;

    const SAMPLE: &str = r#"k-point #     1:    0.000000    0.000000    0.000000    0.500000
 state   E_KS       E_HF       E_GW       Sx         Re(Sc)     Im(Sc)     Vxc       DE_HF      DE_GW      Znk
     1   -0.40000   -0.52000   -0.43000   -0.90000    0.05000   -0.00100   -0.80000   -0.12000   -0.03000    0.78000
     2    0.22000    0.40000    0.30000   -0.50000    0.02000   -0.00200   -0.60000    0.18000    0.08000    0.80000

k-point #     2:    0.500000    0.000000    0.000000    0.500000
 state   E_KS       E_HF       E_GW       Sx         Re(Sc)     Im(Sc)     Vxc       DE_HF      DE_GW      Znk
     1   -0.55000   -0.70000   -0.60000   -0.95000    0.04000   -0.00100   -0.82000   -0.15000   -0.05000    0.79000
     2    0.35000    0.55000    0.45000   -0.45000    0.03000   -0.00100   -0.58000    0.20000    0.10000    0.81000
"#;

    #[test]
    fn test_parse_kpoint_blocks() {
        let spectrum = parse_evalqp_content(SAMPLE, "EVALQP.DAT").unwrap();
        assert_eq!(spectrum.kpoints.len(), 2);

        let k1 = &spectrum.kpoints[0];
        assert_eq!(k1.index, 1);
        assert!((k1.weight - 0.5).abs() < 1e-12);
        assert_eq!(k1.states.len(), 2);

        let k2 = &spectrum.kpoints[1];
        assert!((k2.coords[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_state_columns() {
        let spectrum = parse_evalqp_content(SAMPLE, "EVALQP.DAT").unwrap();
        let s2 = &spectrum.kpoints[0].states[1];

        assert_eq!(s2.state, 2);
        assert!((s2.e_ks - 0.22).abs() < 1e-12);
        assert!((s2.e_hf - 0.40).abs() < 1e-12);
        assert!((s2.e_gw - 0.30).abs() < 1e-12);
        assert!((s2.vxc + 0.60).abs() < 1e-12);
        assert!((s2.znk - 0.80).abs() < 1e-12);
    }

    #[test]
    fn test_gap_from_parsed_spectrum() {
        let spectrum = parse_evalqp_content(SAMPLE, "EVALQP.DAT").unwrap();

        // VBM = max(-0.40, -0.55) = -0.40; CBM = min(0.22, 0.35) = 0.22
        let ks_gap = spectrum
            .fundamental_gap(1, EigenvalueSet::KohnSham)
            .unwrap();
        assert!((ks_gap - 0.62).abs() < 1e-12);

        // GW: VBM = -0.43, CBM = 0.30
        let gw_gap = spectrum.fundamental_gap(1, EigenvalueSet::Gw).unwrap();
        assert!((gw_gap - 0.73).abs() < 1e-12);
    }

    #[test]
    fn test_short_rows_skipped() {
        let content = r#"k-point #     1:    0.0 0.0 0.0 1.0
     1   -0.4  -0.5
     1   -0.40000   -0.52000   -0.43000   -0.90000    0.05000   -0.00100   -0.80000   -0.12000   -0.03000    0.78000
"#;
        let spectrum = parse_evalqp_content(content, "test").unwrap();
        assert_eq!(spectrum.kpoints[0].states.len(), 1);
    }

    #[test]
    fn test_no_blocks_rejected() {
        assert!(parse_evalqp_content("nothing here\n", "empty").is_err());
    }
}
