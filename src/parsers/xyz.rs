//! # XYZ 格式解析器
//!
//! 解析分子坐标 .xyz 文件格式。
//!
//! ## XYZ 格式说明
//! ```text
//! 3                                # atom count
//! water   Lattice="..."           # comment, optional extended-xyz lattice
//! O  0.000  0.000  0.117
//! H  0.000  0.757 -0.469
//! H  0.000 -0.757 -0.469
//! ```
//!
//! 注释行可携带 extended-xyz 的 `Lattice="ax ay az bx by bz cx cy cz"`
//! 属性，解析后成为周期性结构。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{EsutilError, Result};
use crate::models::{Atom, Lattice, Structure};
use regex::Regex;
use std::fs;
use std::path::Path;

/// 解析 .xyz 文件
pub fn parse_xyz_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xyz_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 XYZ 格式
pub fn parse_xyz_content(content: &str, default_name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 2 {
        return Err(EsutilError::ParseError {
            format: "xyz".to_string(),
            path: default_name.to_string(),
            reason: "File too short".to_string(),
        });
    }

    // Line 0: atom count
    let natoms: usize = lines[0].trim().parse().map_err(|_| EsutilError::ParseError {
        format: "xyz".to_string(),
        path: default_name.to_string(),
        reason: format!("Invalid atom count line: '{}'", lines[0].trim()),
    })?;

    // Line 1: comment, 可能含 extended-xyz Lattice 属性
    let comment = lines[1].trim();
    let lattice = parse_lattice_attribute(comment);

    let name = {
        // 去掉 Lattice="..." 后剩余部分作为名称
        let stripped = lattice_attr_regex().replace(comment, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            default_name.to_string()
        } else {
            stripped.to_string()
        }
    };

    if lines.len() < 2 + natoms {
        return Err(EsutilError::ParseError {
            format: "xyz".to_string(),
            path: default_name.to_string(),
            reason: format!(
                "Declared {} atoms but only {} coordinate lines present",
                natoms,
                lines.len() - 2
            ),
        });
    }

    let mut atoms = Vec::with_capacity(natoms);
    for (i, line) in lines[2..2 + natoms].iter().enumerate() {
        let mut parts = line.split_whitespace();
        let species = parts.next().unwrap_or("");
        let coords: Vec<f64> = parts.take(3).filter_map(|s| s.parse().ok()).collect();

        if species.is_empty() || coords.len() < 3 {
            return Err(EsutilError::ParseError {
                format: "xyz".to_string(),
                path: default_name.to_string(),
                reason: format!("Invalid atom record at line {}", i + 3),
            });
        }

        atoms.push(Atom::new(species, [coords[0], coords[1], coords[2]]));
    }

    let mut structure = Structure::new(name, lattice, atoms);
    structure.source_format = Some("xyz".to_string());

    Ok(structure)
}

fn lattice_attr_regex() -> Regex {
    Regex::new(r#"Lattice="([^"]+)""#).unwrap()
}

/// 提取 extended-xyz 的 Lattice 属性（9 个数字，行优先）
fn parse_lattice_attribute(comment: &str) -> Option<Lattice> {
    let caps = lattice_attr_regex().captures(comment)?;
    let values: Vec<f64> = caps[1]
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();

    if values.len() != 9 {
        return None;
    }

    Some(Lattice::from_vectors([
        [values[0], values[1], values[2]],
        [values[3], values[4], values[5]],
        [values[6], values[7], values[8]],
    ]))
}

/// 将 Structure 转换为 XYZ 格式字符串
pub fn to_xyz_string(structure: &Structure) -> String {
    let mut result = String::new();
    result.push_str(&format!("{}\n", structure.atoms.len()));

    match &structure.lattice {
        Some(lattice) => {
            let m = lattice.matrix;
            result.push_str(&format!(
                "{} Lattice=\"{:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10}\"\n",
                structure.name,
                m[0][0], m[0][1], m[0][2],
                m[1][0], m[1][1], m[1][2],
                m[2][0], m[2][1], m[2][2],
            ));
        }
        None => result.push_str(&format!("{}\n", structure.name)),
    }

    for atom in &structure.atoms {
        result.push_str(&format!(
            "{} {:16.10} {:16.10} {:16.10}\n",
            atom.species, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xyz_molecule() {
        let content = r#"3
water
O  0.000  0.000  0.117
H  0.000  0.757 -0.469
H  0.000 -0.757 -0.469
"#;
        let structure = parse_xyz_content(content, "h2o").unwrap();
        assert_eq!(structure.name, "water");
        assert_eq!(structure.atoms.len(), 3);
        assert!(structure.lattice.is_none());
        assert_eq!(structure.atoms[0].species, "O");
        assert!((structure.atoms[1].position[1] - 0.757).abs() < 1e-12);
    }

    #[test]
    fn test_parse_xyz_with_lattice_attribute() {
        let content = r#"1
Lattice="4.0 0.0 0.0 0.0 4.0 0.0 0.0 0.0 4.0"
Si 0.0 0.0 0.0
"#;
        let structure = parse_xyz_content(content, "si").unwrap();
        assert!(structure.is_periodic());
        let (a, _, _, _, _, _) = structure.lattice.as_ref().unwrap().parameters();
        assert!((a - 4.0).abs() < 1e-12);
        // 无剩余注释，回退到默认名
        assert_eq!(structure.name, "si");
    }

    #[test]
    fn test_parse_xyz_count_mismatch() {
        let content = r#"4
too few
C 0.0 0.0 0.0
C 1.0 0.0 0.0
"#;
        let err = parse_xyz_content(content, "bad").unwrap_err();
        assert!(err.to_string().contains("Declared 4 atoms"));
    }

    #[test]
    fn test_parse_xyz_bad_count_line() {
        let content = "abc\ncomment\n";
        assert!(parse_xyz_content(content, "bad").is_err());
    }

    #[test]
    fn test_xyz_round_trip_periodic() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 6.0]]);
        let atoms = vec![
            Atom::new("Ti", [0.0, 0.0, 0.0]),
            Atom::new("O", [2.0, 2.5, 0.0]),
        ];
        let structure = Structure::new("TiO", Some(lattice), atoms);

        let text = to_xyz_string(&structure);
        let parsed = parse_xyz_content(&text, "round_trip").unwrap();

        assert_eq!(parsed.atoms.len(), 2);
        assert!(parsed.is_periodic());
        let (_, b, _, _, _, _) = parsed.lattice.as_ref().unwrap().parameters();
        assert!((b - 5.0).abs() < 1e-9);
    }
}
