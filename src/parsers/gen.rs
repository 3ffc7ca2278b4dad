//! # DFTB+ GEN 格式解析器
//!
//! 解析 DFTB+ 的 .gen 结构文件格式。
//!
//! ## GEN 格式说明
//! ```text
//! 2  S                  # atom count, type letter (C/S/F)
//! Ga As                 # species names
//! 1 1  0.00 0.00 0.00   # index, species index, coordinates
//! 2 2  1.36 1.36 1.36
//! 0.00 0.00 0.00        # origin (S/F only)
//! 2.71 2.71 0.00        # lattice vectors (S/F only)
//! 0.00 2.71 2.71
//! 2.71 0.00 2.71
//! ```
//!
//! 类型字母：C = 分子（笛卡尔），S = 超胞（笛卡尔），F = 超胞（分数坐标）。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{EsutilError, Result};
use crate::models::{Atom, CoordKind, Lattice, Structure};
use std::fs;
use std::path::Path;

/// 解析 .gen 文件
pub fn parse_gen_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_gen_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 GEN 格式
pub fn parse_gen_content(content: &str, default_name: &str) -> Result<Structure> {
    let parse_error = |reason: String| EsutilError::ParseError {
        format: "gen".to_string(),
        path: default_name.to_string(),
        reason,
    };

    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 3 {
        return Err(parse_error("File too short".to_string()));
    }

    // Line 0: atom count + type letter
    let mut header = lines[0].split_whitespace();
    let natoms: usize = header
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error(format!("Invalid header line: '{}'", lines[0])))?;

    let type_letter = header
        .next()
        .map(|s| s.to_uppercase())
        .ok_or_else(|| parse_error("Missing geometry type letter".to_string()))?;

    let (periodic, coord_kind) = match type_letter.as_str() {
        "C" => (false, CoordKind::Cartesian),
        "S" => (true, CoordKind::Cartesian),
        "F" => (true, CoordKind::Fractional),
        other => {
            return Err(parse_error(format!(
                "Unknown geometry type '{}' (expected C, S or F)",
                other
            )))
        }
    };

    // Line 1: species names
    let species: Vec<String> = lines[1].split_whitespace().map(|s| s.to_string()).collect();
    if species.is_empty() {
        return Err(parse_error("Empty species line".to_string()));
    }

    // 原子行
    if lines.len() < 2 + natoms {
        return Err(parse_error(format!(
            "Declared {} atoms but only {} atom lines present",
            natoms,
            lines.len() - 2
        )));
    }

    let mut raw_positions: Vec<(usize, [f64; 3])> = Vec::with_capacity(natoms);
    for (i, line) in lines[2..2 + natoms].iter().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 5 {
            return Err(parse_error(format!("Invalid atom record: '{}'", line)));
        }

        let species_idx: usize = parts[1]
            .parse()
            .map_err(|_| parse_error(format!("Invalid species index in '{}'", line)))?;

        if species_idx < 1 || species_idx > species.len() {
            return Err(parse_error(format!(
                "Species index {} out of range 1..={} at atom {}",
                species_idx,
                species.len(),
                i + 1
            )));
        }

        let coords: Vec<f64> = parts[2..5].iter().filter_map(|s| s.parse().ok()).collect();
        if coords.len() < 3 {
            return Err(parse_error(format!("Invalid coordinates in '{}'", line)));
        }

        raw_positions.push((species_idx, [coords[0], coords[1], coords[2]]));
    }

    // 周期性结构：原点行 + 三个晶格向量行
    let lattice = if periodic {
        let lattice_start = 2 + natoms + 1; // 跳过原点行
        if lines.len() < lattice_start + 3 {
            return Err(parse_error("Missing lattice vector lines".to_string()));
        }

        let mut matrix = [[0.0; 3]; 3];
        for i in 0..3 {
            let parts: Vec<f64> = lines[lattice_start + i]
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            if parts.len() < 3 {
                return Err(parse_error(format!(
                    "Invalid lattice vector: '{}'",
                    lines[lattice_start + i]
                )));
            }
            matrix[i] = [parts[0], parts[1], parts[2]];
        }
        Some(Lattice::from_vectors(matrix))
    } else {
        None
    };

    // 统一转为笛卡尔坐标
    let atoms: Vec<Atom> = raw_positions
        .into_iter()
        .map(|(species_idx, pos)| {
            let cart = match (coord_kind, &lattice) {
                (CoordKind::Fractional, Some(l)) => l.frac_to_cart(pos),
                _ => pos,
            };
            Atom::new(species[species_idx - 1].clone(), cart)
        })
        .collect();

    let mut structure = Structure::new(default_name, lattice, atoms);
    structure.source_format = Some("gen".to_string());

    Ok(structure)
}

/// 将 Structure 转换为 GEN 格式字符串
///
/// 分子结构写 C 类型，周期性结构写 S 类型（笛卡尔超胞）
pub fn to_gen_string(structure: &Structure) -> String {
    let species = structure.species_list();
    let type_letter = if structure.is_periodic() { "S" } else { "C" };

    let mut result = String::new();
    result.push_str(&format!("{} {}\n", structure.atoms.len(), type_letter));
    result.push_str(&format!("{}\n", species.join(" ")));

    for (i, atom) in structure.atoms.iter().enumerate() {
        let species_idx = species.iter().position(|s| *s == atom.species).unwrap() + 1;
        result.push_str(&format!(
            "{:5} {:3} {:16.10} {:16.10} {:16.10}\n",
            i + 1,
            species_idx,
            atom.position[0],
            atom.position[1],
            atom.position[2]
        ));
    }

    if let Some(lattice) = &structure.lattice {
        result.push_str(&format!(
            "{:16.10} {:16.10} {:16.10}\n",
            0.0, 0.0, 0.0
        ));
        for row in &lattice.matrix {
            result.push_str(&format!(
                "{:16.10} {:16.10} {:16.10}\n",
                row[0], row[1], row[2]
            ));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gen_cluster() {
        let content = r#"3 C
O H
1 1  0.000  0.000  0.117
2 2  0.000  0.757 -0.469
3 2  0.000 -0.757 -0.469
"#;
        let structure = parse_gen_content(content, "water").unwrap();
        assert_eq!(structure.atoms.len(), 3);
        assert!(!structure.is_periodic());
        assert_eq!(structure.atoms[0].species, "O");
        assert_eq!(structure.atoms[2].species, "H");
    }

    #[test]
    fn test_parse_gen_supercell() {
        let content = r#"2 S
Ga As
1 1  0.00 0.00 0.00
2 2  1.36 1.36 1.36
0.00 0.00 0.00
2.71 2.71 0.00
0.00 2.71 2.71
2.71 0.00 2.71
"#;
        let structure = parse_gen_content(content, "gaas").unwrap();
        assert!(structure.is_periodic());
        assert_eq!(structure.atoms.len(), 2);
        // S 类型坐标已经是笛卡尔
        assert!((structure.atoms[1].position[0] - 1.36).abs() < 1e-12);
    }

    #[test]
    fn test_parse_gen_fractional() {
        let content = r#"2 F
Si
1 1  0.00 0.00 0.00
2 1  0.25 0.25 0.25
0.0 0.0 0.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
"#;
        let structure = parse_gen_content(content, "si").unwrap();
        // 分数坐标 0.25 对应笛卡尔 1.0
        assert!((structure.atoms[1].position[0] - 1.0).abs() < 1e-12);
        assert!((structure.atoms[1].position[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_gen_species_index_out_of_range() {
        let content = r#"1 C
H
1 2  0.0 0.0 0.0
"#;
        let err = parse_gen_content(content, "bad").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_parse_gen_atom_count_mismatch() {
        let content = r#"3 C
H
1 1  0.0 0.0 0.0
"#;
        assert!(parse_gen_content(content, "bad").is_err());
    }

    #[test]
    fn test_gen_round_trip_periodic() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let atoms = vec![
            Atom::new("Si", [0.0, 0.0, 0.0]),
            Atom::new("C", [1.0, 1.0, 1.0]),
        ];
        let structure = Structure::new("SiC", Some(lattice), atoms);

        let text = to_gen_string(&structure);
        let parsed = parse_gen_content(&text, "SiC").unwrap();

        assert!(parsed.is_periodic());
        assert_eq!(parsed.atoms.len(), 2);
        assert_eq!(parsed.atoms[1].species, "C");
        assert!((parsed.atoms[1].position[1] - 1.0).abs() < 1e-9);
    }
}
