//! # LINENGY.OUT 解析器
//!
//! 解析 exciting 输出的线性化能量文件。
//!
//! ## 格式说明
//! ```text
//! Species :    1 (Si), atom :    1
//!  APW functions :
//!   l =  0, order =  1 :   -0.3518343608
//!   l =  0, order =  2 :   -0.3518343608
//!  local-orbital functions :
//!   l.o. =  1, l =  0, order =  1 :   -0.3518343608
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/basis.rs` 使用
//! - 无外部模块依赖

use crate::error::{EsutilError, Result};
use std::fs;
use std::path::Path;

/// APW 线性化能量条目
#[derive(Debug, Clone)]
pub struct ApwEnergy {
    pub l: usize,
    pub order: usize,
    /// 线性化能量 (Ha)
    pub energy: f64,
}

/// 局域轨道线性化能量条目
#[derive(Debug, Clone)]
pub struct LocalOrbitalEnergy {
    /// 局域轨道序号
    pub lo: usize,
    pub l: usize,
    pub order: usize,
    /// 线性化能量 (Ha)
    pub energy: f64,
}

/// 单个原子的线性化能量块
#[derive(Debug, Clone)]
pub struct AtomLinearization {
    pub species_index: usize,
    pub symbol: String,
    pub atom_index: usize,
    pub apw: Vec<ApwEnergy>,
    pub local_orbitals: Vec<LocalOrbitalEnergy>,
}

/// LINENGY.OUT 的完整内容
#[derive(Debug, Clone, Default)]
pub struct Linengy {
    pub atoms: Vec<AtomLinearization>,
}

impl Linengy {
    /// 某物种第一个原子的块（等价原子共享线性化能量）
    pub fn species_block(&self, species_index: usize) -> Option<&AtomLinearization> {
        self.atoms
            .iter()
            .find(|a| a.species_index == species_index)
    }

    /// 某物种某通道当前使用的最高局域轨道能量
    pub fn max_lo_energy(&self, species_index: usize, l: usize) -> Option<f64> {
        let block = self.species_block(species_index)?;
        block
            .local_orbitals
            .iter()
            .filter(|e| e.l == l)
            .map(|e| e.energy)
            .fold(None, |acc, e| Some(acc.map_or(e, |a: f64| a.max(e))))
    }
}

/// 解析 LINENGY.OUT 文件
pub fn parse_linengy_file(path: &Path) -> Result<Linengy> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_linengy_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 LINENGY 格式
pub fn parse_linengy_content(content: &str, source: &str) -> Result<Linengy> {
    let parse_error = |reason: String| EsutilError::ParseError {
        format: "linengy".to_string(),
        path: source.to_string(),
        reason,
    };

    #[derive(PartialEq)]
    enum Section {
        None,
        Apw,
        LocalOrbital,
    }

    let mut result = Linengy::default();
    let mut current: Option<AtomLinearization> = None;
    let mut section = Section::None;

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("Species") {
            if let Some(block) = current.take() {
                result.atoms.push(block);
            }
            section = Section::None;

            current = Some(parse_species_header(line).ok_or_else(|| {
                parse_error(format!("Invalid species header at line {}: '{}'", lineno + 1, line))
            })?);
        } else if line.starts_with("APW") {
            section = Section::Apw;
        } else if line.starts_with("local-orbital") {
            section = Section::LocalOrbital;
        } else if line.contains('=') && line.contains(':') {
            let block = current.as_mut().ok_or_else(|| {
                parse_error(format!(
                    "Energy row before any Species block (line {})",
                    lineno + 1
                ))
            })?;

            let (fields, energy) = match parse_energy_row(line) {
                Some(v) => v,
                None => continue, // 数字字段损坏的行按 OUTCAR 解析器的方式跳过
            };

            match section {
                Section::Apw => {
                    if let (Some(&l), Some(&order)) = (fields.first(), fields.get(1)) {
                        block.apw.push(ApwEnergy { l, order, energy });
                    }
                }
                Section::LocalOrbital => {
                    if fields.len() >= 3 {
                        block.local_orbitals.push(LocalOrbitalEnergy {
                            lo: fields[0],
                            l: fields[1],
                            order: fields[2],
                            energy,
                        });
                    }
                }
                Section::None => {}
            }
        }
    }

    if let Some(block) = current.take() {
        result.atoms.push(block);
    }

    if result.atoms.is_empty() {
        return Err(parse_error("No species blocks found".to_string()));
    }

    Ok(result)
}

/// 解析 "Species :    1 (Si), atom :    1"
fn parse_species_header(line: &str) -> Option<AtomLinearization> {
    let species_index: usize = line
        .split(':')
        .nth(1)?
        .split_whitespace()
        .next()?
        .parse()
        .ok()?;

    let symbol = line
        .split('(')
        .nth(1)?
        .split(')')
        .next()?
        .trim()
        .to_string();

    let atom_index: usize = line
        .rsplit(':')
        .next()?
        .trim()
        .parse()
        .ok()?;

    Some(AtomLinearization {
        species_index,
        symbol,
        atom_index,
        apw: Vec::new(),
        local_orbitals: Vec::new(),
    })
}

/// 解析 "l.o. =  1, l =  0, order =  1 :   -0.3518" 形式的行
///
/// 返回 (等号右侧的整数字段序列, 冒号后的能量)
fn parse_energy_row(line: &str) -> Option<(Vec<usize>, f64)> {
    let colon = line.rfind(':')?;
    let energy: f64 = line[colon + 1..].trim().split_whitespace().next()?.parse().ok()?;

    let fields: Vec<usize> = line[..colon]
        .split(',')
        .filter_map(|pair| pair.split('=').nth(1))
        .filter_map(|v| v.trim().parse().ok())
        .collect();

    if fields.is_empty() {
        return None;
    }

    Some((fields, energy))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"Species :    1 (Si), atom :    1
 APW functions :
  l =  0, order =  1 :   -0.3518343608
  l =  0, order =  2 :   -0.3518343608
  l =  1, order =  1 :    0.2500000000
 local-orbital functions :
  l.o. =  1, l =  0, order =  1 :   -0.3518343608
  l.o. =  1, l =  0, order =  2 :   -0.3518343608
  l.o. =  2, l =  1, order =  1 :    0.2500000000
Species :    2 (O), atom :    1
 APW functions :
  l =  0, order =  1 :   -0.8721000000
 local-orbital functions :
  l.o. =  1, l =  0, order =  1 :   -0.8721000000
"#;

    #[test]
    fn test_parse_species_blocks() {
        let linengy = parse_linengy_content(SAMPLE, "LINENGY.OUT").unwrap();
        assert_eq!(linengy.atoms.len(), 2);

        let si = &linengy.atoms[0];
        assert_eq!(si.species_index, 1);
        assert_eq!(si.symbol, "Si");
        assert_eq!(si.atom_index, 1);
        assert_eq!(si.apw.len(), 3);
        assert_eq!(si.local_orbitals.len(), 3);

        assert_eq!(si.apw[2].l, 1);
        assert!((si.apw[2].energy - 0.25).abs() < 1e-12);

        assert_eq!(si.local_orbitals[2].lo, 2);
        assert_eq!(si.local_orbitals[2].l, 1);
    }

    #[test]
    fn test_species_block_lookup() {
        let linengy = parse_linengy_content(SAMPLE, "LINENGY.OUT").unwrap();
        let o = linengy.species_block(2).unwrap();
        assert_eq!(o.symbol, "O");
        assert!((o.apw[0].energy + 0.8721).abs() < 1e-12);
    }

    #[test]
    fn test_max_lo_energy() {
        let linengy = parse_linengy_content(SAMPLE, "LINENGY.OUT").unwrap();
        let max = linengy.max_lo_energy(1, 0).unwrap();
        assert!((max + 0.3518343608).abs() < 1e-12);
        assert!(linengy.max_lo_energy(1, 3).is_none());
    }

    #[test]
    fn test_energy_row_before_species_rejected() {
        let content = "  l =  0, order =  1 :   -0.35\n";
        assert!(parse_linengy_content(content, "bad").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(parse_linengy_content("", "empty").is_err());
    }
}
