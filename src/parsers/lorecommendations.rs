//! # lorecommendations 解析器
//!
//! 解析 exciting GW 前处理输出的局域轨道试探能量推荐表。
//!
//! ## 格式说明
//! ```text
//! species 1
//!  l =  0
//!    0   -0.4524
//!    1    0.8913
//!  l =  1
//!    0    0.1101
//! species 2
//!  ...
//! ```
//!
//! 数据行为 `节点数 能量` 两列；行首空白和空行忽略。
//!
//! ## 依赖关系
//! - 被 `commands/basis.rs` 使用
//! - 填充 `lobasis/mod.rs` 的 LoRecommendations

use crate::error::{EsutilError, Result};
use crate::lobasis::{LoChannel, LoRecommendations, SpeciesLoTable};
use std::fs;
use std::path::Path;

/// 解析 lorecommendations 文件
pub fn parse_lorecommendations_file(path: &Path) -> Result<LoRecommendations> {
    let content = fs::read_to_string(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_lorecommendations_content(&content, &path.display().to_string())
}

/// 从字符串内容解析推荐表
pub fn parse_lorecommendations_content(content: &str, source: &str) -> Result<LoRecommendations> {
    let parse_error = |reason: String| EsutilError::ParseError {
        format: "lorecommendations".to_string(),
        path: source.to_string(),
        reason,
    };

    let mut recommendations = LoRecommendations::default();
    let mut current_species: Option<SpeciesLoTable> = None;
    let mut current_channel: Option<LoChannel> = None;

    let flush_channel =
        |species: &mut Option<SpeciesLoTable>, channel: &mut Option<LoChannel>| {
            if let (Some(sp), Some(ch)) = (species.as_mut(), channel.take()) {
                sp.channels.push(ch);
            }
        };

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let lower = line.to_lowercase();

        if lower.starts_with("species") {
            flush_channel(&mut current_species, &mut current_channel);
            if let Some(sp) = current_species.take() {
                recommendations.species.push(sp);
            }

            let index: usize = line
                .split_whitespace()
                .nth(1)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    parse_error(format!("Invalid species line {}: '{}'", lineno + 1, line))
                })?;

            current_species = Some(SpeciesLoTable {
                species_index: index,
                channels: Vec::new(),
            });
        } else if lower.starts_with('l') && line.contains('=') {
            flush_channel(&mut current_species, &mut current_channel);

            let l: usize = line
                .split('=')
                .nth(1)
                .and_then(|s| s.split_whitespace().next())
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    parse_error(format!("Invalid channel line {}: '{}'", lineno + 1, line))
                })?;

            if current_species.is_none() {
                return Err(parse_error(format!(
                    "Channel 'l = {}' before any species block (line {})",
                    l,
                    lineno + 1
                )));
            }

            current_channel = Some(LoChannel {
                l,
                energies: Vec::new(),
            });
        } else {
            // 数据行：节点数 + 能量
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                continue;
            }
            let energy: f64 = match parts[parts.len() - 1].parse() {
                Ok(e) => e,
                Err(_) => continue,
            };

            let channel = current_channel.as_mut().ok_or_else(|| {
                parse_error(format!(
                    "Energy row outside any 'l =' channel (line {})",
                    lineno + 1
                ))
            })?;
            channel.energies.push(energy);
        }
    }

    flush_channel(&mut current_species, &mut current_channel);
    if let Some(sp) = current_species.take() {
        recommendations.species.push(sp);
    }

    if recommendations.species.is_empty() {
        return Err(parse_error("No species blocks found".to_string()));
    }

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
species 1
 l =  0
   0   -0.4524
   1    0.8913
   2    3.2001
 l =  1
   0    0.1101
   1    1.9870
species 2
 l =  0
   0   -1.2345
"#;

    #[test]
    fn test_parse_two_species() {
        let rec = parse_lorecommendations_content(SAMPLE, "test").unwrap();
        assert_eq!(rec.species.len(), 2);

        let sp1 = rec.species_table(1).unwrap();
        assert_eq!(sp1.channels.len(), 2);
        assert_eq!(sp1.channels[0].l, 0);
        assert_eq!(sp1.channels[0].energies.len(), 3);
        assert!((sp1.channels[0].energies[0] + 0.4524).abs() < 1e-12);
        assert_eq!(sp1.channels[1].l, 1);
        assert_eq!(sp1.channels[1].energies.len(), 2);

        let sp2 = rec.species_table(2).unwrap();
        assert_eq!(sp2.channels.len(), 1);
        assert!((sp2.channels[0].energies[0] + 1.2345).abs() < 1e-12);
    }

    #[test]
    fn test_energy_row_before_channel_rejected() {
        let content = "species 1\n  0  -0.5\n";
        assert!(parse_lorecommendations_content(content, "bad").is_err());
    }

    #[test]
    fn test_channel_before_species_rejected() {
        let content = " l = 0\n  0  -0.5\n";
        assert!(parse_lorecommendations_content(content, "bad").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(parse_lorecommendations_content("\n\n", "empty").is_err());
    }

    #[test]
    fn test_filter_integration_with_cutoff() {
        let rec = parse_lorecommendations_content(SAMPLE, "test").unwrap();
        let sp1 = rec.species_table(1).unwrap();

        let kept = sp1.channel(0).unwrap().below_cutoff(1.0);
        let energies: Vec<f64> = kept.iter().map(|(_, e)| *e).collect();
        assert_eq!(energies.len(), 2);
        assert!(energies.iter().all(|&e| e < 1.0));
    }
}
