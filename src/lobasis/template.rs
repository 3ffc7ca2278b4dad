//! # 局域轨道 XML 片段渲染
//!
//! 将筛选后的试探能量填入 exciting 物种文件的 `<lo>`/`<wf>` 模板。
//! 纯文本拼接，不做 XML 解析或回读校验。
//!
//! ## 依赖关系
//! - 被 `commands/basis.rs` 调用
//! - 使用 `lobasis/mod.rs` 的 LoChannel, SpeciesLoTable

use crate::lobasis::SpeciesLoTable;

/// 单个局域轨道块
///
/// matchingOrder 0 和 1 共享同一试探能量（能量导数匹配）
pub fn lo_block(l: usize, trial_energy: f64) -> String {
    format!(
        r#"  <lo l="{l}">
    <wf matchingOrder="0" trialEnergy="{e:.4}" searchE="false"/>
    <wf matchingOrder="1" trialEnergy="{e:.4}" searchE="false"/>
  </lo>
"#,
        l = l,
        e = trial_energy,
    )
}

/// 渲染一个物种的完整 `<basis>` 片段
///
/// 每个通道保留严格低于截断的试探能量，l 超过 l_max 的通道忽略；
/// max_per_channel 限制每通道保留的轨道数（None 不限制）。
pub fn render_species_basis(
    table: &SpeciesLoTable,
    symbol: &str,
    cutoff: f64,
    l_max: usize,
    max_per_channel: Option<usize>,
) -> String {
    let mut result = String::new();

    result.push_str(&format!(
        "<!-- {} local orbitals, trial energies below {:.4} Ha -->\n",
        symbol, cutoff
    ));
    result.push_str("<basis>\n");

    for channel in &table.channels {
        if channel.l > l_max {
            continue;
        }

        let mut kept = channel.below_cutoff(cutoff);
        if let Some(cap) = max_per_channel {
            kept.truncate(cap);
        }

        for (_, energy) in kept {
            result.push_str(&lo_block(channel.l, energy));
        }
    }

    result.push_str("</basis>\n");
    result
}

/// 统计渲染时每通道保留的轨道数 (l, 推荐总数, 保留数)
pub fn channel_counts(
    table: &SpeciesLoTable,
    cutoff: f64,
    l_max: usize,
    max_per_channel: Option<usize>,
) -> Vec<(usize, usize, usize)> {
    table
        .channels
        .iter()
        .filter(|c| c.l <= l_max)
        .map(|c| {
            let mut kept = c.below_cutoff(cutoff).len();
            if let Some(cap) = max_per_channel {
                kept = kept.min(cap);
            }
            (c.l, c.energies.len(), kept)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lobasis::LoChannel;

    fn table() -> SpeciesLoTable {
        SpeciesLoTable {
            species_index: 1,
            channels: vec![
                LoChannel {
                    l: 0,
                    energies: vec![-0.31, 0.52, 4.8, 120.0],
                },
                LoChannel {
                    l: 1,
                    energies: vec![0.11, 95.0, 210.0],
                },
                LoChannel {
                    l: 2,
                    energies: vec![1.5],
                },
            ],
        }
    }

    #[test]
    fn test_lo_block_layout() {
        let block = lo_block(1, -0.3145);
        assert!(block.contains(r#"<lo l="1">"#));
        assert!(block.contains(r#"matchingOrder="0" trialEnergy="-0.3145""#));
        assert!(block.contains(r#"matchingOrder="1" trialEnergy="-0.3145""#));
        assert!(block.contains(r#"searchE="false""#));
    }

    #[test]
    fn test_render_includes_exactly_energies_below_cutoff() {
        let rendered = render_species_basis(&table(), "Zr", 100.0, 2, None);

        // l=0: -0.31, 0.52, 4.8 保留；120.0 排除
        assert!(rendered.contains(r#"trialEnergy="-0.3100""#));
        assert!(rendered.contains(r#"trialEnergy="0.5200""#));
        assert!(rendered.contains(r#"trialEnergy="4.8000""#));
        assert!(!rendered.contains(r#"trialEnergy="120.0000""#));

        // l=1: 0.11, 95.0 保留；210.0 排除
        assert!(rendered.contains(r#"trialEnergy="0.1100""#));
        assert!(rendered.contains(r#"trialEnergy="95.0000""#));
        assert!(!rendered.contains(r#"trialEnergy="210.0000""#));

        // l=2: 1.5 保留
        assert!(rendered.contains(r#"trialEnergy="1.5000""#));
    }

    #[test]
    fn test_render_respects_l_max() {
        let rendered = render_species_basis(&table(), "Zr", 100.0, 1, None);
        assert!(!rendered.contains(r#"<lo l="2">"#));
    }

    #[test]
    fn test_render_caps_per_channel() {
        let rendered = render_species_basis(&table(), "Zr", 100.0, 0, Some(2));
        assert!(rendered.contains(r#"trialEnergy="-0.3100""#));
        assert!(rendered.contains(r#"trialEnergy="0.5200""#));
        assert!(!rendered.contains(r#"trialEnergy="4.8000""#));
    }

    #[test]
    fn test_channel_counts() {
        let counts = channel_counts(&table(), 100.0, 2, None);
        assert_eq!(counts, vec![(0, 4, 3), (1, 3, 2), (2, 1, 1)]);
    }

    #[test]
    fn test_boundary_energy_excluded() {
        let t = SpeciesLoTable {
            species_index: 1,
            channels: vec![LoChannel {
                l: 0,
                energies: vec![100.0],
            }],
        };
        let rendered = render_species_basis(&t, "Ti", 100.0, 0, None);
        assert!(!rendered.contains("<lo"));
    }
}
