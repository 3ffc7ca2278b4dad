//! # 局域轨道基组模块
//!
//! 根据 lorecommendations 试探能量表和能量截断生成 exciting 局域轨道基组。
//!
//! ## 子模块
//! - `template`: XML 片段渲染
//!
//! ## 依赖关系
//! - 被 `commands/basis.rs` 使用
//! - 数据由 `parsers/lorecommendations.rs` 填充

pub mod template;

use std::ops::Range;

/// 单个角动量通道的试探能量表
///
/// energies 按节点数 n 排列（下标即 n）
#[derive(Debug, Clone)]
pub struct LoChannel {
    /// 角动量量子数 l
    pub l: usize,
    /// 试探能量 (Ha)，按节点数排列
    pub energies: Vec<f64>,
}

impl LoChannel {
    /// 严格低于截断的 (节点数, 能量) 条目
    pub fn below_cutoff(&self, cutoff: f64) -> Vec<(usize, f64)> {
        self.energies
            .iter()
            .enumerate()
            .filter(|(_, &e)| e < cutoff)
            .map(|(n, &e)| (n, e))
            .collect()
    }
}

/// 单个物种的推荐表
#[derive(Debug, Clone)]
pub struct SpeciesLoTable {
    /// 物种序号（lorecommendations 文件中从 1 开始）
    pub species_index: usize,
    /// 每个角动量通道一个条目，按 l 升序
    pub channels: Vec<LoChannel>,
}

impl SpeciesLoTable {
    /// 取指定 l 的通道
    pub fn channel(&self, l: usize) -> Option<&LoChannel> {
        self.channels.iter().find(|c| c.l == l)
    }

    /// 最大可用角动量
    pub fn l_max(&self) -> Option<usize> {
        self.channels.iter().map(|c| c.l).max()
    }
}

/// 整个 lorecommendations 文件的内容
#[derive(Debug, Clone, Default)]
pub struct LoRecommendations {
    pub species: Vec<SpeciesLoTable>,
}

impl LoRecommendations {
    /// 按物种序号取推荐表
    pub fn species_table(&self, index: usize) -> Option<&SpeciesLoTable> {
        self.species.iter().find(|s| s.species_index == index)
    }
}

/// 壳层描述符：物种 + 主量子数 + 角动量
///
/// 仅用于计算基函数下标范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub species: String,
    pub n: usize,
    pub l: usize,
}

impl Shell {
    pub fn new(species: impl Into<String>, n: usize, l: usize) -> Self {
        Shell {
            species: species.into(),
            n,
            l,
        }
    }

    /// 壳层包含的基函数数目 (2l + 1)
    pub fn num_functions(&self) -> usize {
        2 * self.l + 1
    }
}

/// 按壳层顺序累积偏移，返回每个壳层的半开下标范围
pub fn shell_index_ranges(shells: &[Shell]) -> Vec<Range<usize>> {
    let mut ranges = Vec::with_capacity(shells.len());
    let mut offset = 0;

    for shell in shells {
        let count = shell.num_functions();
        ranges.push(offset..offset + count);
        offset += count;
    }

    ranges
}
