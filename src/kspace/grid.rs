//! # Monkhorst-Pack k 点网格生成器
//!
//! 按闭式分数坐标序列生成均匀倒空间采样网格。
//!
//! ## 算法概述
//! 1. 每个轴的采样分数为 u_r = (2r - n - 1) / (2n)，r = 1..=n
//! 2. 可选分数平移 s_i 以 s_i / n_i 进入每个轴
//! 3. 笛卡尔坐标由倒格矢变换得到
//!
//! ## 参考
//! - H. J. Monkhorst and J. D. Pack, Phys. Rev. B 13, 5188 (1976)
//!
//! ## 依赖关系
//! - 被 `commands/kgrid.rs` 调用
//! - 使用 `models/structure.rs` 的 Lattice

use crate::error::{EsutilError, Result};
use crate::models::Lattice;

/// 单个 k 点
#[derive(Debug, Clone)]
pub struct Kpoint {
    /// 倒格矢分数坐标
    pub frac: [f64; 3],
    /// 笛卡尔坐标 (Å⁻¹)
    pub cart: [f64; 3],
    /// 采样权重（均匀网格为 1/N）
    pub weight: f64,
}

/// k 点网格
#[derive(Debug, Clone)]
pub struct KpointGrid {
    /// 每轴采样数 (n1, n2, n3)
    pub divisions: [usize; 3],
    /// 分数平移
    pub shift: [f64; 3],
    /// k 点列表，第三轴变化最快
    pub points: Vec<Kpoint>,
}

impl KpointGrid {
    /// 网格点总数
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 网格是否包含 Γ 点
    pub fn contains_gamma(&self) -> bool {
        self.points
            .iter()
            .any(|p| p.frac.iter().all(|x| x.abs() < 1e-12))
    }
}

/// Monkhorst-Pack 网格生成器
pub struct MonkhorstPack {
    divisions: [usize; 3],
    shift: [f64; 3],
}

impl MonkhorstPack {
    /// 创建生成器，每轴采样数必须为正
    pub fn new(divisions: [usize; 3]) -> Result<Self> {
        if divisions.iter().any(|&n| n == 0) {
            return Err(EsutilError::InvalidArgument(format!(
                "k-grid divisions must be positive, got {}x{}x{}",
                divisions[0], divisions[1], divisions[2]
            )));
        }
        Ok(MonkhorstPack {
            divisions,
            shift: [0.0; 3],
        })
    }

    /// 设置分数平移（VASP 约定：s_i / n_i 进入分数坐标）
    pub fn with_shift(mut self, shift: [f64; 3]) -> Self {
        self.shift = shift;
        self
    }

    /// 单轴采样分数序列
    fn axis_fractions(&self, axis: usize) -> Vec<f64> {
        let n = self.divisions[axis];
        let s = self.shift[axis];
        (1..=n)
            .map(|r| (2.0 * r as f64 - n as f64 - 1.0) / (2.0 * n as f64) + s / n as f64)
            .collect()
    }

    /// 生成网格，笛卡尔坐标由晶格的倒格矢变换
    pub fn generate(&self, lattice: &Lattice) -> KpointGrid {
        let recip = lattice.reciprocal();
        let fracs: [Vec<f64>; 3] = [
            self.axis_fractions(0),
            self.axis_fractions(1),
            self.axis_fractions(2),
        ];

        let total = self.divisions[0] * self.divisions[1] * self.divisions[2];
        let weight = 1.0 / total as f64;
        let mut points = Vec::with_capacity(total);

        for &u1 in &fracs[0] {
            for &u2 in &fracs[1] {
                for &u3 in &fracs[2] {
                    let frac = [u1, u2, u3];
                    let cart = [
                        u1 * recip[0][0] + u2 * recip[1][0] + u3 * recip[2][0],
                        u1 * recip[0][1] + u2 * recip[1][1] + u3 * recip[2][1],
                        u1 * recip[0][2] + u2 * recip[1][2] + u3 * recip[2][2],
                    ];
                    points.push(Kpoint { frac, cart, weight });
                }
            }
        }

        KpointGrid {
            divisions: self.divisions,
            shift: self.shift,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> Lattice {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    #[test]
    fn test_grid_point_count() {
        let lattice = cubic(4.0);
        for (n1, n2, n3) in [(1, 1, 1), (2, 3, 4), (4, 4, 4), (5, 1, 2)] {
            let grid = MonkhorstPack::new([n1, n2, n3]).unwrap().generate(&lattice);
            assert_eq!(grid.len(), n1 * n2 * n3);
        }
    }

    #[test]
    fn test_odd_unshifted_grid_contains_gamma() {
        let lattice = cubic(4.0);
        let grid = MonkhorstPack::new([3, 5, 7]).unwrap().generate(&lattice);
        assert!(grid.contains_gamma());
    }

    #[test]
    fn test_even_unshifted_grid_avoids_gamma() {
        let lattice = cubic(4.0);
        let grid = MonkhorstPack::new([2, 2, 2]).unwrap().generate(&lattice);
        assert!(!grid.contains_gamma());
    }

    #[test]
    fn test_half_shift_moves_even_grid_to_gamma() {
        let lattice = cubic(4.0);
        let grid = MonkhorstPack::new([2, 2, 2])
            .unwrap()
            .with_shift([0.5, 0.5, 0.5])
            .generate(&lattice);
        assert!(grid.contains_gamma());
    }

    #[test]
    fn test_zero_division_rejected() {
        assert!(MonkhorstPack::new([0, 2, 2]).is_err());
        assert!(MonkhorstPack::new([2, 2, 0]).is_err());
    }

    #[test]
    fn test_fractions_stay_in_first_zone() {
        let lattice = cubic(4.0);
        let grid = MonkhorstPack::new([4, 4, 4]).unwrap().generate(&lattice);
        for p in &grid.points {
            for x in p.frac {
                assert!(x > -0.5 - 1e-12 && x < 0.5 + 1e-12);
            }
        }
    }

    #[test]
    fn test_cartesian_transform_cubic() {
        // 立方晶格 a=4：倒格矢 b = 2π/4；分数 (0.5,0,0) 对应 |k| = π/4
        let lattice = cubic(4.0);
        let grid = MonkhorstPack::new([2, 1, 1]).unwrap().generate(&lattice);
        let p = grid
            .points
            .iter()
            .find(|p| (p.frac[0] - 0.25).abs() < 1e-12)
            .unwrap();
        let expected = 0.25 * 2.0 * std::f64::consts::PI / 4.0;
        assert!((p.cart[0] - expected).abs() < 1e-12);
        assert!(p.cart[1].abs() < 1e-12);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let lattice = cubic(4.0);
        let grid = MonkhorstPack::new([3, 2, 2]).unwrap().generate(&lattice);
        let total: f64 = grid.points.iter().map(|p| p.weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
