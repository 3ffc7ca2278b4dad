//! # 原子结构数据模型
//!
//! 定义统一的原子结构表示（分子或晶体），可以从不同格式解析并转换为不同格式。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/convert.rs` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 坐标系类型（记录来源文件的坐标约定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordKind {
    /// 笛卡尔坐标 (Å)
    Cartesian,
    /// 晶格分数坐标
    Fractional,
}

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let alpha_rad = alpha.to_radians();
        let beta_rad = beta.to_radians();
        let gamma_rad = gamma.to_radians();

        let cos_alpha = alpha_rad.cos();
        let cos_beta = beta_rad.cos();
        let cos_gamma = gamma_rad.cos();
        let sin_gamma = gamma_rad.sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();
        let c_vec = [c1, c2, c3];

        Lattice {
            matrix: [a_vec, b_vec, c_vec],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let a_vec = self.matrix[0];
        let b_vec = self.matrix[1];
        let c_vec = self.matrix[2];

        let a = norm(a_vec);
        let b = norm(b_vec);
        let c = norm(c_vec);

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（有符号行列式）
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];
        dot(a, cross(b, c))
    }

    /// 倒格矢矩阵，行向量表示 b1, b2, b3
    ///
    /// 满足 a_i · b_j = 2π δ_ij
    pub fn reciprocal(&self) -> [[f64; 3]; 3] {
        let a1 = self.matrix[0];
        let a2 = self.matrix[1];
        let a3 = self.matrix[2];
        let vol = self.volume();

        let two_pi = 2.0 * std::f64::consts::PI;
        let b1 = scale(cross(a2, a3), two_pi / vol);
        let b2 = scale(cross(a3, a1), two_pi / vol);
        let b3 = scale(cross(a1, a2), two_pi / vol);

        [b1, b2, b3]
    }

    /// 笛卡尔坐标转分数坐标
    ///
    /// 奇异晶格直接返回输入坐标
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        let det = self.volume();

        if det.abs() < 1e-10 {
            return cart;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        // 行向量约定：frac = cart · M⁻¹
        [
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ]
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// 原子信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub species: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(species: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            species: species.into(),
            position,
        }
    }
}

/// 原子结构（分子或周期性晶体）
///
/// 原子坐标统一以笛卡尔坐标存储，分数坐标只在格式边界上出现。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    /// 结构名称
    pub name: String,

    /// 晶格（分子结构为 None）
    pub lattice: Option<Lattice>,

    /// 原子列表
    pub atoms: Vec<Atom>,

    /// 来源文件格式
    pub source_format: Option<String>,
}

impl Structure {
    pub fn new(name: impl Into<String>, lattice: Option<Lattice>, atoms: Vec<Atom>) -> Self {
        Structure {
            name: name.into(),
            lattice,
            atoms,
            source_format: None,
        }
    }

    /// 是否为周期性结构
    pub fn is_periodic(&self) -> bool {
        self.lattice.is_some()
    }

    /// 按出现顺序去重的元素列表
    pub fn species_list(&self) -> Vec<String> {
        let mut species: Vec<String> = Vec::new();
        for atom in &self.atoms {
            if !species.contains(&atom.species) {
                species.push(atom.species.clone());
            }
        }
        species
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.species.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 所有原子的分数坐标（无晶格时返回 None）
    pub fn fractional_positions(&self) -> Option<Vec<[f64; 3]>> {
        let lattice = self.lattice.as_ref()?;
        Some(
            self.atoms
                .iter()
                .map(|a| lattice.cart_to_frac(a.position))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_from_parameters_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let vol = lattice.volume().abs();

        // 5^3 = 125
        assert!((vol - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_hexagonal_parameters() {
        let lattice = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0);
        let (a, b, c, _, _, gamma) = lattice.parameters();

        assert!((a - 3.0).abs() < 0.01);
        assert!((b - 3.0).abs() < 0.01);
        assert!((c - 5.0).abs() < 0.01);
        assert!((gamma - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_reciprocal_orthogonality() {
        // a_i · b_j = 2π δ_ij，取一个非正交晶格验证
        let lattice = Lattice::from_parameters(3.1, 4.2, 5.3, 80.0, 95.0, 110.0);
        let recip = lattice.reciprocal();
        let two_pi = 2.0 * std::f64::consts::PI;

        for i in 0..3 {
            for j in 0..3 {
                let d = dot(lattice.matrix[i], recip[j]);
                let expected = if i == j { two_pi } else { 0.0 };
                assert!(
                    (d - expected).abs() < 1e-9,
                    "a_{} . b_{} = {}, expected {}",
                    i,
                    j,
                    d,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_cart_frac_round_trip() {
        let lattice = Lattice::from_parameters(4.0, 5.0, 6.0, 85.0, 92.0, 105.0);
        let cart = [1.234, -0.567, 2.891];

        let frac = lattice.cart_to_frac(cart);
        let back = lattice.frac_to_cart(frac);

        for i in 0..3 {
            assert!((back[i] - cart[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cart_to_frac_singular_lattice() {
        // 两行线性相关，行列式为零，坐标原样返回
        let lattice = Lattice::from_vectors([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let cart = [0.3, 0.4, 0.5];
        assert_eq!(lattice.cart_to_frac(cart), cart);
    }

    #[test]
    fn test_structure_formula() {
        let atoms = vec![
            Atom::new("Zr", [0.0, 0.0, 0.0]),
            Atom::new("O", [1.1, 0.0, 0.0]),
            Atom::new("O", [0.0, 1.1, 0.0]),
        ];
        let structure = Structure::new("ZrO2", None, atoms);

        assert_eq!(structure.formula(), "O2Zr");
        assert!(!structure.is_periodic());
    }

    #[test]
    fn test_species_list_preserves_order() {
        let atoms = vec![
            Atom::new("O", [0.0, 0.0, 0.0]),
            Atom::new("Zr", [1.0, 0.0, 0.0]),
            Atom::new("O", [2.0, 0.0, 0.0]),
        ];
        let structure = Structure::new("test", None, atoms);

        assert_eq!(structure.species_list(), vec!["O", "Zr"]);
    }

    #[test]
    fn test_fractional_positions() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let atoms = vec![Atom::new("Si", [2.0, 1.0, 3.0])];
        let structure = Structure::new("Si", Some(lattice), atoms);

        let frac = structure.fractional_positions().unwrap();
        assert!((frac[0][0] - 0.5).abs() < 1e-12);
        assert!((frac[0][1] - 0.25).abs() < 1e-12);
        assert!((frac[0][2] - 0.75).abs() < 1e-12);
    }
}
