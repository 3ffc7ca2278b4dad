//! # GW 计算结果数据模型
//!
//! 存储从 EVALQP.DAT / GW_INFO.OUT 提取的准粒子能谱与带隙信息。
//!
//! ## 依赖关系
//! - 被 `parsers/evalqp.rs`, `parsers/gw_info.rs` 使用
//! - 被 `commands/analyze/gw.rs` 使用

use serde::{Deserialize, Serialize};

/// Hartree -> eV 换算系数
pub const HA_TO_EV: f64 = 27.211396;

/// 本征值集合选择（EVALQP.DAT 的 Kohn-Sham 列或 G0W0 列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EigenvalueSet {
    KohnSham,
    Gw,
}

impl std::fmt::Display for EigenvalueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EigenvalueSet::KohnSham => write!(f, "KS"),
            EigenvalueSet::Gw => write!(f, "G0W0"),
        }
    }
}

/// 单个态的准粒子能量记录（EVALQP.DAT 的一行）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QpEnergy {
    /// 态序号（从 1 开始）
    pub state: usize,
    /// Kohn-Sham 本征值 (Ha)
    pub e_ks: f64,
    /// Hartree-Fock 本征值 (Ha)
    pub e_hf: f64,
    /// G0W0 准粒子能量 (Ha)
    pub e_gw: f64,
    /// 交换自能 (Ha)
    pub sx: f64,
    /// 关联自能实部 (Ha)
    pub re_sc: f64,
    /// 关联自能虚部 (Ha)
    pub im_sc: f64,
    /// 交换关联势 (Ha)
    pub vxc: f64,
    /// E_HF - E_KS (Ha)
    pub de_hf: f64,
    /// E_GW - E_KS (Ha)
    pub de_gw: f64,
    /// 重整化因子
    pub znk: f64,
}

impl QpEnergy {
    pub fn energy(&self, set: EigenvalueSet) -> f64 {
        match set {
            EigenvalueSet::KohnSham => self.e_ks,
            EigenvalueSet::Gw => self.e_gw,
        }
    }
}

/// 单个 k 点的准粒子能谱块
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpointBlock {
    /// k 点序号（从 1 开始）
    pub index: usize,
    /// 分数坐标
    pub coords: [f64; 3],
    /// 权重
    pub weight: f64,
    /// 态记录，按态序号排列
    pub states: Vec<QpEnergy>,
}

/// EVALQP.DAT 的完整能谱
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QpSpectrum {
    pub kpoints: Vec<KpointBlock>,
}

impl QpSpectrum {
    /// 基本带隙 (Ha)：CBM(全局最低空态) - VBM(全局最高占据态)
    ///
    /// `n_val` 为占据态数目；缺少空态或占据态时返回 None
    pub fn fundamental_gap(&self, n_val: usize, set: EigenvalueSet) -> Option<f64> {
        let mut vbm = f64::NEG_INFINITY;
        let mut cbm = f64::INFINITY;

        for kpt in &self.kpoints {
            for state in &kpt.states {
                let e = state.energy(set);
                if state.state <= n_val {
                    vbm = vbm.max(e);
                } else {
                    cbm = cbm.min(e);
                }
            }
        }

        if vbm.is_finite() && cbm.is_finite() {
            Some(cbm - vbm)
        } else {
            None
        }
    }

    /// 直接带隙 (Ha)：同一 k 点内 CBM - VBM 的最小值
    pub fn direct_gap(&self, n_val: usize, set: EigenvalueSet) -> Option<f64> {
        let mut min_gap: Option<f64> = None;

        for kpt in &self.kpoints {
            let mut vbm = f64::NEG_INFINITY;
            let mut cbm = f64::INFINITY;
            for state in &kpt.states {
                let e = state.energy(set);
                if state.state <= n_val {
                    vbm = vbm.max(e);
                } else {
                    cbm = cbm.min(e);
                }
            }
            if vbm.is_finite() && cbm.is_finite() {
                let gap = cbm - vbm;
                min_gap = Some(match min_gap {
                    Some(g) => g.min(gap),
                    None => gap,
                });
            }
        }

        min_gap
    }
}

/// 单个 GW 计算目录的带隙汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GwReport {
    /// 计算标签（通常是目录名）
    pub label: String,

    /// Kohn-Sham 基本带隙 (eV)
    pub ks_gap_ev: Option<f64>,

    /// Kohn-Sham 直接带隙 (eV)
    pub ks_direct_gap_ev: Option<f64>,

    /// G0W0 基本带隙 (eV)
    pub qp_gap_ev: Option<f64>,

    /// G0W0 直接带隙 (eV)
    pub qp_direct_gap_ev: Option<f64>,

    /// 数据来源文件
    pub source_file: Option<String>,
}

impl GwReport {
    pub fn new(label: impl Into<String>) -> Self {
        GwReport {
            label: label.into(),
            ks_gap_ev: None,
            ks_direct_gap_ev: None,
            qp_gap_ev: None,
            qp_direct_gap_ev: None,
            source_file: None,
        }
    }

    /// GW 相对 KS 的带隙修正 (eV)
    pub fn gap_correction_ev(&self) -> Option<f64> {
        match (self.qp_gap_ev, self.ks_gap_ev) {
            (Some(qp), Some(ks)) => Some(qp - ks),
            _ => None,
        }
    }
}
