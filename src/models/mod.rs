//! # 数据模型模块
//!
//! 定义跨模块共享的值类型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `kspace/`, `commands/` 使用
//! - 无外部模块依赖

pub mod gw;
pub mod structure;

pub use gw::{EigenvalueSet, GwReport, KpointBlock, QpEnergy, QpSpectrum, HA_TO_EV};
pub use structure::{Atom, CoordKind, Lattice, Structure};
