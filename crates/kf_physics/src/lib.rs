// crates/kf_physics/src/lib.rs

//! KineticFlow Physics Layer
//!
//! 逐单元物理核心：平衡态分布、矩计算、体积力与受力方案、
//! 碰撞算子族（BGK 与四个熵稳定变体）、周期边界与初始条件。
//!
//! # 模块概览
//!
//! - [`equilibrium`]: 二阶不可压平衡态 f_eq(ρ, u)
//! - [`moment`]: 密度 / 速度 / 熵矩（拉取流动聚合）
//! - [`force`]: 体积力变体（常数 / 正弦 / Kolmogorov）
//! - [`forcing`]: 受力方案（Guo / Shan–Chen / 精确差分）
//! - [`entropic`]: 熵平衡残差与根查找器
//! - [`collision`]: 碰撞算子族，按模板与策略单态化
//! - [`boundary`]: 未分解轴上的周期 halo 拷贝
//! - [`init`]: 闭式初始条件
//!
//! 全部热路径为纯值计算，无分配、无动态分发。

#![warn(clippy::all)]

pub mod boundary;
pub mod collision;
pub mod entropic;
pub mod equilibrium;
pub mod force;
pub mod forcing;
pub mod init;
pub mod moment;

pub use collision::{
    ApproachedElbm, Bgk, Collision, CollisionParams, Elbm, ForcedBnrElbm, ForcedNrElbm, MAX_Q,
};
pub use equilibrium::Equilibrium;
pub use moment::Moment;
