// crates/kf_runtime/src/lib.rs

//! KineticFlow Runtime Layer
//!
//! 把物理核、通信与 IO 组装成完整的迭代协议：
//!
//! - [`distribution`]: 指针交换式双缓冲与本地打包
//! - [`fields`]: 逐单元场（ρ, u, F, α）的 SoA 存储
//! - [`algorithm`]: 单步编排（交换 → 边界 → 并行逐单元计算）
//! - [`routine`]: 外层循环、质量核算与汇总
//! - [`builder`]: 配置 → 单态化核心的一次性分派
//! - [`metrics`]: 分相计时与 MLUPS
//!
//! # 架构层级
//!
//! 本层之上（CLI）零泛型：通过 [`builder::SimulationBuilder`] 获得
//! `Box<dyn DynSimulation>`。模板、内存布局与碰撞变体在此处一次
//! 分派后全程单态化。

#![warn(clippy::all)]

pub mod algorithm;
pub mod builder;
pub mod distribution;
pub mod error;
pub mod fields;
pub mod metrics;
pub mod routine;

pub use algorithm::StepKernel;
pub use builder::{DynSimulation, SimulationBuilder};
pub use distribution::Distribution;
pub use error::{RuntimeError, RuntimeResult};
pub use fields::LocalFields;
pub use metrics::{RunMetrics, StepTimings};
pub use routine::{Routine, RunSummary};
