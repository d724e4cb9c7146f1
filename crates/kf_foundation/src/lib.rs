// crates/kf_foundation/src/lib.rs

//! KineticFlow Foundation Layer
//!
//! 最底层基础 crate，为整个项目提供基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一基础错误类型
//! - [`memory`]: 对齐缓冲区与并行写入视图
//! - [`numeric`]: 数值常量与浮点比较工具
//! - [`counter`]: 原子计数器
//!
//! # 设计原则
//!
//! 1. **零领域概念**: 不包含格子、碰撞、通信等高层概念
//! 2. **零开销抽象**: release 模式下最小化运行时开销
//! 3. **最小依赖**: 仅依赖 bytemuck 与 rayon

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod counter;
pub mod error;
pub mod memory;
pub mod numeric;

pub use counter::Counter;
pub use error::{KfError, KfResult};
pub use memory::{AlignedVec, SharedSlice};
