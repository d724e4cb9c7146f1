// crates/kf_lattice/src/lib.rs

//! KineticFlow Lattice Layer
//!
//! 提供 DdQq 速度模板的编译期常量表，以及分布函数与逐单元场
//! 所在的四类索引空间（全局 / 本地 / halo / X 缓冲）。
//!
//! # 模块概览
//!
//! - [`stencil`]: `Stencil` trait 与 D1Q3 / D2Q9 / D3Q19 / D3Q27 实现
//! - [`domain`]: 索引空间与 AoS / SoA 内存布局
//!
//! # 设计原则
//!
//! 模板与内存布局以零尺寸类型 + trait 常量表达，热路径上的索引
//! 运算全部单态化，无动态分发。

#![warn(clippy::all)]

pub mod domain;
pub mod stencil;

pub use domain::{Aos, BufferXSpace, GlobalSpace, HaloSpace, LocalSpace, MemoryLayout, Soa};
pub use stencil::{Stencil, D1Q3, D2Q9, D3Q19, D3Q27};
