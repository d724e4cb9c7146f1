// crates/kf_config/src/lib.rs

//! KineticFlow Configuration Layer
//!
//! 运行时模拟配置：全部旋钮在启动时读取一次并冻结。变体选择
//! 每次运行只分派一次，热路径仍然单态化（见 kf_runtime::builder）。
//!
//! # 模块概览
//!
//! - [`variants`]: 模板 / 布局 / 碰撞 / 力 等变体枚举
//! - [`simulation_config`]: [`SimulationConfig`] 及其校验
//! - [`error`]: 配置错误类型

#![warn(clippy::all)]

pub mod error;
pub mod simulation_config;
pub mod variants;

pub use error::ConfigError;
pub use simulation_config::{
    ForceConfig, InitialDensityConfig, InitialVelocityConfig, OutputConfig, SimulationConfig,
};
pub use variants::{
    BoundaryVariant, CollisionVariant, ForceVariant, ForcingSchemeVariant, InitDensityVariant,
    InitVelocityVariant, LayoutVariant, OutputFormat, StencilVariant,
};
