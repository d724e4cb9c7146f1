// crates/kf_physics/src/force.rs

//! 体积力变体
//!
//! 力在单元的**全局**位置求值（本地位置加 rank 偏移），
//! 因此多进程运行与单进程运行施加的力逐单元一致。
//!
//! `update(iteration)` 是步进核每迭代调用一次的钩子；库存变体
//! 均与时间无关，钩子留空。

use glam::{DVec3, IVec3};
use kf_config::{ForceConfig, ForceVariant};
use std::f64::consts::TAU;

/// 体积力求值器（缓存当前单元的力）
#[derive(Debug, Clone)]
pub struct BodyForce {
    variant: ForceVariant,
    amplitude: DVec3,
    wave_length: DVec3,
    force: DVec3,
}

impl BodyForce {
    /// 由配置创建
    pub fn from_config(config: &ForceConfig) -> Self {
        Self {
            variant: config.variant,
            amplitude: DVec3::from_array(config.amplitude),
            wave_length: DVec3::from_array(config.wave_length),
            force: DVec3::ZERO,
        }
    }

    /// 每迭代推进一次相位（库存变体与时间无关）
    #[inline]
    pub fn update(&mut self, _iteration: u64) {}

    /// 在全局位置求值并缓存
    #[inline]
    pub fn set_position(&mut self, p_global: IVec3) {
        self.force = match self.variant {
            ForceVariant::None => DVec3::ZERO,
            ForceVariant::Constant => self.amplitude,
            ForceVariant::Sinusoidal => {
                let p = p_global.as_dvec3();
                DVec3::new(
                    self.amplitude.x * (TAU * p.x / self.wave_length.x).sin(),
                    self.amplitude.y * (TAU * p.y / self.wave_length.y).sin(),
                    self.amplitude.z * (TAU * p.z / self.wave_length.z).sin(),
                )
            }
            ForceVariant::Kolmogorov => DVec3::new(
                self.amplitude.x * (TAU * p_global.y as f64 / self.wave_length.y).sin(),
                0.0,
                0.0,
            ),
        };
    }

    /// 当前单元的力
    #[inline]
    pub fn force(&self) -> DVec3 {
        self.force
    }

    /// 是否恒为零（零力时步进核可跳过受力项）
    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self.variant, ForceVariant::None)
            || (self.amplitude == DVec3::ZERO
                && matches!(
                    self.variant,
                    ForceVariant::Constant | ForceVariant::Sinusoidal | ForceVariant::Kolmogorov
                ))
    }
}

// ============================================================================
// 测试
// ============================================================================
