// crates/kf_physics/src/moment.rs

//! 矩计算
//!
//! 密度与速度矩按拉取流动聚合：方向 i 的贡献读自上一步
//! 缓冲区的 `p − c_i` 位置。熵矩 H = Σ f ln(f/w) 供诊断使用。

use glam::DVec3;
use kf_lattice::{HaloSpace, MemoryLayout, Stencil};
use std::marker::PhantomData;

/// 矩求值器（缓存单元矩）
#[derive(Debug, Clone)]
pub struct Moment<L: Stencil> {
    density: f64,
    velocity: DVec3,
    _marker: PhantomData<L>,
}

impl<L: Stencil> Moment<L> {
    /// 创建零状态求值器
    pub fn new() -> Self {
        Self {
            density: 0.0,
            velocity: DVec3::ZERO,
            _marker: PhantomData,
        }
    }

    /// 以拉取模板聚合单元 p 的密度与速度
    #[inline]
    pub fn calculate_moments<ML: MemoryLayout>(
        &mut self,
        f: &[f64],
        hs: &HaloSpace<L, ML>,
        p: glam::IVec3,
    ) {
        let mut density = 0.0;
        let mut momentum = DVec3::ZERO;
        for i in 0..L::Q {
            let fi = f[hs.index_pop(p - L::celerity(i), i)];
            density += fi;
            momentum += L::celerity_d(i) * fi;
        }
        self.density = density;
        self.velocity = momentum / density;
    }

    /// 上次聚合的密度
    #[inline]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// 上次聚合的速度
    #[inline]
    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    /// 单元 p 的离散熵 H = Σ f ln(f/w)
    pub fn calculate_entropy<ML: MemoryLayout>(
        f: &[f64],
        hs: &HaloSpace<L, ML>,
        p: glam::IVec3,
    ) -> f64 {
        let mut entropy = 0.0;
        for i in 0..L::Q {
            let fi = f[hs.index_pop(p - L::celerity(i), i)];
            if fi > 0.0 {
                entropy += fi * (fi / L::weight(i)).ln();
            }
        }
        entropy
    }
}

impl<L: Stencil> Default for Moment<L> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 测试
// ============================================================================
