// crates/kf_physics/src/collision.rs

//! 碰撞算子族
//!
//! 方向 i 在单元 p 的碰撞后总体遵循统一模板：
//!
//! ```text
//! f_next_i(p) = (1 − 1/τ)·f_prev_i(p − c_i) + S_i(F) + (1/τ)·f_eq_i(ρ, u_eq)
//! ```
//!
//! - **BGK**：τ 为固定输入，α = 2（不参与计算）
//! - **熵稳定变体**：τ 逐单元变化。记 f̂_i = f_prev_i(p−c_i) + S_i(F)、
//!   Δ_i = f̂_i − f_eq_i，按策略求熵参数 α，再取 τ = 1/(α·β)，
//!   β = 1/(2τ_in)。四个变体只在 α 的求法上不同，以零尺寸策略
//!   类型单态化；热路径无动态分发。
//!
//! 求解失败的局部恢复：α ← 2（该单元退化为 BGK），并累加
//! 回退计数，绝不致命。

use glam::{DVec3, IVec3};
use kf_config::{ForceConfig, ForcingSchemeVariant};
use kf_foundation::numeric::{ENTROPIC_MAX_ITERATIONS, ENTROPIC_TOLERANCE};
use kf_lattice::{HaloSpace, MemoryLayout, Stencil};
use std::marker::PhantomData;

use crate::entropic::{bisection_newton_raphson, newton_raphson};
use crate::equilibrium::Equilibrium;
use crate::force::BodyForce;
use crate::forcing::ForcingScheme;

/// 支持的最大离散速度个数（D3Q27）
pub const MAX_Q: usize = 27;

/// 小偏差捷径阈值：max_i |Δ_i/f̂_i| 低于此值时直接取 α = 2
const DEVIATION_THRESHOLD: f64 = 1.0e-3;

/// α 搜索下界
const ALPHA_MIN: f64 = 1.0;

/// α_max 的初始值（同时是 α 的全局上界）
const ALPHA_CEILING: f64 = 2.5;

/// 求解失败的回退值（退化为 BGK）
const ALPHA_FALLBACK: f64 = 2.0;

// ============================================================================
// 参数与 trait
// ============================================================================

/// 碰撞算子的构造参数
#[derive(Debug, Clone)]
pub struct CollisionParams {
    /// 输入松弛时间 τ
    pub relaxation_time: f64,
    /// 受力方案
    pub forcing_scheme: ForcingSchemeVariant,
    /// 体积力配置
    pub force: ForceConfig,
}

/// 碰撞算子
///
/// 步进核对每个单元按固定顺序调用：`set_force` →
/// `set_variables` → 对每个方向 `post_collision`。算子携带
/// 逐单元可变状态，按线程克隆使用。
pub trait Collision<L: Stencil, ML: MemoryLayout>: Clone + Send + Sync + 'static {
    /// 变体名称（日志用）
    const NAME: &'static str;

    /// 由参数构造
    fn new(params: &CollisionParams) -> Self;

    /// 每迭代推进一次时间相位
    fn update(&mut self, iteration: u64);

    /// 在全局位置求体积力
    fn set_force(&mut self, p_global: IVec3);

    /// 当前单元的体积力
    fn force(&self) -> DVec3;

    /// 当前单元的流体学速度（写出用）
    fn hydrodynamic_velocity(&self) -> DVec3;

    /// 缓存单元状态；熵稳定变体在此求 α 与逐单元 τ
    fn set_variables(
        &mut self,
        f_prev: &[f64],
        hs: &HaloSpace<L, ML>,
        p: IVec3,
        density: f64,
        velocity: DVec3,
    );

    /// 方向 i 的碰撞后总体；`p` 为已按 −c_i 位移的读取位置
    fn post_collision(&self, f_prev: &[f64], hs: &HaloSpace<L, ML>, p: IVec3, i: usize) -> f64;

    /// 本单元使用的熵参数 α
    fn alpha(&self) -> f64;

    /// 取走并清零累计的 BGK 回退次数
    fn take_fallbacks(&mut self) -> u64;
}

// ============================================================================
// BGK
// ============================================================================

/// 单松弛时间 BGK 算子
#[derive(Debug, Clone)]
pub struct Bgk<L: Stencil> {
    tau: f64,
    force: BodyForce,
    forcing: ForcingScheme,
    equilibrium: Equilibrium<L>,
}

impl<L: Stencil, ML: MemoryLayout> Collision<L, ML> for Bgk<L> {
    const NAME: &'static str = "BGK";

    fn new(params: &CollisionParams) -> Self {
        Self {
            tau: params.relaxation_time,
            force: BodyForce::from_config(&params.force),
            forcing: ForcingScheme::new(params.forcing_scheme, params.relaxation_time),
            equilibrium: Equilibrium::new(),
        }
    }

    #[inline]
    fn update(&mut self, iteration: u64) {
        self.force.update(iteration);
    }

    #[inline]
    fn set_force(&mut self, p_global: IVec3) {
        self.force.set_position(p_global);
    }

    #[inline]
    fn force(&self) -> DVec3 {
        self.force.force()
    }

    #[inline]
    fn hydrodynamic_velocity(&self) -> DVec3 {
        self.forcing.hydrodynamic_velocity(self.force.force())
    }

    #[inline]
    fn set_variables(
        &mut self,
        _f_prev: &[f64],
        _hs: &HaloSpace<L, ML>,
        _p: IVec3,
        density: f64,
        velocity: DVec3,
    ) {
        self.forcing.set_variables(self.force.force(), density, velocity);
        self.equilibrium
            .set_variables(density, self.forcing.equilibrium_velocity(self.force.force()));
    }

    #[inline]
    fn post_collision(&self, f_prev: &[f64], hs: &HaloSpace<L, ML>, p: IVec3, i: usize) -> f64 {
        (1.0 - 1.0 / self.tau) * f_prev[hs.index_pop(p, i)]
            + self.forcing.collision_source::<L>(self.force.force(), i)
            + 1.0 / self.tau * self.equilibrium.calculate(i)
    }

    #[inline]
    fn alpha(&self) -> f64 {
        ALPHA_FALLBACK
    }

    #[inline]
    fn take_fallbacks(&mut self) -> u64 {
        0
    }
}

// ============================================================================
// α 求解策略
// ============================================================================

/// 熵参数 α 的求解策略（零尺寸类型，静态分发）
pub trait AlphaStrategy: Copy + Clone + Send + Sync + 'static {
    /// 策略名称
    const NAME: &'static str;

    /// 求本单元的 α；不收敛时回退 2 并累加计数
    fn calculate_alpha(
        f_forced: &[f64],
        f_noneq: &[f64],
        weights: &[f64],
        prev_alpha: f64,
        fallbacks: &mut u64,
    ) -> f64;
}

/// max_i |Δ_i / f̂_i|
#[inline]
fn max_relative_deviation(f_forced: &[f64], f_noneq: &[f64]) -> f64 {
    let mut max = 0.0_f64;
    for (&fh, &dn) in f_forced.iter().zip(f_noneq) {
        max = max.max((dn / fh).abs());
    }
    max
}

/// α_max = min_{Δ_i > 0} |f̂_i / Δ_i|，初始 2.5
#[inline]
fn calculate_alpha_max(f_forced: &[f64], f_noneq: &[f64]) -> f64 {
    let mut alpha_max = ALPHA_CEILING;
    for (&fh, &dn) in f_forced.iter().zip(f_noneq) {
        if dn > 0.0 {
            let candidate = (fh / dn).abs();
            if candidate < alpha_max {
                alpha_max = candidate;
            }
        }
    }
    alpha_max
}

#[inline]
fn solve_or_fallback(result: Option<f64>, fallbacks: &mut u64) -> f64 {
    match result {
        Some(alpha) => alpha,
        None => {
            *fallbacks += 1;
            ALPHA_FALLBACK
        }
    }
}

/// 标准 ELBM：小偏差捷径 → α_max 分支 → Newton–Raphson
#[derive(Debug, Clone, Copy)]
pub struct StandardAlpha;

impl AlphaStrategy for StandardAlpha {
    const NAME: &'static str = "ELBM";

    #[inline]
    fn calculate_alpha(
        f_forced: &[f64],
        f_noneq: &[f64],
        weights: &[f64],
        prev_alpha: f64,
        fallbacks: &mut u64,
    ) -> f64 {
        if max_relative_deviation(f_forced, f_noneq) < DEVIATION_THRESHOLD {
            return ALPHA_FALLBACK;
        }
        let alpha_max = calculate_alpha_max(f_forced, f_noneq);
        if alpha_max < 2.0 {
            0.95 * alpha_max
        } else {
            solve_or_fallback(
                newton_raphson(
                    f_forced,
                    f_noneq,
                    weights,
                    prev_alpha,
                    ALPHA_MIN,
                    alpha_max,
                    ENTROPIC_TOLERANCE,
                    ENTROPIC_MAX_ITERATIONS,
                ),
                fallbacks,
            )
        }
    }
}

/// 近似 ELBM：小偏差时用四阶闭式级数近似 α，其余同标准变体
#[derive(Debug, Clone, Copy)]
pub struct SeriesAlpha;

impl SeriesAlpha {
    /// α 的四阶级数近似
    #[inline]
    fn approximate_alpha(f_forced: &[f64], f_noneq: &[f64], fallbacks: &mut u64) -> f64 {
        let mut a1 = 0.0;
        let mut a2 = 0.0;
        let mut a3 = 0.0;
        let mut a4 = 0.0;
        for (&fh, &dn) in f_forced.iter().zip(f_noneq) {
            let t = dn / fh;
            a1 += dn * t;
            a2 += dn * t * t;
            a3 += dn * t * t * t;
            a4 += dn * t * t * t * t;
        }
        a1 *= 1.0 / 2.0;
        a2 *= 1.0 / 6.0;
        a3 *= 1.0 / 12.0;
        a4 *= 1.0 / 20.0;

        if a1.abs() < f64::MIN_POSITIVE {
            return ALPHA_FALLBACK;
        }

        let alpha = 2.0
            - 1.0 / a1
                * (4.0 * a2 + 16.0 * a2 * a2 / a1 - 8.0 * a3 + 80.0 * a2 * a3 / a1
                    - 80.0 * a2 * a2 * a2 / (a1 * a1)
                    - 16.0 * a4);

        if alpha.is_finite() && (ALPHA_MIN..=ALPHA_CEILING).contains(&alpha) {
            alpha
        } else {
            *fallbacks += 1;
            ALPHA_FALLBACK
        }
    }
}

impl AlphaStrategy for SeriesAlpha {
    const NAME: &'static str = "Approached-ELBM";

    #[inline]
    fn calculate_alpha(
        f_forced: &[f64],
        f_noneq: &[f64],
        weights: &[f64],
        prev_alpha: f64,
        fallbacks: &mut u64,
    ) -> f64 {
        if max_relative_deviation(f_forced, f_noneq) < DEVIATION_THRESHOLD {
            return Self::approximate_alpha(f_forced, f_noneq, fallbacks);
        }
        let alpha_max = calculate_alpha_max(f_forced, f_noneq);
        if alpha_max < 2.0 {
            0.95 * alpha_max
        } else {
            solve_or_fallback(
                newton_raphson(
                    f_forced,
                    f_noneq,
                    weights,
                    prev_alpha,
                    ALPHA_MIN,
                    alpha_max,
                    ENTROPIC_TOLERANCE,
                    ENTROPIC_MAX_ITERATIONS,
                ),
                fallbacks,
            )
        }
    }
}

/// 强制 NR：跳过小偏差捷径，始终走 α_max 分支与 Newton–Raphson
#[derive(Debug, Clone, Copy)]
pub struct ForcedNrAlpha;

impl AlphaStrategy for ForcedNrAlpha {
    const NAME: &'static str = "ForcedNR-ELBM";

    #[inline]
    fn calculate_alpha(
        f_forced: &[f64],
        f_noneq: &[f64],
        weights: &[f64],
        prev_alpha: f64,
        fallbacks: &mut u64,
    ) -> f64 {
        let alpha_max = calculate_alpha_max(f_forced, f_noneq);
        if alpha_max < 2.0 {
            0.95 * alpha_max
        } else {
            solve_or_fallback(
                newton_raphson(
                    f_forced,
                    f_noneq,
                    weights,
                    prev_alpha,
                    ALPHA_MIN,
                    alpha_max,
                    ENTROPIC_TOLERANCE,
                    ENTROPIC_MAX_ITERATIONS,
                ),
                fallbacks,
            )
        }
    }
}

/// 强制 BNR：同 ForcedNR，但用区间 Newton / 二分混合求解
#[derive(Debug, Clone, Copy)]
pub struct ForcedBnrAlpha;

impl AlphaStrategy for ForcedBnrAlpha {
    const NAME: &'static str = "ForcedBNR-ELBM";

    #[inline]
    fn calculate_alpha(
        f_forced: &[f64],
        f_noneq: &[f64],
        weights: &[f64],
        prev_alpha: f64,
        fallbacks: &mut u64,
    ) -> f64 {
        let alpha_max = calculate_alpha_max(f_forced, f_noneq);
        if alpha_max < 2.0 {
            0.95 * alpha_max
        } else {
            solve_or_fallback(
                bisection_newton_raphson(
                    f_forced,
                    f_noneq,
                    weights,
                    prev_alpha,
                    ALPHA_MIN,
                    alpha_max,
                    ENTROPIC_TOLERANCE,
                    ENTROPIC_MAX_ITERATIONS,
                ),
                fallbacks,
            )
        }
    }
}

// ============================================================================
// 熵稳定算子
// ============================================================================

/// 熵稳定碰撞算子，α 求法由策略 `S` 决定
#[derive(Debug, Clone)]
pub struct Entropic<L: Stencil, S: AlphaStrategy> {
    tau: f64,
    beta: f64,
    alpha: f64,
    force: BodyForce,
    forcing: ForcingScheme,
    equilibrium: Equilibrium<L>,
    f_forced: [f64; MAX_Q],
    f_noneq: [f64; MAX_Q],
    fallbacks: u64,
    _marker: PhantomData<S>,
}

/// 标准熵稳定 LBM
pub type Elbm<L> = Entropic<L, StandardAlpha>;
/// 级数近似熵稳定 LBM
pub type ApproachedElbm<L> = Entropic<L, SeriesAlpha>;
/// 强制 Newton–Raphson 熵稳定 LBM
pub type ForcedNrElbm<L> = Entropic<L, ForcedNrAlpha>;
/// 强制区间 Newton–Raphson 熵稳定 LBM
pub type ForcedBnrElbm<L> = Entropic<L, ForcedBnrAlpha>;

impl<L: Stencil, S: AlphaStrategy, ML: MemoryLayout> Collision<L, ML> for Entropic<L, S> {
    const NAME: &'static str = S::NAME;

    fn new(params: &CollisionParams) -> Self {
        Self {
            tau: params.relaxation_time,
            beta: 1.0 / (2.0 * params.relaxation_time),
            alpha: ALPHA_FALLBACK,
            force: BodyForce::from_config(&params.force),
            forcing: ForcingScheme::new(params.forcing_scheme, params.relaxation_time),
            equilibrium: Equilibrium::new(),
            f_forced: [0.0; MAX_Q],
            f_noneq: [0.0; MAX_Q],
            fallbacks: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn update(&mut self, iteration: u64) {
        self.force.update(iteration);
    }

    #[inline]
    fn set_force(&mut self, p_global: IVec3) {
        self.force.set_position(p_global);
    }

    #[inline]
    fn force(&self) -> DVec3 {
        self.force.force()
    }

    #[inline]
    fn hydrodynamic_velocity(&self) -> DVec3 {
        self.forcing.hydrodynamic_velocity(self.force.force())
    }

    #[inline]
    fn set_variables(
        &mut self,
        f_prev: &[f64],
        hs: &HaloSpace<L, ML>,
        p: IVec3,
        density: f64,
        velocity: DVec3,
    ) {
        let force = self.force.force();
        self.forcing.set_variables(force, density, velocity);
        self.equilibrium
            .set_variables(density, self.forcing.equilibrium_velocity(force));

        // f̂ 与 Δ：拉取聚合加源项
        for i in 0..L::Q {
            let f_pulled = f_prev[hs.index_pop(p - L::celerity(i), i)];
            let forced = f_pulled + self.forcing.collision_source::<L>(force, i);
            self.f_forced[i] = forced;
            self.f_noneq[i] = forced - self.equilibrium.calculate(i);
        }

        self.alpha = S::calculate_alpha(
            &self.f_forced[..L::Q],
            &self.f_noneq[..L::Q],
            L::WEIGHT,
            self.alpha,
            &mut self.fallbacks,
        );
        self.tau = 1.0 / (self.alpha * self.beta);
    }

    #[inline]
    fn post_collision(&self, f_prev: &[f64], hs: &HaloSpace<L, ML>, p: IVec3, i: usize) -> f64 {
        (1.0 - 1.0 / self.tau) * f_prev[hs.index_pop(p, i)]
            + self.forcing.collision_source::<L>(self.force.force(), i)
            + 1.0 / self.tau * self.equilibrium.calculate(i)
    }

    #[inline]
    fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    fn take_fallbacks(&mut self) -> u64 {
        std::mem::take(&mut self.fallbacks)
    }
}

// ============================================================================
// 测试
// ============================================================================
