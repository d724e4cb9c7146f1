// crates/kf_physics/src/equilibrium.rs

//! 平衡态分布
//!
//! 马赫数二阶截断的不可压平衡态：
//!
//! ```text
//! f_eq_i = w_i · ρ · (1 + c_i·u/cs² + (c_i·u)²/(2cs⁴) − u²/(2cs²))
//! ```
//!
//! 状态（ρ, u, u²）在每个单元缓存一次，随后按方向求值。

use glam::DVec3;
use kf_lattice::Stencil;
use std::marker::PhantomData;

/// 平衡态求值器（缓存单元状态）
#[derive(Debug, Clone)]
pub struct Equilibrium<L: Stencil> {
    density: f64,
    velocity: DVec3,
    velocity2: f64,
    _marker: PhantomData<L>,
}

impl<L: Stencil> Equilibrium<L> {
    /// 创建零状态求值器
    pub fn new() -> Self {
        Self {
            density: 0.0,
            velocity: DVec3::ZERO,
            velocity2: 0.0,
            _marker: PhantomData,
        }
    }

    /// 缓存单元状态
    #[inline]
    pub fn set_variables(&mut self, density: f64, velocity: DVec3) {
        self.density = density;
        self.velocity = velocity;
        self.velocity2 = velocity.length_squared();
    }

    /// 求第 i 个方向的平衡态
    #[inline]
    pub fn calculate(&self, i: usize) -> f64 {
        compute::<L>(self.density, self.velocity, self.velocity2, i)
    }
}

impl<L: Stencil> Default for Equilibrium<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// 平衡态的无状态求值（初始化与受力方案使用）
#[inline]
pub fn compute<L: Stencil>(density: f64, velocity: DVec3, velocity2: f64, i: usize) -> f64 {
    let cu = L::celerity_d(i).dot(velocity);
    L::weight(i)
        * density
        * (1.0 + L::INV_CS2 * cu + 0.5 * L::INV_CS2 * L::INV_CS2 * cu * cu
            - 0.5 * L::INV_CS2 * velocity2)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kf_lattice::{D2Q9, D3Q27};

    #[test]
    fn test_rest_state_reduces_to_weights() {
        let mut eq = Equilibrium::<D2Q9>::new();
        eq.set_variables(1.0, DVec3::ZERO);
        for i in 0..D2Q9::Q {
            assert!((eq.calculate(i) - D2Q9::weight(i)).abs() < 1e-16);
        }
    }

    #[test]
    fn test_moments_of_equilibrium() {
        // Σ f_eq = ρ，Σ c f_eq = ρu（二阶截断下精确成立）
        let rho = 1.1;
        let u = DVec3::new(0.03, -0.02, 0.01);
        let mut eq = Equilibrium::<D3Q27>::new();
        eq.set_variables(rho, u);

        let mut mass = 0.0;
        let mut momentum = DVec3::ZERO;
        for i in 0..D3Q27::Q {
            let f = eq.calculate(i);
            mass += f;
            momentum += D3Q27::celerity_d(i) * f;
        }
        assert!((mass - rho).abs() < 1e-14);
        assert!((momentum - rho * u).length() < 1e-14);
    }

    #[test]
    fn test_stateless_matches_cached() {
        let rho = 0.97;
        let u = DVec3::new(0.05, 0.01, 0.0);
        let mut eq = Equilibrium::<D2Q9>::new();
        eq.set_variables(rho, u);
        for i in 0..D2Q9::Q {
            assert_eq!(eq.calculate(i), compute::<D2Q9>(rho, u, u.length_squared(), i));
        }
    }
}
