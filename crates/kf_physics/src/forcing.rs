// crates/kf_physics/src/forcing.rs

//! 受力方案
//!
//! 把体积力 F 耦合进碰撞的三种方式：
//!
//! | 变体 | 平衡速度 u_eq | 流体速度 u_hyd | 源项 S_i |
//! |---|---|---|---|
//! | Guo | u + F/(2ρ) | u + F/(2ρ) | (1 − 1/(2τ)) w_i cs⁻² ((c−u) + cs⁻²(c·u)c)·F |
//! | Shan–Chen | u + τF/ρ | u + F/(2ρ) | 0 |
//! | 精确差分 | u | u + F/(2ρ) | f_eq(ρ, u+F/ρ) − f_eq(ρ, u) |
//!
//! `set_variables` 缓存 ρ、u、u²；其后 `collision_source` 对缓存
//! 状态是纯函数。

use glam::DVec3;
use kf_config::ForcingSchemeVariant;
use kf_lattice::Stencil;

use crate::equilibrium;

/// 受力方案求值器（缓存单元状态）
#[derive(Debug, Clone)]
pub struct ForcingScheme {
    scheme: ForcingSchemeVariant,
    tau: f64,
    density: f64,
    velocity: DVec3,
    velocity2: f64,
    /// 精确差分法的移位速度 u + F/ρ
    shifted_velocity: DVec3,
    shifted_velocity2: f64,
}

impl ForcingScheme {
    /// 创建求值器
    pub fn new(scheme: ForcingSchemeVariant, tau: f64) -> Self {
        Self {
            scheme,
            tau,
            density: 0.0,
            velocity: DVec3::ZERO,
            velocity2: 0.0,
            shifted_velocity: DVec3::ZERO,
            shifted_velocity2: 0.0,
        }
    }

    /// 缓存单元状态
    #[inline]
    pub fn set_variables(&mut self, force: DVec3, density: f64, velocity: DVec3) {
        self.density = density;
        self.velocity = velocity;
        self.velocity2 = velocity.length_squared();
        if self.scheme == ForcingSchemeVariant::ExactDifferenceMethod {
            self.shifted_velocity = velocity + force / density;
            self.shifted_velocity2 = self.shifted_velocity.length_squared();
        }
    }

    /// 进入平衡态的速度 u_eq
    #[inline]
    pub fn equilibrium_velocity(&self, force: DVec3) -> DVec3 {
        match self.scheme {
            ForcingSchemeVariant::Guo => self.velocity + 0.5 / self.density * force,
            ForcingSchemeVariant::ShanChen => self.velocity + self.tau / self.density * force,
            ForcingSchemeVariant::ExactDifferenceMethod => self.velocity,
        }
    }

    /// 流体学速度 u_hyd = u + F/(2ρ)（所有变体一致，写出用）
    #[inline]
    pub fn hydrodynamic_velocity(&self, force: DVec3) -> DVec3 {
        self.velocity + 0.5 / self.density * force
    }

    /// 方向 i 的碰撞源项 S_i
    #[inline]
    pub fn collision_source<L: Stencil>(&self, force: DVec3, i: usize) -> f64 {
        match self.scheme {
            ForcingSchemeVariant::Guo => {
                let c = L::celerity_d(i);
                let cu = c.dot(self.velocity);
                let coupling = (c - self.velocity + L::INV_CS2 * cu * c).dot(force);
                (1.0 - 0.5 / self.tau) * L::weight(i) * L::INV_CS2 * coupling
            }
            ForcingSchemeVariant::ShanChen => 0.0,
            ForcingSchemeVariant::ExactDifferenceMethod => {
                equilibrium::compute::<L>(
                    self.density,
                    self.shifted_velocity,
                    self.shifted_velocity2,
                    i,
                ) - equilibrium::compute::<L>(self.density, self.velocity, self.velocity2, i)
            }
        }
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kf_lattice::D2Q9;

    fn schemes() -> [ForcingSchemeVariant; 3] {
        [
            ForcingSchemeVariant::Guo,
            ForcingSchemeVariant::ShanChen,
            ForcingSchemeVariant::ExactDifferenceMethod,
        ]
    }

    #[test]
    fn test_zero_force_is_neutral() {
        for scheme in schemes() {
            let mut fs = ForcingScheme::new(scheme, 0.6);
            let u = DVec3::new(0.02, 0.01, 0.0);
            fs.set_variables(DVec3::ZERO, 1.0, u);
            assert_eq!(fs.equilibrium_velocity(DVec3::ZERO), u);
            assert_eq!(fs.hydrodynamic_velocity(DVec3::ZERO), u);
            for i in 0..D2Q9::Q {
                assert!(fs.collision_source::<D2Q9>(DVec3::ZERO, i).abs() < 1e-16);
            }
        }
    }

    #[test]
    fn test_velocity_shifts() {
        let force = DVec3::new(1e-3, 0.0, 0.0);
        let rho = 2.0;
        let u = DVec3::ZERO;
        let tau = 0.8;

        let mut guo = ForcingScheme::new(ForcingSchemeVariant::Guo, tau);
        guo.set_variables(force, rho, u);
        assert!((guo.equilibrium_velocity(force).x - 2.5e-4).abs() < 1e-18);

        let mut sc = ForcingScheme::new(ForcingSchemeVariant::ShanChen, tau);
        sc.set_variables(force, rho, u);
        assert!((sc.equilibrium_velocity(force).x - 4e-4).abs() < 1e-18);

        let mut edm = ForcingScheme::new(ForcingSchemeVariant::ExactDifferenceMethod, tau);
        edm.set_variables(force, rho, u);
        assert_eq!(edm.equilibrium_velocity(force), u);

        // u_hyd 对三种变体一致
        for fs in [&guo, &sc, &edm] {
            assert!((fs.hydrodynamic_velocity(force).x - 2.5e-4).abs() < 1e-18);
        }
    }

    #[test]
    fn test_guo_source_injects_momentum() {
        // Σ_i S_i c_i = (1 − 1/(2τ)) F（Guo 源项的一阶矩）
        let force = DVec3::new(1e-3, -2e-3, 0.0);
        let tau = 0.7;
        let mut fs = ForcingScheme::new(ForcingSchemeVariant::Guo, tau);
        fs.set_variables(force, 1.0, DVec3::new(0.01, 0.02, 0.0));

        let mut mass = 0.0;
        let mut momentum = DVec3::ZERO;
        for i in 0..D2Q9::Q {
            let s = fs.collision_source::<D2Q9>(force, i);
            mass += s;
            momentum += D2Q9::celerity_d(i) * s;
        }
        assert!(mass.abs() < 1e-16, "Guo 源项零阶矩必须为零");
        let expected = (1.0 - 0.5 / tau) * force;
        assert!((momentum - expected).length() < 1e-15);
    }

    #[test]
    fn test_edm_source_is_equilibrium_difference() {
        let force = DVec3::new(5e-4, 0.0, 0.0);
        let rho = 1.0;
        let mut fs = ForcingScheme::new(ForcingSchemeVariant::ExactDifferenceMethod, 0.6);
        fs.set_variables(force, rho, DVec3::ZERO);

        // 零阶矩为零，一阶矩为 F
        let mut mass = 0.0;
        let mut momentum = DVec3::ZERO;
        for i in 0..D2Q9::Q {
            let s = fs.collision_source::<D2Q9>(force, i);
            mass += s;
            momentum += D2Q9::celerity_d(i) * s;
        }
        assert!(mass.abs() < 1e-16);
        assert!((momentum.x - force.x).abs() < 1e-15);
    }
}
