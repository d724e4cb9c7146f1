// crates/kf_physics/src/init.rs

//! 初始条件
//!
//! 全部为闭式分布，在单元的**全局**位置求值；初始总体取
//! 对应 (ρ₀, u₀) 的平衡态（由外层例程组装）。
//! 谱空间湍流播种与分析栈一并排除在外。

use glam::{DVec3, IVec3};
use kf_config::{InitDensityVariant, InitVelocityVariant, InitialDensityConfig, InitialVelocityConfig};
use kf_lattice::GlobalSpace;
use std::f64::consts::TAU;

/// 全局位置处的初始密度
#[inline]
pub fn density_at(config: &InitialDensityConfig, global: &GlobalSpace, p_global: IVec3) -> f64 {
    match config.variant {
        InitDensityVariant::Homogeneous => config.value,
        InitDensityVariant::Peak => {
            if p_global == global.length / 2 {
                2.0 * config.value
            } else {
                config.value
            }
        }
    }
}

/// 全局位置处的初始速度
#[inline]
pub fn velocity_at(
    config: &InitialVelocityConfig,
    global: &GlobalSpace,
    p_global: IVec3,
) -> DVec3 {
    match config.variant {
        InitVelocityVariant::Homogeneous => DVec3::from_array(config.value),
        InitVelocityVariant::TaylorGreen => {
            // u = U (sin kx·x cos ky·y, −cos kx·x sin ky·y, 0)
            let amplitude = config.value[0];
            let kx = TAU / global.length.x as f64;
            let ky = TAU / global.length.y as f64;
            let x = p_global.x as f64;
            let y = p_global.y as f64;
            DVec3::new(
                amplitude * (kx * x).sin() * (ky * y).cos(),
                -amplitude * (kx * x).cos() * (ky * y).sin(),
                0.0,
            )
        }
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_density() {
        let global = GlobalSpace::new(IVec3::new(8, 8, 1));
        let config = InitialDensityConfig {
            variant: InitDensityVariant::Peak,
            value: 1.0,
        };
        assert_eq!(density_at(&config, &global, IVec3::new(4, 4, 0)), 2.0);
        assert_eq!(density_at(&config, &global, IVec3::new(0, 0, 0)), 1.0);
    }

    #[test]
    fn test_taylor_green_is_divergence_free_on_average() {
        let global = GlobalSpace::new(IVec3::new(16, 16, 1));
        let config = InitialVelocityConfig {
            variant: InitVelocityVariant::TaylorGreen,
            value: [0.05, 0.0, 0.0],
        };

        // 周期域上的平均动量为零
        let mut total = DVec3::ZERO;
        for x in 0..16 {
            for y in 0..16 {
                total += velocity_at(&config, &global, IVec3::new(x, y, 0));
            }
        }
        assert!(total.length() < 1e-12);
    }

    #[test]
    fn test_homogeneous_velocity() {
        let global = GlobalSpace::new(IVec3::new(4, 4, 1));
        let config = InitialVelocityConfig {
            variant: InitVelocityVariant::Homogeneous,
            value: [0.05, 0.0, 0.0],
        };
        assert_eq!(
            velocity_at(&config, &global, IVec3::new(3, 1, 0)),
            DVec3::new(0.05, 0.0, 0.0)
        );
    }
}
