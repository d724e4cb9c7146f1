// crates/kf_runtime/tests/streaming.rs

//! 流动正确性
//!
//! 碰撞关闭时（τ → ∞，(1 − 1/τ) 在 f64 中精确为 1），总体沿各自
//! 离散速度每步刚体平移；周期格子上绕行一整圈后必须逐位回到
//! 初始状态。

use glam::{DVec3, IVec3};
use kf_comm::{Communicator, LoopbackTransport};
use kf_config::{ForceConfig, ForcingSchemeVariant};
use kf_lattice::{GlobalSpace, HaloSpace, LocalSpace, Soa, Stencil, D2Q9};
use kf_physics::{Bgk, Collision, CollisionParams};
use kf_runtime::distribution::pack_local;
use kf_runtime::{Distribution, LocalFields, StepKernel};

#[test]
fn test_rigid_translation_full_revolution() {
    let global = GlobalSpace::new(IVec3::new(8, 8, 1));
    let local = LocalSpace::new(&global, 1);
    let hs: HaloSpace<D2Q9, Soa> = HaloSpace::new(&local);

    let params = CollisionParams {
        // 1 − 1/τ 在 f64 中精确为 1，且 (1/τ)·f_eq 小到无法改变 f
        relaxation_time: 1.0e30,
        forcing_scheme: ForcingSchemeVariant::Guo,
        force: ForceConfig::default(),
    };
    let mut kernel: StepKernel<D2Q9, Soa, Bgk<D2Q9>> = StepKernel::new(
        local,
        hs,
        IVec3::ZERO,
        <Bgk<D2Q9> as Collision<D2Q9, Soa>>::new(&params),
        1,
    );
    let mut dist = Distribution::new(hs.buffer_len());
    let mut fields = LocalFields::new(local.volume);
    let mut comm = Communicator::new(&hs, Box::new(LoopbackTransport));

    // 背景取静止平衡态（保证 ρ > 0），在一个单元的若干方向上叠加凸起
    {
        let f = dist.next_mut();
        for x in 0..local.length.x {
            for y in 0..local.length.y {
                let p = IVec3::new(x, y, 0) + D2Q9::HALO;
                for i in 0..D2Q9::Q {
                    f[hs.index_pop(p, i)] =
                        kf_physics::equilibrium::compute::<D2Q9>(1.0, DVec3::ZERO, 0.0, i);
                }
            }
        }
        let bump = IVec3::new(3, 4, 0) + D2Q9::HALO;
        for i in [1usize, 2, 5, 7] {
            f[hs.index_pop(bump, i)] += 0.25;
        }
    }

    let initial = pack_local(dist.next(), &hs, &local);

    // 一整圈：|c| = 1 的方向走 L = 8 步回到原位；对角方向同样
    for iteration in 1..=8 {
        kernel.iterate(iteration, &mut dist, &mut fields, &mut comm).unwrap();
    }

    let after = pack_local(dist.next(), &hs, &local);
    for (k, (&a, &b)) in initial.iter().zip(&after).enumerate() {
        assert_eq!(a, b, "总体 {k} 绕行一圈后未回到初始值");
    }
}

#[test]
fn test_single_step_translation() {
    let global = GlobalSpace::new(IVec3::new(8, 8, 1));
    let local = LocalSpace::new(&global, 1);
    let hs: HaloSpace<D2Q9, Soa> = HaloSpace::new(&local);

    let params = CollisionParams {
        relaxation_time: 1.0e30,
        forcing_scheme: ForcingSchemeVariant::Guo,
        force: ForceConfig::default(),
    };
    let mut kernel: StepKernel<D2Q9, Soa, Bgk<D2Q9>> = StepKernel::new(
        local,
        hs,
        IVec3::ZERO,
        <Bgk<D2Q9> as Collision<D2Q9, Soa>>::new(&params),
        1,
    );
    let mut dist = Distribution::new(hs.buffer_len());
    let mut fields = LocalFields::new(local.volume);
    let mut comm = Communicator::new(&hs, Box::new(LoopbackTransport));

    let source = IVec3::new(2, 2, 0);
    {
        let f = dist.next_mut();
        for x in 0..local.length.x {
            for y in 0..local.length.y {
                let p = IVec3::new(x, y, 0) + D2Q9::HALO;
                for i in 0..D2Q9::Q {
                    f[hs.index_pop(p, i)] =
                        kf_physics::equilibrium::compute::<D2Q9>(1.0, DVec3::ZERO, 0.0, i);
                }
            }
        }
        f[hs.index_pop(source + D2Q9::HALO, 1)] += 0.125;
    }

    kernel.iterate(1, &mut dist, &mut fields, &mut comm).unwrap();

    // 方向 1 = (1, 0)：凸起应恰好移动到 x + 1
    let f = dist.next();
    let moved = source + IVec3::new(1, 0, 0);
    let expected =
        kf_physics::equilibrium::compute::<D2Q9>(1.0, DVec3::ZERO, 0.0, 1) + 0.125;
    assert_eq!(f[hs.index_pop(moved + D2Q9::HALO, 1)], expected);
    // 原位恢复为背景值
    assert_eq!(
        f[hs.index_pop(source + D2Q9::HALO, 1)],
        kf_physics::equilibrium::compute::<D2Q9>(1.0, DVec3::ZERO, 0.0, 1)
    );
}
