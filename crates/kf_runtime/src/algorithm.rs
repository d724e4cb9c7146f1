// crates/kf_runtime/src/algorithm.rs

//! 单步编排
//!
//! 每次迭代严格执行：
//!
//! 1. 交换 previous / next 缓冲区
//! 2. `collision.update(iteration)`（推进时间相位）
//! 3. halo 交换（X 向，走传输层）
//! 4. 周期边界（Y/Z halo 切片拷贝）
//! 5. 内部单元三维遍历（Z 最快）：矩 → 体积力 → 碰撞状态 →
//!    写 q 个碰撞后总体；被标记存储时同时写逐单元场
//! 6. 记录分相耗时
//!
//! 步骤 5 对单元无交叉依赖，按 X 静态分块并行；每线程克隆
//! 碰撞算子（其缓存为逐单元状态），块结束后把熵回退计数并入
//! 共享计数器。

use glam::IVec3;
use kf_comm::Communicator;
use kf_foundation::{Counter, SharedSlice};
use kf_lattice::{HaloSpace, LocalSpace, MemoryLayout, Stencil};
use kf_physics::boundary::PeriodicBoundary;
use kf_physics::{Collision, Moment};
use rayon::prelude::*;
use std::time::Instant;

use crate::distribution::Distribution;
use crate::error::RuntimeResult;
use crate::fields::LocalFields;
use crate::metrics::StepTimings;

/// 单步步进核（按模板 / 布局 / 碰撞变体单态化）
pub struct StepKernel<L: Stencil, ML: MemoryLayout, C: Collision<L, ML>> {
    local: LocalSpace,
    hs: HaloSpace<L, ML>,
    global_offset: IVec3,
    collision: C,
    boundary: PeriodicBoundary,
    threads: usize,
    is_stored: bool,
    timings: StepTimings,
    fallbacks: Counter,
}

impl<L: Stencil, ML: MemoryLayout, C: Collision<L, ML>> StepKernel<L, ML, C> {
    /// 创建步进核
    pub fn new(
        local: LocalSpace,
        hs: HaloSpace<L, ML>,
        global_offset: IVec3,
        collision: C,
        threads: usize,
    ) -> Self {
        Self {
            local,
            hs,
            global_offset,
            collision,
            boundary: PeriodicBoundary,
            threads: threads.max(1),
            is_stored: false,
            timings: StepTimings::default(),
            fallbacks: Counter::new(),
        }
    }

    /// 设定本步是否写逐单元场
    #[inline]
    pub fn set_is_stored(&mut self, is_stored: bool) {
        self.is_stored = is_stored;
    }

    /// 上一步的分相耗时
    #[inline]
    pub fn timings(&self) -> StepTimings {
        self.timings
    }

    /// 累计熵回退计数
    #[inline]
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks.get()
    }

    /// 执行一次迭代
    pub fn iterate(
        &mut self,
        iteration: u64,
        dist: &mut Distribution,
        fields: &mut LocalFields,
        comm: &mut Communicator,
    ) -> RuntimeResult<()> {
        dist.swap();
        self.collision.update(iteration);

        let t0 = Instant::now();

        comm.communicate_halos(dist.previous_mut(), &self.hs, &self.local)?;
        self.boundary.apply(dist.previous_mut(), &self.hs, &self.local);

        let t1 = Instant::now();

        self.compute_interior(dist, fields);

        let t2 = Instant::now();

        self.timings = StepTimings {
            communication: t1 - t0,
            computation: t2 - t1,
            total: t2 - t0,
        };
        Ok(())
    }

    /// 内部单元计算相（X 静态分块并行）
    fn compute_interior(&self, dist: &mut Distribution, fields: &mut LocalFields) {
        let (prev, next) = dist.previous_and_next_mut();
        let next_view = SharedSlice::new(next);

        let density_view = SharedSlice::new(fields.density.as_mut_slice());
        let alpha_view = SharedSlice::new(fields.alpha.as_mut_slice());
        let [vx, vy, vz] = &mut fields.velocity;
        let velocity_views = [
            SharedSlice::new(vx.as_mut_slice()),
            SharedSlice::new(vy.as_mut_slice()),
            SharedSlice::new(vz.as_mut_slice()),
        ];
        let [fx, fy, fz] = &mut fields.force;
        let force_views = [
            SharedSlice::new(fx.as_mut_slice()),
            SharedSlice::new(fy.as_mut_slice()),
            SharedSlice::new(fz.as_mut_slice()),
        ];

        let hs = self.hs;
        let local = self.local;
        let offset = self.global_offset;
        let is_stored = self.is_stored;
        let template = &self.collision;
        let fallbacks = &self.fallbacks;

        let x_start = L::HALO.x;
        let x_end = x_start + local.length.x;
        let y_range = L::HALO.y..L::HALO.y + local.length.y;
        let z_range = L::HALO.z..L::HALO.z + local.length.z;

        let block_count = self.threads.min(local.length.x as usize);
        let block_len = (local.length.x as usize).div_ceil(block_count) as i32;
        let blocks: Vec<(i32, i32)> = (0..block_count as i32)
            .map(|b| {
                let s = x_start + b * block_len;
                let e = (s + block_len).min(x_end);
                (s, e)
            })
            .filter(|(s, e)| s < e)
            .collect();

        blocks.into_par_iter().for_each(|(block_start, block_end)| {
            let mut collision = template.clone();
            let mut moment = Moment::<L>::new();

            for x in block_start..block_end {
                for y in y_range.clone() {
                    for z in z_range.clone() {
                        let p = IVec3::new(x, y, z);

                        moment.calculate_moments(prev, &hs, p);
                        collision.set_force(p - L::HALO + offset);
                        collision.set_variables(prev, &hs, p, moment.density(), moment.velocity());

                        for i in 0..L::Q {
                            let value =
                                collision.post_collision(prev, &hs, p - L::celerity(i), i);
                            // SAFETY: 每个单元恰好属于一个 X 块，写入下标两两不相交
                            unsafe { next_view.write(hs.index_pop(p, i), value) };
                        }

                        if is_stored {
                            let cell = hs.index_local(&local, p);
                            let velocity = collision.hydrodynamic_velocity();
                            let force = collision.force();
                            // SAFETY: 同上，场下标按单元划分，线程间不相交
                            unsafe {
                                density_view.write(cell, moment.density());
                                alpha_view.write(cell, collision.alpha());
                                for d in 0..3 {
                                    velocity_views[d].write(cell, velocity[d]);
                                    force_views[d].write(cell, force[d]);
                                }
                            }
                        }
                    }
                }
            }

            fallbacks.add(collision.take_fallbacks());
        });
    }
}
