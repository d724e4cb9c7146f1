// crates/kf_physics/src/boundary.rs

//! 周期边界
//!
//! 对未被进程分解覆盖的轴，在 halo 交换之后做两次切片拷贝，
//! 把对侧内部单元的全部 q 个总体复制进 halo 层：
//!
//! ```text
//! 目标切片 halo_k + L_k ← 源切片 halo_k
//! 目标切片 0            ← 源切片 halo_k + L_k − 1
//! ```
//!
//! X 向一维分解下 Y、Z 恒由此处理；X 的回绕走传输层（单进程
//! 回环传输与多进程 MPI 语义一致）。遍历覆盖整个 halo 空间，
//! 因此 X halo 列的 Y/Z 角单元也在此处补齐。

use glam::IVec3;
use kf_lattice::{HaloSpace, LocalSpace, MemoryLayout, Stencil};

/// 周期边界应用器
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodicBoundary;

impl PeriodicBoundary {
    /// 对 Y、Z 轴（凡 halo 厚度非零者）应用周期拷贝
    pub fn apply<L: Stencil, ML: MemoryLayout>(
        &self,
        f: &mut [f64],
        hs: &HaloSpace<L, ML>,
        local: &LocalSpace,
    ) {
        if L::HALO.y > 0 {
            self.apply_axis::<L, ML>(f, hs, local, 1);
        }
        if L::HALO.z > 0 {
            self.apply_axis::<L, ML>(f, hs, local, 2);
        }
    }

    /// 对单轴应用周期切片拷贝
    pub fn apply_axis<L: Stencil, ML: MemoryLayout>(
        &self,
        f: &mut [f64],
        hs: &HaloSpace<L, ML>,
        local: &LocalSpace,
        axis: usize,
    ) {
        let halo_k = L::HALO[axis];
        let len_k = local.length[axis];

        // (源切片, 目标切片) 对
        let copies = [(halo_k, halo_k + len_k), (halo_k + len_k - 1, 0)];

        // 其余两轴取 halo 空间全长
        let (a, b) = other_axes(axis);
        for pa in 0..hs.length[a] {
            for pb in 0..hs.length[b] {
                for (src_k, dst_k) in copies {
                    let mut src = IVec3::ZERO;
                    let mut dst = IVec3::ZERO;
                    src[axis] = src_k;
                    dst[axis] = dst_k;
                    src[a] = pa;
                    dst[a] = pa;
                    src[b] = pb;
                    dst[b] = pb;

                    let src_cell = hs.index(src);
                    let dst_cell = hs.index(dst);
                    for i in 0..L::Q {
                        f[hs.index_pop_cell(dst_cell, i)] = f[hs.index_pop_cell(src_cell, i)];
                    }
                }
            }
        }
    }
}

#[inline]
fn other_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

// ============================================================================
// 测试
// ============================================================================
