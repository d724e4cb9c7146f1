// crates/kf_runtime/src/distribution.rs

//! 分布函数双缓冲
//!
//! 两个同形 halo 空间缓冲区加一个 current 开关：每步开头
//! `swap` 一次，随后整步把 `previous()` 当只读、把 `next()` 当
//! 只写。缓冲区在启动时一次性分配，运行期间不再增长。
//!
//! 约定：初始化与每步结束后，最新状态都在 **next** 缓冲区中
//! （下一步开头的 swap 把它变成 previous）。

use kf_foundation::AlignedVec;
use kf_lattice::{HaloSpace, LocalSpace, MemoryLayout, Stencil};

/// 指针交换式分布双缓冲
#[derive(Debug)]
pub struct Distribution {
    buffers: [AlignedVec<f64>; 2],
    current: usize,
}

impl Distribution {
    /// 分配两个零初始化缓冲区
    pub fn new(buffer_len: usize) -> Self {
        Self {
            buffers: [AlignedVec::zeros(buffer_len), AlignedVec::zeros(buffer_len)],
            current: 0,
        }
    }

    /// 交换 previous / next（每步开头调用一次）
    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    /// 上一步缓冲区（本步只读）
    #[inline]
    pub fn previous(&self) -> &[f64] {
        &self.buffers[self.current]
    }

    /// 上一步缓冲区的可变视图（halo 交换与边界写入用）
    #[inline]
    pub fn previous_mut(&mut self) -> &mut [f64] {
        &mut self.buffers[self.current]
    }

    /// 本步写入缓冲区
    #[inline]
    pub fn next(&self) -> &[f64] {
        &self.buffers[1 - self.current]
    }

    /// 本步写入缓冲区的可变视图
    #[inline]
    pub fn next_mut(&mut self) -> &mut [f64] {
        &mut self.buffers[1 - self.current]
    }

    /// 同时取得 previous 只读视图与 next 可变视图（计算相用）
    #[inline]
    pub fn previous_and_next_mut(&mut self) -> (&[f64], &mut [f64]) {
        let (left, right) = self.buffers.split_at_mut(1);
        if self.current == 0 {
            (&left[0], &mut right[0])
        } else {
            (&right[0], &mut left[0])
        }
    }
}

// ============================================================================
// 本地空间打包
// ============================================================================

/// 把 halo 缓冲区的内部单元按方向分组打包到本地空间
///
/// 输出布局固定为 `i · local.volume + local_index`（备份文件的
/// q 数据集布局），与 halo 缓冲区的内存布局无关。
pub fn pack_local<L: Stencil, ML: MemoryLayout>(
    f: &[f64],
    hs: &HaloSpace<L, ML>,
    local: &LocalSpace,
) -> Vec<f64> {
    let mut packed = vec![0.0; local.volume * L::Q];
    for x in 0..local.length.x {
        for y in 0..local.length.y {
            for z in 0..local.length.z {
                let p_local = glam::IVec3::new(x, y, z);
                let p_halo = p_local + L::HALO;
                let cell = local.index(p_local);
                for i in 0..L::Q {
                    packed[i * local.volume + cell] = f[hs.index_pop(p_halo, i)];
                }
            }
        }
    }
    packed
}

/// [`pack_local`] 的逆操作：本地空间数据写回 halo 缓冲区内部
pub fn unpack_local<L: Stencil, ML: MemoryLayout>(
    packed: &[f64],
    f: &mut [f64],
    hs: &HaloSpace<L, ML>,
    local: &LocalSpace,
) {
    for x in 0..local.length.x {
        for y in 0..local.length.y {
            for z in 0..local.length.z {
                let p_local = glam::IVec3::new(x, y, z);
                let p_halo = p_local + L::HALO;
                let cell = local.index(p_local);
                for i in 0..L::Q {
                    f[hs.index_pop(p_halo, i)] = packed[i * local.volume + cell];
                }
            }
        }
    }
}

/// 内部单元总质量 Σ_cells Σ_i f_i
pub fn interior_mass<L: Stencil, ML: MemoryLayout>(
    f: &[f64],
    hs: &HaloSpace<L, ML>,
    local: &LocalSpace,
) -> f64 {
    let mut mass = 0.0;
    for x in 0..local.length.x {
        for y in 0..local.length.y {
            for z in 0..local.length.z {
                let p_halo = glam::IVec3::new(x, y, z) + L::HALO;
                let cell = hs.index(p_halo);
                for i in 0..L::Q {
                    mass += f[hs.index_pop_cell(cell, i)];
                }
            }
        }
    }
    mass
}

// ============================================================================
// 测试
// ============================================================================
