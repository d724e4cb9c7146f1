// crates/kf_lattice/src/domain.rs

//! 域索引空间
//!
//! 四类索引空间把三维位置映射为平坦偏移：
//!
//! - **全局空间** [`GlobalSpace`]：整张模拟格子，体积 L_x·L_y·L_z
//! - **本地空间** [`LocalSpace`]：单个 rank 的子域（X 向一维分解）
//! - **halo 空间** [`HaloSpace`]：本地空间加各轴 halo 填充，
//!   分布函数热缓冲区即存放于此
//! - **X 缓冲空间** [`BufferXSpace`]：halo 厚度的 X 向切片，
//!   用作消息收发暂存
//!
//! 所有空间均为 Z 最快的行主序：`index(p) = (p_x·n_y + p_y)·n_z + p_z`。
//!
//! # 不变量
//!
//! 每轴满足 `halo.length = local.length + 2·halo`（构造保证）。

use glam::IVec3;
use std::marker::PhantomData;

use crate::stencil::Stencil;

// ============================================================================
// 内存布局
// ============================================================================

/// 分布函数的内存布局
///
/// 决定 (单元, 方向) 二元索引如何展开为一维偏移。
pub trait MemoryLayout: Copy + Clone + Send + Sync + 'static {
    /// 布局名称
    const NAME: &'static str;

    /// 将单元偏移与方向号展开为总偏移
    fn population_index(cell: usize, volume: usize, q: usize, i: usize) -> usize;
}

/// Structure-of-Arrays：`i · volume + cell`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Soa;

impl MemoryLayout for Soa {
    const NAME: &'static str = "SoA";

    #[inline]
    fn population_index(cell: usize, volume: usize, _q: usize, i: usize) -> usize {
        i * volume + cell
    }
}

/// Array-of-Structures：`cell · q + i`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aos;

impl MemoryLayout for Aos {
    const NAME: &'static str = "AoS";

    #[inline]
    fn population_index(cell: usize, _volume: usize, q: usize, i: usize) -> usize {
        cell * q + i
    }
}

#[inline]
fn flat_index(length: IVec3, p: IVec3) -> usize {
    debug_assert!(p.cmpge(IVec3::ZERO).all() && p.cmplt(length).all());
    ((p.x * length.y + p.y) * length.z + p.z) as usize
}

#[inline]
fn volume_of(length: IVec3) -> usize {
    (length.x as i64 * length.y as i64 * length.z as i64) as usize
}

// ============================================================================
// 全局空间
// ============================================================================

/// 全局模拟格子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSpace {
    /// 各轴长度
    pub length: IVec3,
    /// 总单元数
    pub volume: usize,
}

impl GlobalSpace {
    /// 由全局边长创建
    pub fn new(length: IVec3) -> Self {
        Self {
            length,
            volume: volume_of(length),
        }
    }

    /// 全局位置 → 平坦偏移
    #[inline]
    pub fn index(&self, p: IVec3) -> usize {
        flat_index(self.length, p)
    }

    /// rank 子域在全局空间中的原点偏移
    ///
    /// 一维 X 分解下 rank 向量为 (r, 0, 0)：`offset_k = local.length_k · r_k`。
    #[inline]
    pub fn offset(&self, local: &LocalSpace, rank: IVec3) -> IVec3 {
        local.length * rank
    }
}

// ============================================================================
// 本地空间
// ============================================================================

/// 单 rank 子域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSpace {
    /// 各轴长度
    pub length: IVec3,
    /// 子域单元数
    pub volume: usize,
}

impl LocalSpace {
    /// 由全局空间与进程数创建（X 向均分；整除性由配置校验保证）
    pub fn new(global: &GlobalSpace, processes: i32) -> Self {
        let length = IVec3::new(global.length.x / processes, global.length.y, global.length.z);
        Self {
            length,
            volume: volume_of(length),
        }
    }

    /// 本地位置 → 平坦偏移
    #[inline]
    pub fn index(&self, p: IVec3) -> usize {
        flat_index(self.length, p)
    }

    /// 平坦偏移 → 本地位置（行主序逆映射，供写出器与测试使用）
    #[inline]
    pub fn position(&self, index: usize) -> IVec3 {
        let z = (index % self.length.z as usize) as i32;
        let rest = index / self.length.z as usize;
        let y = (rest % self.length.y as usize) as i32;
        let x = (rest / self.length.y as usize) as i32;
        IVec3::new(x, y, z)
    }
}

// ============================================================================
// halo 空间
// ============================================================================

/// 本地空间加 halo 填充
///
/// 按模板 `L` 的 halo 厚度在每轴两侧扩边；分布函数缓冲区的
/// 总长度为 `volume · L::Q`，按 `ML` 布局展开。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaloSpace<L: Stencil, ML: MemoryLayout> {
    /// 各轴长度（= 本地长度 + 2·halo）
    pub length: IVec3,
    /// halo 空间单元数
    pub volume: usize,
    _marker: PhantomData<(L, ML)>,
}

impl<L: Stencil, ML: MemoryLayout> HaloSpace<L, ML> {
    /// 由本地空间扩边创建
    pub fn new(local: &LocalSpace) -> Self {
        let length = local.length + 2 * L::HALO;
        Self {
            length,
            volume: volume_of(length),
            _marker: PhantomData,
        }
    }

    /// 分布缓冲区总长度（volume · Q）
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.volume * L::Q
    }

    /// halo 位置 → 单元平坦偏移
    #[inline]
    pub fn index(&self, p: IVec3) -> usize {
        flat_index(self.length, p)
    }

    /// (halo 位置, 方向) → 分布缓冲区偏移
    #[inline]
    pub fn index_pop(&self, p: IVec3, i: usize) -> usize {
        ML::population_index(self.index(p), self.volume, L::Q, i)
    }

    /// (单元偏移, 方向) → 分布缓冲区偏移
    #[inline]
    pub fn index_pop_cell(&self, cell: usize, i: usize) -> usize {
        ML::population_index(cell, self.volume, L::Q, i)
    }

    /// halo 位置 → 对应内部单元的本地空间偏移
    ///
    /// 仅对内部位置（p − halo 落在本地空间内）有效。
    #[inline]
    pub fn index_local(&self, local: &LocalSpace, p: IVec3) -> usize {
        local.index(p - L::HALO)
    }
}

// ============================================================================
// X 缓冲空间
// ============================================================================

/// X 向 halo 切片的收发暂存空间
///
/// 厚度为 halo_x，Y/Z 取 halo 空间的全长（含 Y/Z 填充列）。
/// 暂存布局固定为 SoA（`i · volume + cell`），与传输端无关。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferXSpace {
    /// 各轴长度 (halo_x, h_y, h_z)
    pub length: IVec3,
    /// 切片单元数
    pub volume: usize,
    /// 方向个数
    q: usize,
}

impl BufferXSpace {
    /// 由 halo 空间创建
    pub fn new<L: Stencil, ML: MemoryLayout>(halo: &HaloSpace<L, ML>) -> Self {
        let length = IVec3::new(L::HALO.x, halo.length.y, halo.length.z);
        Self {
            length,
            volume: volume_of(length),
            q: L::Q,
        }
    }

    /// 暂存缓冲区总长度（volume · Q）
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.volume * self.q
    }

    /// 切片内位置 → 单元平坦偏移
    #[inline]
    pub fn index(&self, p: IVec3) -> usize {
        flat_index(self.length, p)
    }

    /// (切片内位置, 方向) → 暂存缓冲区偏移
    #[inline]
    pub fn index_pop(&self, p: IVec3, i: usize) -> usize {
        i * self.volume + self.index(p)
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stencil::{D2Q9, D3Q19};

    #[test]
    fn test_flat_index_contract() {
        let g = GlobalSpace::new(IVec3::new(4, 3, 2));
        // (p_x·n_y + p_y)·n_z + p_z
        assert_eq!(g.index(IVec3::new(0, 0, 0)), 0);
        assert_eq!(g.index(IVec3::new(0, 0, 1)), 1);
        assert_eq!(g.index(IVec3::new(0, 1, 0)), 2);
        assert_eq!(g.index(IVec3::new(1, 0, 0)), 6);
        assert_eq!(g.index(IVec3::new(3, 2, 1)), 23);
        assert_eq!(g.volume, 24);
    }

    #[test]
    fn test_local_position_roundtrip() {
        let g = GlobalSpace::new(IVec3::new(8, 4, 2));
        let l = LocalSpace::new(&g, 2);
        assert_eq!(l.length, IVec3::new(4, 4, 2));
        for idx in 0..l.volume {
            assert_eq!(l.index(l.position(idx)), idx);
        }
    }

    #[test]
    fn test_global_offset() {
        let g = GlobalSpace::new(IVec3::new(8, 4, 1));
        let l = LocalSpace::new(&g, 4);
        assert_eq!(g.offset(&l, IVec3::new(0, 0, 0)), IVec3::ZERO);
        assert_eq!(g.offset(&l, IVec3::new(3, 0, 0)), IVec3::new(6, 0, 0));
    }

    #[test]
    fn test_halo_space_lengths() {
        let g = GlobalSpace::new(IVec3::new(8, 4, 1));
        let l = LocalSpace::new(&g, 2);
        let h: HaloSpace<D2Q9, Soa> = HaloSpace::new(&l);
        // 每轴 length + 2·halo
        assert_eq!(h.length, IVec3::new(6, 6, 1));
        assert_eq!(h.volume, 36);
        assert_eq!(h.buffer_len(), 36 * 9);
    }

    #[test]
    fn test_index_local() {
        let g = GlobalSpace::new(IVec3::new(8, 4, 1));
        let l = LocalSpace::new(&g, 2);
        let h: HaloSpace<D2Q9, Soa> = HaloSpace::new(&l);
        let p = IVec3::new(1, 1, 0); // halo 空间中的第一个内部单元
        assert_eq!(h.index_local(&l, p), 0);
        let p2 = IVec3::new(2, 3, 0);
        assert_eq!(h.index_local(&l, p2), l.index(IVec3::new(1, 2, 0)));
    }

    #[test]
    fn test_soa_aos_cover_buffer() {
        let g = GlobalSpace::new(IVec3::new(4, 4, 4));
        let l = LocalSpace::new(&g, 1);
        let h_soa: HaloSpace<D3Q19, Soa> = HaloSpace::new(&l);
        let h_aos: HaloSpace<D3Q19, Aos> = HaloSpace::new(&l);

        let mut seen_soa = vec![false; h_soa.buffer_len()];
        let mut seen_aos = vec![false; h_aos.buffer_len()];
        for cell in 0..h_soa.volume {
            for i in 0..19 {
                let a = h_soa.index_pop_cell(cell, i);
                let b = h_aos.index_pop_cell(cell, i);
                assert!(!seen_soa[a], "SoA 偏移冲突");
                assert!(!seen_aos[b], "AoS 偏移冲突");
                seen_soa[a] = true;
                seen_aos[b] = true;
            }
        }
        assert!(seen_soa.iter().all(|&x| x));
        assert!(seen_aos.iter().all(|&x| x));
    }

    #[test]
    fn test_buffer_x_space() {
        let g = GlobalSpace::new(IVec3::new(8, 4, 1));
        let l = LocalSpace::new(&g, 2);
        let h: HaloSpace<D2Q9, Soa> = HaloSpace::new(&l);
        let b = BufferXSpace::new(&h);
        assert_eq!(b.length, IVec3::new(1, 6, 1));
        assert_eq!(b.volume, 6);
        assert_eq!(b.buffer_len(), 6 * 9);
        assert_eq!(b.index_pop(IVec3::new(0, 2, 0), 3), 3 * 6 + 2);
    }
}
