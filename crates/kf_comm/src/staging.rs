// crates/kf_comm/src/staging.rs

//! X 缓冲暂存
//!
//! 发送侧把紧贴 X 边界的内部切片（厚度 halo_x，Y/Z 取 halo 空间
//! 全长）打包为连续缓冲区；接收侧把对端数据解包进 halo 切片。
//! 打包是全模板的：每单元搬运全部 q 个总体。暂存布局固定为
//! SoA，与分布缓冲区的布局无关。

use kf_foundation::AlignedVec;
use kf_lattice::{BufferXSpace, HaloSpace, LocalSpace, MemoryLayout, Stencil};

/// halo 交换的收发暂存缓冲区
#[derive(Debug)]
pub struct HaloStaging {
    space: BufferXSpace,
    /// 发往左邻居的切片
    pub send_left: AlignedVec<f64>,
    /// 发往右邻居的切片
    pub send_right: AlignedVec<f64>,
    /// 来自左邻居的切片（填充左 halo）
    pub recv_from_left: AlignedVec<f64>,
    /// 来自右邻居的切片（填充右 halo）
    pub recv_from_right: AlignedVec<f64>,
}

impl HaloStaging {
    /// 按 halo 空间尺寸分配暂存
    pub fn new<L: Stencil, ML: MemoryLayout>(hs: &HaloSpace<L, ML>) -> Self {
        let space = BufferXSpace::new(hs);
        let len = space.buffer_len();
        Self {
            space,
            send_left: AlignedVec::zeros(len),
            send_right: AlignedVec::zeros(len),
            recv_from_left: AlignedVec::zeros(len),
            recv_from_right: AlignedVec::zeros(len),
        }
    }

    /// 暂存空间
    #[inline]
    pub fn space(&self) -> &BufferXSpace {
        &self.space
    }

    /// 打包两侧的内部边界切片
    pub fn pack<L: Stencil, ML: MemoryLayout>(
        &mut self,
        f: &[f64],
        hs: &HaloSpace<L, ML>,
        local: &LocalSpace,
    ) {
        let halo_x = L::HALO.x;
        // 左内部切片 x ∈ [halo_x, 2·halo_x)；右内部切片 x ∈ [halo_x + l_x − halo_x, halo_x + l_x)
        let left_base = halo_x;
        let right_base = local.length.x;
        for dx in 0..halo_x {
            for y in 0..hs.length.y {
                for z in 0..hs.length.z {
                    let buf_pos = glam::IVec3::new(dx, y, z);
                    let left_pos = glam::IVec3::new(left_base + dx, y, z);
                    let right_pos = glam::IVec3::new(right_base + dx, y, z);
                    for i in 0..L::Q {
                        let k = self.space.index_pop(buf_pos, i);
                        self.send_left[k] = f[hs.index_pop(left_pos, i)];
                        self.send_right[k] = f[hs.index_pop(right_pos, i)];
                    }
                }
            }
        }
    }

    /// 把接收到的切片解包进 halo 层
    pub fn unpack<L: Stencil, ML: MemoryLayout>(
        &self,
        f: &mut [f64],
        hs: &HaloSpace<L, ML>,
        local: &LocalSpace,
    ) {
        let halo_x = L::HALO.x;
        // 左 halo x ∈ [0, halo_x)；右 halo x ∈ [halo_x + l_x, halo_x + l_x + halo_x)
        let right_base = halo_x + local.length.x;
        for dx in 0..halo_x {
            for y in 0..hs.length.y {
                for z in 0..hs.length.z {
                    let buf_pos = glam::IVec3::new(dx, y, z);
                    let left_pos = glam::IVec3::new(dx, y, z);
                    let right_pos = glam::IVec3::new(right_base + dx, y, z);
                    for i in 0..L::Q {
                        let k = self.space.index_pop(buf_pos, i);
                        f[hs.index_pop(left_pos, i)] = self.recv_from_left[k];
                        f[hs.index_pop(right_pos, i)] = self.recv_from_right[k];
                    }
                }
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
    use glam::IVec3;
    use kf_lattice::{GlobalSpace, Soa, D2Q9};

    #[test]
    fn test_pack_reads_boundary_interior_slabs() {
        let g = GlobalSpace::new(IVec3::new(8, 4, 1));
        let l = LocalSpace::new(&g, 1);
        let hs: HaloSpace<D2Q9, Soa> = HaloSpace::new(&l);
        let mut f = vec![0.0; hs.buffer_len()];
        for x in 0..hs.length.x {
            for y in 0..hs.length.y {
                for i in 0..D2Q9::Q {
                    f[hs.index_pop(IVec3::new(x, y, 0), i)] =
                        (x * 1000 + y * 100 + i as i32) as f64;
                }
            }
        }

        let mut staging = HaloStaging::new(&hs);
        staging.pack(&f, &hs, &l);

        // 左切片读自 x = 1，右切片读自 x = 8（halo_x + l_x − 1）
        for y in 0..hs.length.y {
            for i in 0..D2Q9::Q {
                let k = staging.space().index_pop(IVec3::new(0, y, 0), i);
                assert_eq!(staging.send_left[k], f[hs.index_pop(IVec3::new(1, y, 0), i)]);
                assert_eq!(staging.send_right[k], f[hs.index_pop(IVec3::new(8, y, 0), i)]);
            }
        }
    }

    #[test]
    fn test_unpack_fills_halo_slabs() {
        let g = GlobalSpace::new(IVec3::new(8, 4, 1));
        let l = LocalSpace::new(&g, 1);
        let hs: HaloSpace<D2Q9, Soa> = HaloSpace::new(&l);
        let mut f = vec![0.0; hs.buffer_len()];

        let mut staging = HaloStaging::new(&hs);
        for k in 0..staging.recv_from_left.len() {
            staging.recv_from_left[k] = 1.0 + k as f64;
            staging.recv_from_right[k] = -1.0 - k as f64;
        }
        staging.unpack(&mut f, &hs, &l);

        for y in 0..hs.length.y {
            for i in 0..D2Q9::Q {
                let k = staging.space().index_pop(IVec3::new(0, y, 0), i);
                assert_eq!(f[hs.index_pop(IVec3::new(0, y, 0), i)], 1.0 + k as f64);
                assert_eq!(f[hs.index_pop(IVec3::new(9, y, 0), i)], -1.0 - k as f64);
            }
        }
    }
}
