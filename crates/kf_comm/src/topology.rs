// crates/kf_comm/src/topology.rs

//! 进程拓扑
//!
//! X 向一维分解：rank r 拥有 X 切片 `[r·l_x, (r+1)·l_x)`，
//! 左右邻居按模 P 回绕（周期分解，无边界 rank）。

use glam::IVec3;

/// 一维分解的进程拓扑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    /// 本进程 rank
    pub rank: i32,
    /// 进程总数 P
    pub size: i32,
}

impl Topology {
    /// 创建拓扑
    pub fn new(rank: i32, size: i32) -> Self {
        debug_assert!(size >= 1 && (0..size).contains(&rank));
        Self { rank, size }
    }

    /// 左邻居 rank（r − 1 mod P）
    #[inline]
    pub fn left(&self) -> i32 {
        (self.rank - 1 + self.size) % self.size
    }

    /// 右邻居 rank（r + 1 mod P）
    #[inline]
    pub fn right(&self) -> i32 {
        (self.rank + 1) % self.size
    }

    /// rank 向量 (r, 0, 0)，供全局偏移计算
    #[inline]
    pub fn rank_vector(&self) -> IVec3 {
        IVec3::new(self.rank, 0, 0)
    }
}
