// crates/kf_comm/src/communicator.rs

//! halo 通信器
//!
//! 每步对上一步缓冲区执行一次完整协议：
//!
//! 1. 打包：两侧内部边界切片 → 连续发送缓冲
//! 2. 交换：传输后端收发并等待全部完成
//! 3. 解包：接收缓冲 → halo 切片
//!
//! 步骤 3 返回后，X halo 层即持有邻居 rank（或单进程回绕）
//! 对应内部单元的总体。

use kf_lattice::{HaloSpace, LocalSpace, MemoryLayout, Stencil};

use crate::error::CommError;
use crate::staging::HaloStaging;
use crate::topology::Topology;
use crate::transport::Transport;

/// halo 交换通信器
pub struct Communicator {
    topology: Topology,
    staging: HaloStaging,
    transport: Box<dyn Transport>,
}

impl Communicator {
    /// 创建通信器；拓扑取自传输后端
    pub fn new<L: Stencil, ML: MemoryLayout>(
        hs: &HaloSpace<L, ML>,
        transport: Box<dyn Transport>,
    ) -> Self {
        let topology = Topology::new(transport.rank(), transport.size());
        Self {
            topology,
            staging: HaloStaging::new(hs),
            transport,
        }
    }

    /// 进程拓扑
    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// 传输后端名称
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// 对上一步分布缓冲区执行一次 X halo 交换
    pub fn communicate_halos<L: Stencil, ML: MemoryLayout>(
        &mut self,
        f: &mut [f64],
        hs: &HaloSpace<L, ML>,
        local: &LocalSpace,
    ) -> Result<(), CommError> {
        self.staging.pack(f, hs, local);
        self.transport.exchange(
            &self.staging.send_left,
            &self.staging.send_right,
            &mut self.staging.recv_from_left,
            &mut self.staging.recv_from_right,
        )?;
        self.staging.unpack(f, hs, local);
        Ok(())
    }

    /// 跨 rank 求和
    pub fn reduce_sum(&self, value: f64) -> Result<f64, CommError> {
        self.transport.all_reduce_sum(value)
    }
}

// ============================================================================
// 测试
// ============================================================================
