// crates/kf_comm/src/mpi_transport.rs

//! MPI 传输后端（feature = "mpi"）
//!
//! rsmpi 两侧非阻塞收发：先挂接收，再发非阻塞发送，等待四个
//! 请求全部完成。标签区分方向，避免 P = 2 时左右消息串线。
//! rsmpi 默认的错误处理是进程终止，与传输错误按致命处理的
//! 策略一致。

use mpi::collective::SystemOperation;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use mpi::Threading;

use crate::error::CommError;
use crate::topology::Topology;
use crate::transport::Transport;

/// 发往右邻居的切片在接收端是"来自左侧"
const TAG_FROM_LEFT: i32 = 17;
/// 发往左邻居的切片在接收端是"来自右侧"
const TAG_FROM_RIGHT: i32 = 18;

/// 两侧 MPI 传输
pub struct MpiTransport {
    _universe: Universe,
    world: SimpleCommunicator,
    topology: Topology,
}

impl MpiTransport {
    /// 初始化 MPI（FUNNELED 线程级别：仅主线程调用 MPI）
    ///
    /// 运行时进程数必须与配置一致，不一致按配置缺陷终止。
    pub fn initialize(configured_processes: i32) -> Result<Self, CommError> {
        let (universe, _threading) = mpi::initialize_with_threading(Threading::Funneled)
            .ok_or_else(|| CommError::Transport("MPI 初始化失败".to_string()))?;
        let world = universe.world();
        let size = world.size();
        if size != configured_processes {
            return Err(CommError::TopologyMismatch {
                configured: configured_processes,
                actual: size,
            });
        }
        let topology = Topology::new(world.rank(), size);
        Ok(Self {
            _universe: universe,
            world,
            topology,
        })
    }
}

impl Transport for MpiTransport {
    fn name(&self) -> &'static str {
        "mpi"
    }

    fn rank(&self) -> i32 {
        self.topology.rank
    }

    fn size(&self) -> i32 {
        self.topology.size
    }

    fn exchange(
        &mut self,
        send_left: &[f64],
        send_right: &[f64],
        recv_from_left: &mut [f64],
        recv_from_right: &mut [f64],
    ) -> Result<(), CommError> {
        if send_left.len() != recv_from_left.len() || send_right.len() != recv_from_right.len() {
            return Err(CommError::SizeMismatch {
                name: "mpi_slab",
                expected: recv_from_left.len(),
                actual: send_left.len(),
            });
        }

        let left = self.world.process_at_rank(self.topology.left());
        let right = self.world.process_at_rank(self.topology.right());

        mpi::request::scope(|scope| {
            let recv_left =
                left.immediate_receive_into_with_tag(scope, recv_from_left, TAG_FROM_LEFT);
            let recv_right =
                right.immediate_receive_into_with_tag(scope, recv_from_right, TAG_FROM_RIGHT);
            let send_l = left.immediate_send_with_tag(scope, send_left, TAG_FROM_RIGHT);
            let send_r = right.immediate_send_with_tag(scope, send_right, TAG_FROM_LEFT);

            recv_left.wait();
            recv_right.wait();
            send_l.wait();
            send_r.wait();
        });

        Ok(())
    }

    fn all_reduce_sum(&self, value: f64) -> Result<f64, CommError> {
        let mut total = 0.0;
        self.world
            .all_reduce_into(&value, &mut total, SystemOperation::sum());
        Ok(total)
    }
}
