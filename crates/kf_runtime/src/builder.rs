// crates/kf_runtime/src/builder.rs

//! 运行分派
//!
//! 本层之上零泛型：配置在此一次性分派到单态化核心
//! （模板 × 内存布局 × 碰撞变体），返回 `Box<dyn DynSimulation>`。
//! 分派每次运行只发生一次，热路径内无动态分发。

use kf_comm::{CommError, LoopbackTransport, Transport};
use kf_config::{CollisionVariant, LayoutVariant, SimulationConfig, StencilVariant};
use kf_lattice::{Aos, MemoryLayout, Soa, Stencil, D1Q3, D2Q9, D3Q19, D3Q27};
use kf_physics::{ApproachedElbm, Bgk, Collision, Elbm, ForcedBnrElbm, ForcedNrElbm};
use std::path::PathBuf;

use crate::error::{RuntimeError, RuntimeResult};
use crate::fields::LocalFields;
use crate::routine::{Routine, RunSummary};

/// 单态化核心的动态外壳
pub trait DynSimulation: Send {
    /// 运行描述（模板 / 布局 / 碰撞 / 尺寸）
    fn name(&self) -> String;

    /// 执行完整运行并返回汇总
    fn run(&mut self) -> RuntimeResult<RunSummary>;

    /// 逐单元场的只读视图（最近一次存储迭代的内容）
    fn fields(&self) -> &LocalFields;
}

/// 模拟构建器
///
/// 校验配置、选定传输后端、分派单态化核心。
pub struct SimulationBuilder {
    config: SimulationConfig,
    transport: Option<Box<dyn Transport>>,
    restore_path: Option<PathBuf>,
}

impl SimulationBuilder {
    /// 由配置创建
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            transport: None,
            restore_path: None,
        }
    }

    /// 指定传输后端（多进程运行由调用方初始化 MPI 后注入）
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 指定断点续算的备份文件
    pub fn with_restore(mut self, path: PathBuf) -> Self {
        self.restore_path = Some(path);
        self
    }

    /// 构建模拟
    pub fn build(self) -> RuntimeResult<Box<dyn DynSimulation>> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => {
                if transport.size() != self.config.processes {
                    return Err(RuntimeError::Comm(CommError::TopologyMismatch {
                        configured: self.config.processes,
                        actual: transport.size(),
                    }));
                }
                transport
            }
            None => {
                if self.config.processes != 1 {
                    return Err(RuntimeError::Comm(CommError::Unsupported(format!(
                        "{} 个进程需要 MPI 传输后端（feature \"mpi\"）",
                        self.config.processes
                    ))));
                }
                Box::new(LoopbackTransport)
            }
        };

        dispatch_stencil(self.config, transport, self.restore_path)
    }
}

fn dispatch_stencil(
    config: SimulationConfig,
    transport: Box<dyn Transport>,
    restore: Option<PathBuf>,
) -> RuntimeResult<Box<dyn DynSimulation>> {
    match config.stencil {
        StencilVariant::D1Q3 => dispatch_layout::<D1Q3>(config, transport, restore),
        StencilVariant::D2Q9 => dispatch_layout::<D2Q9>(config, transport, restore),
        StencilVariant::D3Q19 => dispatch_layout::<D3Q19>(config, transport, restore),
        StencilVariant::D3Q27 => dispatch_layout::<D3Q27>(config, transport, restore),
    }
}

fn dispatch_layout<L: Stencil>(
    config: SimulationConfig,
    transport: Box<dyn Transport>,
    restore: Option<PathBuf>,
) -> RuntimeResult<Box<dyn DynSimulation>> {
    match config.layout {
        LayoutVariant::Soa => dispatch_collision::<L, Soa>(config, transport, restore),
        LayoutVariant::Aos => dispatch_collision::<L, Aos>(config, transport, restore),
    }
}

fn dispatch_collision<L: Stencil, ML: MemoryLayout>(
    config: SimulationConfig,
    transport: Box<dyn Transport>,
    restore: Option<PathBuf>,
) -> RuntimeResult<Box<dyn DynSimulation>> {
    fn boxed<L: Stencil, ML: MemoryLayout, C: Collision<L, ML>>(
        config: SimulationConfig,
        transport: Box<dyn Transport>,
        restore: Option<PathBuf>,
    ) -> RuntimeResult<Box<dyn DynSimulation>> {
        Ok(Box::new(Routine::<L, ML, C>::new(config, transport, restore)?))
    }

    match config.collision {
        CollisionVariant::Bgk => boxed::<L, ML, Bgk<L>>(config, transport, restore),
        CollisionVariant::Elbm => boxed::<L, ML, Elbm<L>>(config, transport, restore),
        CollisionVariant::ApproachedElbm => {
            boxed::<L, ML, ApproachedElbm<L>>(config, transport, restore)
        }
        CollisionVariant::ForcedNrElbm => {
            boxed::<L, ML, ForcedNrElbm<L>>(config, transport, restore)
        }
        CollisionVariant::ForcedBnrElbm => {
            boxed::<L, ML, ForcedBnrElbm<L>>(config, transport, restore)
        }
    }
}

// ============================================================================
// 测试
// ============================================================================
