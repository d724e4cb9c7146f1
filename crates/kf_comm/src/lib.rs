// crates/kf_comm/src/lib.rs

//! KineticFlow Communication Layer
//!
//! X 向一维域分解下的 halo 交换：打包 → 非阻塞收发 → 等待 →
//! 解包。传输后端以 [`Transport`] trait 抽象：
//!
//! - [`LoopbackTransport`]：单进程回环，与 P = 1 的 MPI 语义一致
//! - `MpiTransport`（cargo feature `mpi`）：rsmpi 两侧非阻塞收发
//!
//! 协议本身与传输无关；对称内存后端（put-with-signal 一类）
//! 只需实现同一 trait。
//!
//! # 失败语义
//!
//! 消息长度不匹配说明配置错误，连同 MPI 错误一律按致命处理。

#![warn(clippy::all)]

pub mod communicator;
pub mod error;
pub mod staging;
pub mod topology;
pub mod transport;

#[cfg(feature = "mpi")]
pub mod mpi_transport;

pub use communicator::Communicator;
pub use error::CommError;
pub use staging::HaloStaging;
pub use topology::Topology;
pub use transport::{LoopbackTransport, Transport};

#[cfg(feature = "mpi")]
pub use mpi_transport::MpiTransport;
