// crates/kf_io/src/lib.rs

//! KineticFlow IO Layer
//!
//! 外围写出器：ASCII 场文件、分布函数二进制备份、标量分析
//! 时间序列。各写出器自带"本迭代是否到期"谓词；外层例程把
//! 三个谓词的析取作为本步是否存储逐单元场的开关。
//!
//! 参考格式为 HDF5/XDMF 并行写出，不在本仓库范围内；DAT 是
//! 原生的 ASCII 回退格式，每 rank 写自己的超切片并在头部记录
//! 全局偏移。

#![warn(clippy::all)]

pub mod checkpoint;
pub mod dat;
pub mod error;
pub mod series;
pub mod writer;

pub use checkpoint::CheckpointWriter;
pub use dat::DatWriter;
pub use error::IoError;
pub use series::SeriesWriter;
pub use writer::{FieldWriter, WriteSchedule};
