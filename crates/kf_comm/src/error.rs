// crates/kf_comm/src/error.rs

//! 通信错误类型

use thiserror::Error;

/// halo 交换或归约失败
///
/// 传输错误属于致命错误：调用方不做逐 rank 善后，直接终止作业。
#[derive(Error, Debug)]
pub enum CommError {
    /// 消息长度与暂存缓冲区不一致（配置缺陷）
    #[error("消息长度不匹配: {name} 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 缓冲区名称
        name: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 进程拓扑与配置不一致
    #[error("进程拓扑不一致: 配置 {configured} 个进程, 实际 {actual} 个")]
    TopologyMismatch {
        /// 配置的进程数
        configured: i32,
        /// 运行时进程数
        actual: i32,
    },

    /// 传输后端不可用
    #[error("传输后端不可用: {0}")]
    Unsupported(String),

    /// 传输层故障
    #[error("传输层故障: {0}")]
    Transport(String),
}
