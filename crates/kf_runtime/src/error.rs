// crates/kf_runtime/src/error.rs

//! 运行时错误类型
//!
//! 配置 / 资源 / 传输错误在初始化或步进中向上传播并终止作业；
//! 数值恢复（熵求解回退）不是错误，走计数器。

use thiserror::Error;

/// 运行时结果类型
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// 运行时错误
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] kf_config::ConfigError),

    /// 通信错误
    #[error("通信错误: {0}")]
    Comm(#[from] kf_comm::CommError),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] kf_io::IoError),

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 错误描述
        message: String,
    },
}

impl RuntimeError {
    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
