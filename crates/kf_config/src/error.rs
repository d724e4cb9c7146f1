// crates/kf_config/src/error.rs

//! 配置错误类型

use thiserror::Error;

/// 配置加载或校验失败
///
/// 配置错误属于致命错误：在初始化阶段向上传播，进程以非零状态退出。
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件 IO 失败
    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// 配置值非法
    #[error("配置项 {key} 的值 {value} 非法: {reason}")]
    InvalidValue {
        /// 配置项路径（如 "domain.extent"）
        key: String,
        /// 实际值
        value: String,
        /// 拒绝原因
        reason: String,
    },
}

impl ConfigError {
    /// 创建配置值非法错误
    pub fn invalid(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
