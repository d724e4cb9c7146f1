// crates/kf_io/src/error.rs

//! IO 错误类型

use thiserror::Error;

/// 写出或恢复失败
#[derive(Error, Debug)]
pub enum IoError {
    /// 底层 IO 失败
    #[error("IO 失败: {0}")]
    Io(#[from] std::io::Error),

    /// 文件尚未打开
    #[error("写出器未打开文件")]
    NotOpen,

    /// 备份文件格式错误
    #[error("备份格式错误: {0}")]
    Format(String),

    /// 备份内容与当前配置不一致
    #[error("备份不匹配: 期望 {expected}, 文件 {found}")]
    Mismatch {
        /// 期望值描述
        expected: String,
        /// 文件中的值
        found: String,
    },
}
