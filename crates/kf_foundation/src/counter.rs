// crates/kf_foundation/src/counter.rs

//! 原子计数器
//!
//! 用于跨线程统计事件次数（如熵求解器回退到 BGK 的单元数）。
//! 仅做 Relaxed 计数，不承担同步职责。

use std::sync::atomic::{AtomicU64, Ordering};

/// 原子计数器
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// 创建零值计数器
    pub const fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// 增加计数
    #[inline]
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// 增加指定数量
    #[inline]
    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// 读取当前值
    #[inline]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// 重置为零
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}
