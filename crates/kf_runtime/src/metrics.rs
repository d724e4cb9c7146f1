// crates/kf_runtime/src/metrics.rs

//! 运行时性能指标
//!
//! 分相计时（通信 / 计算）与全程累计，含 MLUPS
//! （每秒百万格子更新数）换算。

use std::time::Duration;

/// 单步分相耗时
///
/// `total = communication + computation`（步进核按同一对时间戳
/// 计算三者，等式精确成立）。
#[derive(Debug, Clone, Copy, Default)]
pub struct StepTimings {
    /// halo 交换 + 周期边界
    pub communication: Duration,
    /// 逐单元计算
    pub computation: Duration,
    /// 整步
    pub total: Duration,
}

/// 全程累计指标
#[derive(Debug, Clone, Copy, Default)]
pub struct RunMetrics {
    /// 通信累计秒数
    pub communication_time: f64,
    /// 计算累计秒数
    pub computation_time: f64,
    /// 整步累计秒数
    pub total_time: f64,
    /// 累计迭代数
    pub iterations: u64,
    /// 熵求解回退到 BGK 的单元次数
    pub bgk_fallbacks: u64,
}

impl RunMetrics {
    /// 累加一步
    pub fn accumulate(&mut self, timings: StepTimings) {
        self.communication_time += timings.communication.as_secs_f64();
        self.computation_time += timings.computation.as_secs_f64();
        self.total_time += timings.total.as_secs_f64();
        self.iterations += 1;
    }

    /// 每秒百万格子更新数
    ///
    /// 以全局体积计：MLUPS = 体积·迭代数 / (10⁶·总秒数)。
    pub fn mlups(&self, global_volume: usize) -> f64 {
        if self.total_time <= 0.0 || self.iterations == 0 {
            return 0.0;
        }
        (global_volume as f64 * self.iterations as f64) / (1.0e6 * self.total_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut m = RunMetrics::default();
        m.accumulate(StepTimings {
            communication: Duration::from_millis(2),
            computation: Duration::from_millis(8),
            total: Duration::from_millis(10),
        });
        m.accumulate(StepTimings {
            communication: Duration::from_millis(3),
            computation: Duration::from_millis(7),
            total: Duration::from_millis(10),
        });
        assert_eq!(m.iterations, 2);
        assert!((m.total_time - 0.02).abs() < 1e-12);
        assert!(
            (m.communication_time + m.computation_time - m.total_time).abs() < 1e-12,
            "分相耗时必须加和为总耗时"
        );
    }

    #[test]
    fn test_mlups() {
        let mut m = RunMetrics::default();
        m.iterations = 100;
        m.total_time = 1.0;
        // 10⁴ 单元 × 100 步 / 1 s = 1 MLUPS
        assert!((m.mlups(10_000) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mlups_guards_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.mlups(1000), 0.0);
    }
}
