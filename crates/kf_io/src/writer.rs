// crates/kf_io/src/writer.rs

//! 写出器接口
//!
//! 外层例程消费的协议：按迭代号询问到期谓词，到期则
//! `open` → 逐场写出 → `close`。

use crate::error::IoError;

/// 写出周期表
///
/// 周期为 0 表示关闭；到期判定为 `iteration % step == 0`
/// （含第 0 次迭代，与初始状态写出一致）。
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteSchedule {
    /// 场写出周期
    pub write_step: u64,
    /// 分布备份周期
    pub backup_step: u64,
    /// 标量分析周期
    pub analysis_step: u64,
}

impl WriteSchedule {
    /// 本迭代是否写出场
    #[inline]
    pub fn is_written(&self, iteration: u64) -> bool {
        self.write_step > 0 && iteration % self.write_step == 0
    }

    /// 本迭代是否备份分布
    #[inline]
    pub fn is_backed_up(&self, iteration: u64) -> bool {
        self.backup_step > 0 && iteration % self.backup_step == 0
    }

    /// 本迭代是否做标量分析
    #[inline]
    pub fn is_analyzed(&self, iteration: u64) -> bool {
        self.analysis_step > 0 && iteration % self.analysis_step == 0
    }

    /// 本迭代是否需要存储逐单元场（三谓词之析取）
    #[inline]
    pub fn is_stored(&self, iteration: u64) -> bool {
        self.is_written(iteration) || self.is_backed_up(iteration) || self.is_analyzed(iteration)
    }
}

/// 场写出器
///
/// 实现自行决定磁盘布局；调用顺序固定为
/// `open` → `write_scalar_field` / `write_vector_field`* → `close`。
pub trait FieldWriter: Send {
    /// 本迭代是否写出
    fn is_written(&self, iteration: u64) -> bool;

    /// 打开本迭代的输出文件
    fn open(&mut self, iteration: u64) -> Result<(), IoError>;

    /// 写一个标量场（本地空间，X,Y,Z 行主序）
    fn write_scalar_field(&mut self, name: &str, data: &[f64]) -> Result<(), IoError>;

    /// 写一个向量场（按分量的 SoA 切片）
    fn write_vector_field(&mut self, name: &str, components: &[&[f64]]) -> Result<(), IoError>;

    /// 关闭输出文件
    fn close(&mut self) -> Result<(), IoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_predicates() {
        let s = WriteSchedule {
            write_step: 10,
            backup_step: 0,
            analysis_step: 4,
        };
        assert!(s.is_written(0));
        assert!(s.is_written(20));
        assert!(!s.is_written(15));
        assert!(!s.is_backed_up(0));
        assert!(!s.is_backed_up(10));
        assert!(s.is_analyzed(8));
        assert!(s.is_stored(8));
        assert!(s.is_stored(10));
        assert!(!s.is_stored(7));
    }

    #[test]
    fn test_disabled_schedule() {
        let s = WriteSchedule::default();
        for iter in 0..100 {
            assert!(!s.is_stored(iter));
        }
    }
}
