// crates/kf_io/src/series.rs

//! 标量分析时间序列
//!
//! 每到期一次追加一行（迭代号 + 各标量），文件首次写入时
//! 带表头。谱分析（能谱、FFT 旋度）不在本仓库范围内；此处
//! 只承接全域归约得到的标量。

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::IoError;
use crate::writer::WriteSchedule;

/// 标量序列写出器
pub struct SeriesWriter {
    path: PathBuf,
    columns: Vec<String>,
    schedule: WriteSchedule,
    file: Option<BufWriter<File>>,
}

impl SeriesWriter {
    /// 创建序列写出器
    pub fn new(
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        columns: &[&str],
        schedule: WriteSchedule,
    ) -> Self {
        let directory = directory.into();
        let path = directory.join(format!("{}_scalars.dat", prefix.into()));
        Self {
            path,
            columns: columns.iter().map(|s| s.to_string()).collect(),
            schedule,
            file: None,
        }
    }

    /// 本迭代是否分析
    #[inline]
    pub fn is_analyzed(&self, iteration: u64) -> bool {
        self.schedule.is_analyzed(iteration)
    }

    /// 序列文件路径
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// 追加一行
    pub fn append(&mut self, iteration: u64, values: &[f64]) -> Result<(), IoError> {
        if values.len() != self.columns.len() {
            return Err(IoError::Format(format!(
                "标量个数 {} 与列数 {} 不符",
                values.len(),
                self.columns.len()
            )));
        }

        if self.file.is_none() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let fresh = !self.path.exists();
            let mut file = BufWriter::new(
                OpenOptions::new().create(true).append(true).open(&self.path)?,
            );
            if fresh {
                write!(file, "# iteration")?;
                for column in &self.columns {
                    write!(file, " {}", column)?;
                }
                writeln!(file)?;
            }
            self.file = Some(file);
        }

        let file = self.file.as_mut().expect("file opened above");
        write!(file, "{}", iteration)?;
        for value in values {
            write!(file, " {:.17e}", value)?;
        }
        writeln!(file)?;
        file.flush()?;
        Ok(())
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_rows() {
        let dir = std::env::temp_dir().join(format!("kf_series_test_{}", std::process::id()));
        let mut w = SeriesWriter::new(
            &dir,
            "test",
            &["total_energy", "total_density"],
            WriteSchedule {
                analysis_step: 5,
                ..Default::default()
            },
        );
        assert!(w.is_analyzed(0));
        assert!(!w.is_analyzed(3));

        w.append(0, &[1.0, 2.0]).unwrap();
        w.append(5, &[0.9, 2.0]).unwrap();

        let content = std::fs::read_to_string(w.path()).unwrap();
        assert!(content.starts_with("# iteration total_energy total_density"));
        assert_eq!(content.lines().count(), 3);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_column_count_checked() {
        let dir = std::env::temp_dir().join(format!("kf_series_cols_{}", std::process::id()));
        let mut w = SeriesWriter::new(&dir, "test", &["a"], WriteSchedule::default());
        assert!(matches!(w.append(0, &[1.0, 2.0]), Err(IoError::Format(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
