// crates/kf_io/src/dat.rs

//! ASCII 场写出器
//!
//! 每 (迭代, rank) 一个 `.dat` 文件，头部记录本地尺寸与全局
//! 偏移，场数据按 (X,Y,Z) 行主序逐行写出。下游拼接工具按偏移
//! 还原全局场。

use glam::IVec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::IoError;
use crate::writer::{FieldWriter, WriteSchedule};

/// ASCII 场写出器
pub struct DatWriter {
    directory: PathBuf,
    prefix: String,
    rank: i32,
    extent: IVec3,
    offset: IVec3,
    schedule: WriteSchedule,
    file: Option<BufWriter<File>>,
}

impl DatWriter {
    /// 创建写出器
    ///
    /// `extent` 为本 rank 的本地尺寸，`offset` 为其在全局空间的原点。
    pub fn new(
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        rank: i32,
        extent: IVec3,
        offset: IVec3,
        schedule: WriteSchedule,
    ) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            rank,
            extent,
            offset,
            schedule,
            file: None,
        }
    }

    /// 本迭代的输出路径
    pub fn path_for(&self, iteration: u64) -> PathBuf {
        self.directory
            .join(format!("{}_{:08}_r{}.dat", self.prefix, iteration, self.rank))
    }

    fn file_mut(&mut self) -> Result<&mut BufWriter<File>, IoError> {
        self.file.as_mut().ok_or(IoError::NotOpen)
    }
}

impl FieldWriter for DatWriter {
    fn is_written(&self, iteration: u64) -> bool {
        self.schedule.is_written(iteration)
    }

    fn open(&mut self, iteration: u64) -> Result<(), IoError> {
        std::fs::create_dir_all(&self.directory)?;
        let mut file = BufWriter::new(File::create(self.path_for(iteration))?);
        writeln!(file, "# kineticflow field output")?;
        writeln!(file, "# iteration {} rank {}", iteration, self.rank)?;
        writeln!(
            file,
            "# extent {} {} {} offset {} {} {}",
            self.extent.x, self.extent.y, self.extent.z, self.offset.x, self.offset.y, self.offset.z
        )?;
        self.file = Some(file);
        Ok(())
    }

    fn write_scalar_field(&mut self, name: &str, data: &[f64]) -> Result<(), IoError> {
        let file = self.file_mut()?;
        writeln!(file, "field {} 1 {}", name, data.len())?;
        for value in data {
            writeln!(file, "{:.17e}", value)?;
        }
        Ok(())
    }

    fn write_vector_field(&mut self, name: &str, components: &[&[f64]]) -> Result<(), IoError> {
        let len = components.first().map_or(0, |c| c.len());
        let file = self.file_mut()?;
        writeln!(file, "field {} {} {}", name, components.len(), len)?;
        for k in 0..len {
            for (d, component) in components.iter().enumerate() {
                if d > 0 {
                    write!(file, " ")?;
                }
                write!(file, "{:.17e}", component[k])?;
            }
            writeln!(file)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), IoError> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

// ============================================================================
// 测试
// ============================================================================
