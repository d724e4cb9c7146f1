// crates/kf_io/src/checkpoint.rs

//! 分布函数备份
//!
//! 断点续算用的二进制快照：本地空间的全部总体按方向号分组
//! 写出（q 个数据集，每个 volume 个 f64）。
//!
//! # 文件格式 (v1)
//!
//! ```text
//! [魔数: 4 bytes] "KFBK"
//! [版本: u32]
//! [迭代号: u64]
//! [方向数 q: u64]
//! [单元数 volume: u64]
//! [数据集 0: volume × f64]
//! ...
//! [数据集 q−1: volume × f64]
//! ```
//!
//! 数值按本机字节序写出；备份只在同构机群内消费。

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::IoError;
use crate::writer::WriteSchedule;

const MAGIC: &[u8; 4] = b"KFBK";
const VERSION: u32 = 1;

/// 分布备份写出 / 恢复器
#[derive(Debug, Clone)]
pub struct CheckpointWriter {
    directory: PathBuf,
    prefix: String,
    rank: i32,
    schedule: WriteSchedule,
}

impl CheckpointWriter {
    /// 创建备份器
    pub fn new(
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        rank: i32,
        schedule: WriteSchedule,
    ) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            rank,
            schedule,
        }
    }

    /// 本迭代是否备份
    #[inline]
    pub fn is_backed_up(&self, iteration: u64) -> bool {
        self.schedule.is_backed_up(iteration)
    }

    /// 本迭代的备份路径
    pub fn path_for(&self, iteration: u64) -> PathBuf {
        self.directory
            .join(format!("{}_{:08}_r{}.kfbk", self.prefix, iteration, self.rank))
    }

    /// 写出备份
    ///
    /// `populations` 为按方向分组的本地空间数据：长度 q·volume，
    /// 方向 i 的数据集占 `[i·volume, (i+1)·volume)`。
    pub fn write_distribution(
        &self,
        iteration: u64,
        q: usize,
        volume: usize,
        populations: &[f64],
    ) -> Result<PathBuf, IoError> {
        if populations.len() != q * volume {
            return Err(IoError::Format(format!(
                "数据长度 {} ≠ q·volume = {}",
                populations.len(),
                q * volume
            )));
        }

        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(iteration);
        let mut file = BufWriter::new(File::create(&path)?);

        file.write_all(MAGIC)?;
        file.write_all(&VERSION.to_le_bytes())?;
        file.write_all(&iteration.to_le_bytes())?;
        file.write_all(&(q as u64).to_le_bytes())?;
        file.write_all(&(volume as u64).to_le_bytes())?;
        file.write_all(bytemuck::cast_slice(populations))?;
        file.flush()?;
        Ok(path)
    }

    /// 从备份恢复
    ///
    /// 校验魔数、版本与尺寸；返回 (迭代号, 按方向分组的数据)。
    pub fn read_distribution(
        path: &Path,
        expected_q: usize,
        expected_volume: usize,
    ) -> Result<(u64, Vec<f64>), IoError> {
        let mut file = BufReader::new(File::open(path)?);

        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(IoError::Format("备份魔数不符".to_string()));
        }

        let version = read_u32(&mut file)?;
        if version != VERSION {
            return Err(IoError::Mismatch {
                expected: format!("版本 {}", VERSION),
                found: format!("版本 {}", version),
            });
        }

        let iteration = read_u64(&mut file)?;
        let q = read_u64(&mut file)? as usize;
        let volume = read_u64(&mut file)? as usize;
        if q != expected_q || volume != expected_volume {
            return Err(IoError::Mismatch {
                expected: format!("q = {}, volume = {}", expected_q, expected_volume),
                found: format!("q = {}, volume = {}", q, volume),
            });
        }

        let mut populations = vec![0.0f64; q * volume];
        file.read_exact(bytemuck::cast_slice_mut(&mut populations))?;
        Ok((iteration, populations))
    }
}

fn read_u32(reader: &mut impl Read) -> Result<u32, IoError> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_u64(reader: &mut impl Read) -> Result<u64, IoError> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

// ============================================================================
// 测试
// ============================================================================
