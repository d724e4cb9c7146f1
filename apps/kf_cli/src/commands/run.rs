// apps/kf_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 从 JSON 配置（或默认值加命令行覆盖）构建求解器并执行完整
//! 运行。多进程运行需要以 `--features mpi` 构建并经 mpirun 启动；
//! 否则单进程回环传输。

use anyhow::{Context, Result};
use clap::Args;
use kf_config::SimulationConfig;
use kf_runtime::SimulationBuilder;
use std::path::PathBuf;
use tracing::info;

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（缺省用内置默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出目录（覆盖配置）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 结束迭代号（覆盖配置）
    #[arg(short = 'n', long)]
    pub end_iteration: Option<u64>,

    /// 工作线程数（覆盖配置）
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// 从备份文件续算
    #[arg(long)]
    pub restore: Option<PathBuf>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    // 命令行覆盖
    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(end_iteration) = args.end_iteration {
        config.end_iteration = end_iteration;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }

    let mut builder = SimulationBuilder::new(config.clone());

    // 多进程：初始化 MPI 并注入传输后端
    #[cfg(feature = "mpi")]
    if config.processes > 1 {
        let transport = kf_comm::MpiTransport::initialize(config.processes)
            .context("MPI 初始化失败")?;
        builder = builder.with_transport(Box::new(transport));
    }

    if let Some(restore) = args.restore {
        builder = builder.with_restore(restore);
    }

    let mut simulation = builder.build().context("构建模拟失败")?;
    info!("模拟: {}", simulation.name());

    let summary = simulation.run().context("模拟运行失败")?;

    info!(
        "完成: {} 步, {:.3} MLUPS, 相对质量差 {:.3e}",
        summary.iterations, summary.mlups, summary.difference_mass
    );
    Ok(())
}
