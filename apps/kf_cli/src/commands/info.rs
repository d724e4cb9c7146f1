// apps/kf_cli/src/commands/info.rs

//! 显示配置与分解信息命令

use anyhow::{Context, Result};
use clap::Args;
use kf_config::SimulationConfig;
use std::path::PathBuf;

/// 信息参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径（缺省用内置默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    println!("===== 解析后的配置 =====");
    println!("{}", serde_json::to_string_pretty(&config)?);

    let d = config.stencil.dimension();
    let q = config.stencil.directions();
    println!("===== 格子 =====");
    println!("模板        : {}", config.stencil);
    println!("维度 / 方向 : {} / {}", d, q);
    println!("cs²         : 1/3");
    println!("黏度 ν      : {}", config.viscosity());

    let volume: i64 = config.extent.iter().map(|&l| l as i64).product();
    println!("===== 分解 =====");
    println!("全局体积    : {} 单元", volume);
    println!(
        "每 rank     : {} x {} x {} 单元",
        config.extent[0] / config.processes,
        config.extent[1],
        config.extent[2]
    );
    for rank in 0..config.processes {
        let x0 = rank * config.extent[0] / config.processes;
        let x1 = (rank + 1) * config.extent[0] / config.processes;
        println!("rank {:>3}    : X ∈ [{}, {})", rank, x0, x1);
    }
    Ok(())
}
