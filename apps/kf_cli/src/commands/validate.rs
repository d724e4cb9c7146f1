// apps/kf_cli/src/commands/validate.rs

//! 校验配置文件命令

use anyhow::Result;
use clap::Args;
use kf_config::SimulationConfig;
use std::path::PathBuf;

/// 校验参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,
}

/// 执行校验命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    match SimulationConfig::from_file(&args.config) {
        Ok(config) => {
            println!("配置有效: {}", args.config.display());
            println!(
                "{} | {:?} | τ = {} | {} 步",
                config.stencil,
                config.collision,
                config.relaxation_time,
                config.iteration_count()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("配置无效: {}", e);
            std::process::exit(1);
        }
    }
}
