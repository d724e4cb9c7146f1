// apps/kf_cli/src/main.rs

//! KineticFlow 命令行界面
//!
//! 格子 Boltzmann 模拟的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于最外层应用，遵循零泛型原则：仅使用
//! `SimulationConfig` 与 `Box<dyn DynSimulation>`，模板 / 布局 /
//! 碰撞变体的单态化分派全部发生在 kf_runtime::builder。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// KineticFlow 格子 Boltzmann 求解器命令行工具
#[derive(Parser)]
#[command(name = "kf_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "KineticFlow lattice Boltzmann solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行模拟
    Run(commands::run::RunArgs),
    /// 显示配置与分解信息
    Info(commands::info::InfoArgs),
    /// 校验配置文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
