// crates/kf_runtime/tests/taylor_green.rs

//! Taylor–Green 涡衰减
//!
//! 动能按 E(t) = E₀·exp(−2ν(kx² + ky²)t) 衰减，ν = cs²(τ − 1/2)。
//! 先空转若干步让声学瞬态衰减，再在两个采样点之间拟合衰减率，
//! 与解析值比对（2% 相对容差）。标量序列由分析写出器落盘，
//! 测试顺带覆盖分析路径。

use kf_config::{InitVelocityVariant, OutputFormat, SimulationConfig};
use kf_runtime::SimulationBuilder;
use std::path::PathBuf;

const NX: i32 = 32;
const STEPS: u64 = 250;
const SAMPLE_EVERY: u64 = 50;
const RELAXATION_TIME: f64 = 0.8;

fn read_energy_series(path: &PathBuf) -> Vec<(u64, f64)> {
    let content = std::fs::read_to_string(path).unwrap();
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| {
            let mut parts = line.split_whitespace();
            let iteration: u64 = parts.next().unwrap().parse().unwrap();
            let energy: f64 = parts.next().unwrap().parse().unwrap();
            (iteration, energy)
        })
        .collect()
}

#[test]
fn test_taylor_green_energy_decay_rate() {
    let directory =
        std::env::temp_dir().join(format!("kf_taylor_green_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&directory);

    let mut config = SimulationConfig::default();
    config.extent = [NX, NX, 1];
    config.relaxation_time = RELAXATION_TIME;
    config.end_iteration = STEPS;
    config.initial_velocity.variant = InitVelocityVariant::TaylorGreen;
    config.initial_velocity.value = [0.02, 0.0, 0.0];
    config.output.format = OutputFormat::None;
    config.output.analysis_step = SAMPLE_EVERY;
    config.output.directory = directory.clone();

    let mut sim = SimulationBuilder::new(config).build().unwrap();
    let summary = sim.run().unwrap();
    assert!(summary.difference_mass < 1e-10, "质量漂移 {:.3e}", summary.difference_mass);

    let series = read_energy_series(&directory.join("kineticflow_scalars.dat"));
    assert_eq!(series.len() as u64, STEPS / SAMPLE_EVERY + 1);

    // 瞬态后取两点拟合衰减率
    let (t1, e1) = series[1];
    let (t2, e2) = series[series.len() - 1];
    assert!(e1 > 0.0 && e2 > 0.0 && e2 < e1);

    let measured_rate = (e1 / e2).ln() / (t2 - t1) as f64;

    let viscosity = (RELAXATION_TIME - 0.5) / 3.0;
    let k = std::f64::consts::TAU / NX as f64;
    let expected_rate = 2.0 * viscosity * 2.0 * k * k;

    let relative_error = (measured_rate - expected_rate).abs() / expected_rate;
    assert!(
        relative_error < 0.02,
        "衰减率 {measured_rate:.6e}，期望 {expected_rate:.6e}（相对误差 {relative_error:.3}）"
    );

    let _ = std::fs::remove_dir_all(&directory);
}
