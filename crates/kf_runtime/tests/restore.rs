// crates/kf_runtime/tests/restore.rs

//! 断点续算
//!
//! 跑 10 步落备份，再从备份续跑到 20 步，结果必须与一口气跑
//! 20 步完全一致（备份是逐位快照，续算算术与直跑相同）。

use kf_config::{InitVelocityVariant, OutputFormat, SimulationConfig};
use kf_runtime::SimulationBuilder;
use std::path::PathBuf;

fn base_config(directory: &PathBuf) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.extent = [16, 16, 1];
    config.relaxation_time = 0.7;
    config.initial_velocity.variant = InitVelocityVariant::TaylorGreen;
    config.initial_velocity.value = [0.03, 0.0, 0.0];
    config.output.format = OutputFormat::None;
    config.output.directory = directory.clone();
    config
}

#[test]
fn test_restore_matches_straight_run() {
    let directory = std::env::temp_dir().join(format!("kf_restore_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&directory);

    // 直跑 20 步
    let mut straight = base_config(&directory);
    straight.end_iteration = 20;
    straight.output.write_step = 20;
    let mut sim = SimulationBuilder::new(straight).build().unwrap();
    sim.run().unwrap();
    let reference: Vec<f64> = sim.fields().density.as_slice().to_vec();
    let reference_ux: Vec<f64> = sim.fields().velocity[0].as_slice().to_vec();

    // 前半段：10 步并备份
    let mut first = base_config(&directory);
    first.end_iteration = 10;
    first.output.backup_step = 10;
    let mut sim = SimulationBuilder::new(first).build().unwrap();
    sim.run().unwrap();

    let backup = directory.join("kineticflow_00000010_r0.kfbk");
    assert!(backup.exists(), "备份文件未落盘: {}", backup.display());

    // 后半段：从备份续跑 10..=20
    let mut second = base_config(&directory);
    second.start_iteration = 10;
    second.end_iteration = 20;
    second.output.write_step = 20;
    let mut sim = SimulationBuilder::new(second)
        .with_restore(backup)
        .build()
        .unwrap();
    let summary = sim.run().unwrap();
    assert_eq!(summary.iterations, 10);

    let fields = sim.fields();
    for cell in 0..fields.volume() {
        assert_eq!(
            fields.density[cell], reference[cell],
            "单元 {cell} 的密度与直跑不一致"
        );
        assert_eq!(
            fields.velocity[0][cell], reference_ux[cell],
            "单元 {cell} 的 u_x 与直跑不一致"
        );
    }

    let _ = std::fs::remove_dir_all(&directory);
}
