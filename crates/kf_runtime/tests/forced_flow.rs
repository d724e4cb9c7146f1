// crates/kf_runtime/tests/forced_flow.rs

//! 恒力注入
//!
//! 全周期盒内的均匀恒力没有耗散对手：每步给每单元注入动量
//! F（Guo 源项的一阶矩加平衡速度移位合计恰好为 F），裸速度
//! 线性增长 u(n) = n·F/ρ，存储的流体学速度再加半步修正
//! F/(2ρ)。对 D3Q27 验证该精确性质，同时覆盖三维模板与
//! 受力方案的动量核算。

use kf_config::{ForceVariant, ForcingSchemeVariant, OutputFormat, SimulationConfig, StencilVariant};
use kf_runtime::SimulationBuilder;

const STEPS: u64 = 100;
const FORCE_X: f64 = 1e-4;

fn forced_config(scheme: ForcingSchemeVariant) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.stencil = StencilVariant::D3Q27;
    config.extent = [4, 4, 4];
    config.relaxation_time = 0.9;
    config.end_iteration = STEPS;
    config.forcing_scheme = scheme;
    config.force.variant = ForceVariant::Constant;
    config.force.amplitude = [FORCE_X, 0.0, 0.0];
    config.output.format = OutputFormat::None;
    config.output.write_step = STEPS;
    config
}

#[test]
fn test_constant_force_uniform_acceleration() {
    for scheme in [
        ForcingSchemeVariant::Guo,
        ForcingSchemeVariant::ShanChen,
        ForcingSchemeVariant::ExactDifferenceMethod,
    ] {
        let mut sim = SimulationBuilder::new(forced_config(scheme)).build().unwrap();
        let summary = sim.run().unwrap();

        assert!(
            summary.difference_mass < 1e-12,
            "{scheme:?}: 质量漂移 {:.3e}",
            summary.difference_mass
        );

        // 第 n 步存储的矩取自前一步末的状态：u_hyd = (n − 1)·F/ρ + F/(2ρ)
        let expected = (STEPS as f64 - 0.5) * FORCE_X;
        let fields = sim.fields();
        for cell in 0..fields.volume() {
            let ux = fields.velocity[0][cell];
            assert!(
                (ux - expected).abs() < 1e-12,
                "{scheme:?}: 单元 {cell} 的 u_x = {ux:.12e}，期望 {expected:.12e}"
            );
            assert!(fields.velocity[1][cell].abs() < 1e-13);
            assert!(fields.velocity[2][cell].abs() < 1e-13);
            assert!((fields.force[0][cell] - FORCE_X).abs() < 1e-18);
        }
    }
}
