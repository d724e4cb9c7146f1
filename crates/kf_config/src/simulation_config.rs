// crates/kf_config/src/simulation_config.rs

//! SimulationConfig - 模拟配置
//!
//! 定义一次运行的全部参数。所有旋钮在启动时读取一次并冻结；
//! 运行中途不允许修改（尺寸与数值均在启动时固定）。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::variants::{
    BoundaryVariant, CollisionVariant, ForceVariant, ForcingSchemeVariant, InitDensityVariant,
    InitVelocityVariant, LayoutVariant, OutputFormat, StencilVariant,
};

/// 模拟配置
///
/// 使用 JSON 序列化，缺省字段取默认值。加载后必须通过
/// [`SimulationConfig::validate`]；非法配置在初始化阶段即为致命错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 速度模板
    #[serde(default)]
    pub stencil: StencilVariant,

    /// 分布函数内存布局
    #[serde(default)]
    pub layout: LayoutVariant,

    /// 全局格子边长 (L_x, L_y, L_z)；维度外的轴必须为 1
    #[serde(default = "default_extent")]
    pub extent: [i32; 3],

    /// MPI 进程数（X 向一维分解）
    #[serde(default = "default_processes")]
    pub processes: i32,

    /// 每进程工作线程数
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// 起始迭代号（断点续算时非零）
    #[serde(default)]
    pub start_iteration: u64,

    /// 结束迭代号
    #[serde(default = "default_end_iteration")]
    pub end_iteration: u64,

    /// 松弛时间 τ
    #[serde(default = "default_relaxation_time")]
    pub relaxation_time: f64,

    /// 碰撞算子
    #[serde(default)]
    pub collision: CollisionVariant,

    /// 受力方案
    #[serde(default)]
    pub forcing_scheme: ForcingSchemeVariant,

    /// 体积力
    #[serde(default)]
    pub force: ForceConfig,

    /// 初始密度
    #[serde(default)]
    pub initial_density: InitialDensityConfig,

    /// 初始速度
    #[serde(default)]
    pub initial_velocity: InitialVelocityConfig,

    /// 边界处理
    #[serde(default)]
    pub boundary: BoundaryVariant,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_extent() -> [i32; 3] {
    [16, 16, 1]
}
fn default_processes() -> i32 {
    1
}
fn default_threads() -> usize {
    1
}
fn default_end_iteration() -> u64 {
    100
}
fn default_relaxation_time() -> f64 {
    0.65
}

/// 体积力配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceConfig {
    /// 力变体
    #[serde(default)]
    pub variant: ForceVariant,

    /// 各轴振幅
    #[serde(default)]
    pub amplitude: [f64; 3],

    /// 各轴波长（正弦类变体使用）
    #[serde(default = "default_wave_length")]
    pub wave_length: [f64; 3],

    /// 谱强迫波数下界（谱强迫未编入库存变体，字段保留以兼容配置文件）
    #[serde(default)]
    pub wavenumber_min: u32,

    /// 谱强迫波数上界
    #[serde(default)]
    pub wavenumber_max: u32,
}

fn default_wave_length() -> [f64; 3] {
    [8.0, 8.0, 8.0]
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            variant: ForceVariant::None,
            amplitude: [0.0; 3],
            wave_length: default_wave_length(),
            wavenumber_min: 0,
            wavenumber_max: 0,
        }
    }
}

/// 初始密度配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialDensityConfig {
    /// 分布变体
    #[serde(default)]
    pub variant: InitDensityVariant,

    /// 基准密度 ρ₀
    #[serde(default = "default_density")]
    pub value: f64,
}

fn default_density() -> f64 {
    1.0
}

impl Default for InitialDensityConfig {
    fn default() -> Self {
        Self {
            variant: InitDensityVariant::Homogeneous,
            value: default_density(),
        }
    }
}

/// 初始速度配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InitialVelocityConfig {
    /// 分布变体
    #[serde(default)]
    pub variant: InitVelocityVariant,

    /// 基准速度 u₀（Taylor–Green 时取 x 分量为幅值）
    #[serde(default)]
    pub value: [f64; 3],
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 输出文件名前缀
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// 场输出格式
    #[serde(default)]
    pub format: OutputFormat,

    /// 场写出周期（迭代数，0 表示关闭）
    #[serde(default)]
    pub write_step: u64,

    /// 分布备份周期（迭代数，0 表示关闭）
    #[serde(default)]
    pub backup_step: u64,

    /// 标量分析周期（迭代数，0 表示关闭）
    #[serde(default)]
    pub analysis_step: u64,

    /// 是否写出密度场
    #[serde(default = "default_true")]
    pub write_density: bool,

    /// 是否写出速度场
    #[serde(default = "default_true")]
    pub write_velocity: bool,

    /// 是否写出体积力场
    #[serde(default)]
    pub write_force: bool,

    /// 是否写出熵参数 α 场
    #[serde(default)]
    pub write_alpha: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_prefix() -> String {
    "kineticflow".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            prefix: default_prefix(),
            format: OutputFormat::default(),
            write_step: 0,
            backup_step: 0,
            analysis_step: 0,
            write_density: true,
            write_velocity: true,
            write_force: false,
            write_alpha: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stencil: StencilVariant::default(),
            layout: LayoutVariant::default(),
            extent: default_extent(),
            processes: default_processes(),
            threads: default_threads(),
            start_iteration: 0,
            end_iteration: default_end_iteration(),
            relaxation_time: default_relaxation_time(),
            collision: CollisionVariant::default(),
            forcing_scheme: ForcingSchemeVariant::default(),
            force: ForceConfig::default(),
            initial_density: InitialDensityConfig::default(),
            initial_velocity: InitialVelocityConfig::default(),
            boundary: BoundaryVariant::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// 从文件加载配置并校验
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: SimulationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 校验配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim = self.stencil.dimension();

        // 边长验证
        for (k, &len) in self.extent.iter().enumerate() {
            if len < 1 {
                return Err(ConfigError::invalid("extent", len, "各轴边长必须为正"));
            }
            if k >= dim && len != 1 {
                return Err(ConfigError::invalid(
                    "extent",
                    len,
                    format!("{} 模板下第 {} 轴边长必须为 1", self.stencil, k),
                ));
            }
        }

        // 分解验证
        if self.processes < 1 {
            return Err(ConfigError::invalid("processes", self.processes, "进程数必须为正"));
        }
        if self.extent[0] % self.processes != 0 {
            return Err(ConfigError::invalid(
                "processes",
                self.processes,
                format!("X 向边长 {} 必须被进程数整除", self.extent[0]),
            ));
        }
        if self.extent[0] / self.processes < 2 {
            return Err(ConfigError::invalid(
                "processes",
                self.processes,
                "每 rank 的 X 向子域至少 2 个单元",
            ));
        }
        if self.threads < 1 {
            return Err(ConfigError::invalid("threads", self.threads, "线程数必须为正"));
        }

        // 迭代范围验证
        if self.end_iteration < self.start_iteration {
            return Err(ConfigError::invalid(
                "end_iteration",
                self.end_iteration,
                "结束迭代号不能小于起始迭代号",
            ));
        }

        // 松弛时间验证（ν = cs²(τ − 1/2) 必须为正）
        if !(self.relaxation_time > 0.5) {
            return Err(ConfigError::invalid(
                "relaxation_time",
                self.relaxation_time,
                "τ 必须大于 0.5",
            ));
        }

        // 初始密度验证
        if !(self.initial_density.value > 0.0) || !self.initial_density.value.is_finite() {
            return Err(ConfigError::invalid(
                "initial_density.value",
                self.initial_density.value,
                "初始密度必须为有限正数",
            ));
        }

        // 体积力验证
        if self.force.amplitude.iter().any(|a| !a.is_finite()) {
            return Err(ConfigError::invalid(
                "force.amplitude",
                format!("{:?}", self.force.amplitude),
                "振幅必须有限",
            ));
        }
        match self.force.variant {
            ForceVariant::Sinusoidal | ForceVariant::Kolmogorov => {
                if self.force.wave_length.iter().any(|&l| l == 0.0) {
                    return Err(ConfigError::invalid(
                        "force.wave_length",
                        format!("{:?}", self.force.wave_length),
                        "正弦类力的波长不能为零",
                    ));
                }
            }
            ForceVariant::None | ForceVariant::Constant => {}
        }

        Ok(())
    }

    /// 运动黏度 ν = cs²(τ − 1/2)，库存模板 cs² = 1/3
    #[inline]
    pub fn viscosity(&self) -> f64 {
        (self.relaxation_time - 0.5) / 3.0
    }

    /// 本步迭代总数
    #[inline]
    pub fn iteration_count(&self) -> u64 {
        self.end_iteration - self.start_iteration
    }
}

// ============================================================================
// 测试
// ============================================================================
