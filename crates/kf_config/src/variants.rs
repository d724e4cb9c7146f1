// crates/kf_config/src/variants.rs

//! 变体枚举
//!
//! 运行时可选的模拟变体。每个枚举对应求解器核心的一个单态化
//! 维度（模板、内存布局、碰撞算子）或一个热路径内联分支
//! （受力方案、体积力、初始条件）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// DdQq 速度模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StencilVariant {
    /// 一维三速
    D1Q3,
    /// 二维九速
    #[default]
    D2Q9,
    /// 三维十九速
    D3Q19,
    /// 三维二十七速
    D3Q27,
}

impl StencilVariant {
    /// 空间维度
    pub const fn dimension(self) -> usize {
        match self {
            Self::D1Q3 => 1,
            Self::D2Q9 => 2,
            Self::D3Q19 | Self::D3Q27 => 3,
        }
    }

    /// 离散速度个数
    pub const fn directions(self) -> usize {
        match self {
            Self::D1Q3 => 3,
            Self::D2Q9 => 9,
            Self::D3Q19 => 19,
            Self::D3Q27 => 27,
        }
    }
}

impl fmt::Display for StencilVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}Q{}", self.dimension(), self.directions())
    }
}

/// 分布函数内存布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Structure-of-Arrays
    #[default]
    Soa,
    /// Array-of-Structures
    Aos,
}

/// 碰撞算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionVariant {
    /// 单松弛时间 BGK
    #[default]
    Bgk,
    /// 熵稳定 LBM（小偏差捷径 + Newton–Raphson）
    Elbm,
    /// 熵稳定 LBM，α 用四阶闭式级数近似
    ApproachedElbm,
    /// 熵稳定 LBM，始终 Newton–Raphson
    ForcedNrElbm,
    /// 熵稳定 LBM，区间 Newton–Raphson / 二分混合
    ForcedBnrElbm,
}

impl CollisionVariant {
    /// 是否为熵稳定变体
    pub const fn is_entropic(self) -> bool {
        !matches!(self, Self::Bgk)
    }
}

/// 受力方案（体积力与碰撞的耦合方式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForcingSchemeVariant {
    /// Guo 二阶受力
    #[default]
    Guo,
    /// Shan–Chen 平衡速度移位
    ShanChen,
    /// 精确差分法
    ExactDifferenceMethod,
}

/// 体积力变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForceVariant {
    /// 无体积力
    #[default]
    None,
    /// 常数力
    Constant,
    /// 各轴正弦调制
    Sinusoidal,
    /// Kolmogorov 剪切力（F_x = A_x · sin(2π y / λ_y)）
    Kolmogorov,
}

/// 初始密度分布
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitDensityVariant {
    /// 均匀密度
    #[default]
    Homogeneous,
    /// 均匀密度，全局中心单元加倍
    Peak,
}

/// 初始速度分布
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitVelocityVariant {
    /// 均匀速度
    #[default]
    Homogeneous,
    /// Taylor–Green 涡（衰减验证用）
    TaylorGreen,
}

/// 边界处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryVariant {
    /// 全周期
    #[default]
    Periodic,
}

/// 场输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII .dat 文件
    #[default]
    Dat,
    /// 不输出场
    None,
}
