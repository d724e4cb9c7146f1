// crates/kf_lattice/src/stencil.rs

//! DdQq 速度模板
//!
//! 每个模板以零尺寸类型实现 [`Stencil`]，携带编译期常量表：
//! 离散速度（celerity，各分量 ∈ {-1,0,1}）、权重、声速平方与
//! 反方向置换。所有库存模板的 cs² = 1/3。
//!
//! 方向排序约定：静止方向排第 0 位，其后按"面 → 棱 → 角"分组，
//! 同组内正负方向成对相邻或按固定表置换（见各实现的 `OPPOSITE`）。

use glam::{DVec3, IVec3};

/// DdQq 模板常量表
///
/// 热路径按 `L::Q` 展开循环并以常量表索引；实现必须保证
/// `CELERITY`、`WEIGHT`、`OPPOSITE` 三表长度均为 `Q`。
pub trait Stencil: Copy + Clone + Send + Sync + 'static {
    /// 空间维度 d ∈ {1, 2, 3}
    const D: usize;
    /// 离散速度个数
    const Q: usize;
    /// 模板名称（如 "D2Q9"）
    const NAME: &'static str;
    /// 格子声速平方 cs²
    const CS2: f64 = 1.0 / 3.0;
    /// 1 / cs²
    const INV_CS2: f64 = 3.0;
    /// 离散速度向量表
    const CELERITY: &'static [IVec3];
    /// 权重表，Σ w_i = 1
    const WEIGHT: &'static [f64];
    /// 反方向置换：CELERITY[OPPOSITE[i]] = −CELERITY[i]
    const OPPOSITE: &'static [usize];
    /// halo 厚度向量（最大 celerity 模长，前 D 轴为 1，其余为 0）
    const HALO: IVec3;

    /// 第 i 个离散速度（整型，用于索引位移）
    #[inline]
    fn celerity(i: usize) -> IVec3 {
        Self::CELERITY[i]
    }

    /// 第 i 个离散速度（浮点，用于矩计算）
    #[inline]
    fn celerity_d(i: usize) -> DVec3 {
        Self::CELERITY[i].as_dvec3()
    }

    /// 第 i 个权重
    #[inline]
    fn weight(i: usize) -> f64 {
        Self::WEIGHT[i]
    }
}

// ============================================================================
// D1Q3
// ============================================================================

/// 一维三速模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D1Q3;

const C_D1Q3: [IVec3; 3] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
];

const W_D1Q3: [f64; 3] = [2.0 / 3.0, 1.0 / 6.0, 1.0 / 6.0];

const OPP_D1Q3: [usize; 3] = [0, 2, 1];

impl Stencil for D1Q3 {
    const D: usize = 1;
    const Q: usize = 3;
    const NAME: &'static str = "D1Q3";
    const CELERITY: &'static [IVec3] = &C_D1Q3;
    const WEIGHT: &'static [f64] = &W_D1Q3;
    const OPPOSITE: &'static [usize] = &OPP_D1Q3;
    const HALO: IVec3 = IVec3::new(1, 0, 0);
}

// ============================================================================
// D2Q9
// ============================================================================

/// 二维九速模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D2Q9;

const C_D2Q9: [IVec3; 9] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(1, 1, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(-1, -1, 0),
    IVec3::new(1, -1, 0),
];

const W_D2Q9: [f64; 9] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

const OPP_D2Q9: [usize; 9] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

impl Stencil for D2Q9 {
    const D: usize = 2;
    const Q: usize = 9;
    const NAME: &'static str = "D2Q9";
    const CELERITY: &'static [IVec3] = &C_D2Q9;
    const WEIGHT: &'static [f64] = &W_D2Q9;
    const OPPOSITE: &'static [usize] = &OPP_D2Q9;
    const HALO: IVec3 = IVec3::new(1, 1, 0);
}

// ============================================================================
// D3Q19
// ============================================================================

/// 三维十九速模板（面 + 棱）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D3Q19;

const C_D3Q19: [IVec3; 19] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
    IVec3::new(1, 1, 0),
    IVec3::new(-1, -1, 0),
    IVec3::new(1, 0, 1),
    IVec3::new(-1, 0, -1),
    IVec3::new(0, 1, 1),
    IVec3::new(0, -1, -1),
    IVec3::new(1, -1, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(1, 0, -1),
    IVec3::new(-1, 0, 1),
    IVec3::new(0, 1, -1),
    IVec3::new(0, -1, 1),
];

const W_D3Q19: [f64; 19] = [
    1.0 / 3.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 18.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

const OPP_D3Q19: [usize; 19] = [
    0, 2, 1, 4, 3, 6, 5, 8, 7, 10, 9, 12, 11, 14, 13, 16, 15, 18, 17,
];

impl Stencil for D3Q19 {
    const D: usize = 3;
    const Q: usize = 19;
    const NAME: &'static str = "D3Q19";
    const CELERITY: &'static [IVec3] = &C_D3Q19;
    const WEIGHT: &'static [f64] = &W_D3Q19;
    const OPPOSITE: &'static [usize] = &OPP_D3Q19;
    const HALO: IVec3 = IVec3::new(1, 1, 1);
}

// ============================================================================
// D3Q27
// ============================================================================

/// 三维二十七速模板（面 + 棱 + 角）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D3Q27;

const C_D3Q27: [IVec3; 27] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
    IVec3::new(1, 1, 0),
    IVec3::new(-1, -1, 0),
    IVec3::new(1, 0, 1),
    IVec3::new(-1, 0, -1),
    IVec3::new(0, 1, 1),
    IVec3::new(0, -1, -1),
    IVec3::new(1, -1, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(1, 0, -1),
    IVec3::new(-1, 0, 1),
    IVec3::new(0, 1, -1),
    IVec3::new(0, -1, 1),
    IVec3::new(1, 1, 1),
    IVec3::new(-1, -1, -1),
    IVec3::new(1, 1, -1),
    IVec3::new(-1, -1, 1),
    IVec3::new(1, -1, 1),
    IVec3::new(-1, 1, -1),
    IVec3::new(-1, 1, 1),
    IVec3::new(1, -1, -1),
];

const W_D3Q27: [f64; 27] = [
    8.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    2.0 / 27.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 54.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
    1.0 / 216.0,
];

const OPP_D3Q27: [usize; 27] = [
    0, 2, 1, 4, 3, 6, 5, 8, 7, 10, 9, 12, 11, 14, 13, 16, 15, 18, 17, 20, 19, 22, 21, 24, 23, 26,
    25,
];

impl Stencil for D3Q27 {
    const D: usize = 3;
    const Q: usize = 27;
    const NAME: &'static str = "D3Q27";
    const CELERITY: &'static [IVec3] = &C_D3Q27;
    const WEIGHT: &'static [f64] = &W_D3Q27;
    const OPPOSITE: &'static [usize] = &OPP_D3Q27;
    const HALO: IVec3 = IVec3::new(1, 1, 1);
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn check_tables<L: Stencil>() {
        assert_eq!(L::CELERITY.len(), L::Q);
        assert_eq!(L::WEIGHT.len(), L::Q);
        assert_eq!(L::OPPOSITE.len(), L::Q);

        // Σ w_i = 1
        let wsum: f64 = L::WEIGHT.iter().sum();
        assert!((wsum - 1.0).abs() < 1e-15, "{}: Σw = {}", L::NAME, wsum);

        // Σ w_i c_i = 0
        let mut m1 = DVec3::ZERO;
        for i in 0..L::Q {
            m1 += L::weight(i) * L::celerity_d(i);
        }
        assert!(m1.length() < 1e-15, "{}: Σwc = {:?}", L::NAME, m1);

        // Σ w_i c_iα c_iβ = cs² δ_αβ（仅前 D 轴非平凡）
        for a in 0..L::D {
            for b in 0..L::D {
                let mut m2 = 0.0;
                for i in 0..L::Q {
                    m2 += L::weight(i) * L::celerity_d(i)[a] * L::celerity_d(i)[b];
                }
                let expected = if a == b { L::CS2 } else { 0.0 };
                assert!(
                    (m2 - expected).abs() < 1e-15,
                    "{}: M2[{}][{}] = {}",
                    L::NAME,
                    a,
                    b,
                    m2
                );
            }
        }

        // 反方向置换是对合且取负
        for i in 0..L::Q {
            let j = L::OPPOSITE[i];
            assert_eq!(L::OPPOSITE[j], i);
            assert_eq!(L::celerity(j), -L::celerity(i));
        }

        // 分量落在 {-1, 0, 1}，且超出 D 的轴恒为零
        for i in 0..L::Q {
            let c = L::celerity(i);
            for k in 0..3 {
                assert!(c[k].abs() <= 1);
                if k >= L::D {
                    assert_eq!(c[k], 0);
                }
            }
        }
    }

    #[test]
    fn test_d1q3() {
        check_tables::<D1Q3>();
    }

    #[test]
    fn test_d2q9() {
        check_tables::<D2Q9>();
    }

    #[test]
    fn test_d3q19() {
        check_tables::<D3Q19>();
    }

    #[test]
    fn test_d3q27() {
        check_tables::<D3Q27>();
    }

    #[test]
    fn test_halo_matches_dimension() {
        assert_eq!(D1Q3::HALO, IVec3::new(1, 0, 0));
        assert_eq!(D2Q9::HALO, IVec3::new(1, 1, 0));
        assert_eq!(D3Q19::HALO, IVec3::new(1, 1, 1));
        assert_eq!(D3Q27::HALO, IVec3::new(1, 1, 1));
    }
}
