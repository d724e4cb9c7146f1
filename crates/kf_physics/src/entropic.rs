// crates/kf_physics/src/entropic.rs

//! 熵平衡根查找
//!
//! 熵稳定碰撞对每个单元解标量方程
//!
//! ```text
//! H(f̂ − α·Δ) = H(f̂)，    H(g) = Σ_i g_i ln(g_i / w_i)
//! ```
//!
//! 求 α 的非平凡根（α = 0 是平凡根，迭代从上一单元的 α 出发并
//! 限制在 [α_min, α_max] 内以避开它）。残差及导数逐方向内联，
//! 无分配。
//!
//! 两个求解器：
//! - [`newton_raphson`]：裸 Newton 步，越界即判定发散
//! - [`bisection_newton_raphson`]：区间保持的 Newton / 二分混合，
//!   病态单元上用二分步替代会越界的 Newton 步

/// 残差 H(f̂ − αΔ) − H(f̂) 及其对 α 的导数
///
/// g_i ≤ 0 的项按极限 g ln g → 0 处理（只在 α 贴近 α_max 时出现）。
#[inline]
pub fn entropy_residual(
    f_forced: &[f64],
    f_noneq: &[f64],
    weights: &[f64],
    alpha: f64,
) -> (f64, f64) {
    let mut residual = 0.0;
    let mut derivative = 0.0;
    for ((&fh, &dn), &w) in f_forced.iter().zip(f_noneq).zip(weights) {
        let g = fh - alpha * dn;
        if g > 0.0 {
            let log_ratio = (g / w).ln();
            residual += g * log_ratio;
            derivative -= dn * (log_ratio + 1.0);
        }
        if fh > 0.0 {
            residual -= fh * (fh / w).ln();
        }
    }
    (residual, derivative)
}

/// 有界 Newton–Raphson
///
/// 从 `alpha` 出发迭代 α ← α − r/r′；步长低于 `tolerance` 视为收敛。
/// 导数消失或迭代离开 [alpha_min, alpha_max] 判定为不收敛，返回 None
/// （调用方回退 α = 2）。
pub fn newton_raphson(
    f_forced: &[f64],
    f_noneq: &[f64],
    weights: &[f64],
    mut alpha: f64,
    alpha_min: f64,
    alpha_max: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Option<f64> {
    alpha = alpha.clamp(alpha_min, alpha_max);
    for _ in 0..max_iterations {
        let (residual, derivative) = entropy_residual(f_forced, f_noneq, weights, alpha);
        if derivative.abs() < f64::MIN_POSITIVE {
            return None;
        }
        let step = residual / derivative;
        alpha -= step;
        if !(alpha_min..=alpha_max).contains(&alpha) || !alpha.is_finite() {
            return None;
        }
        if step.abs() < tolerance {
            return Some(alpha);
        }
    }
    None
}

/// 区间保持的 Newton–Raphson / 二分混合
///
/// 要求残差在 [alpha_min, alpha_max] 端点变号；每当 Newton 步要
/// 离开当前括号区间时改走二分步，否则按 Newton 收缩。无变号或
/// 迭代耗尽返回 None。
pub fn bisection_newton_raphson(
    f_forced: &[f64],
    f_noneq: &[f64],
    weights: &[f64],
    alpha: f64,
    alpha_min: f64,
    alpha_max: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Option<f64> {
    let (r_min, _) = entropy_residual(f_forced, f_noneq, weights, alpha_min);
    let (r_max, _) = entropy_residual(f_forced, f_noneq, weights, alpha_max);
    if r_min == 0.0 {
        return Some(alpha_min);
    }
    if r_max == 0.0 {
        return Some(alpha_max);
    }
    if r_min.signum() == r_max.signum() {
        return None;
    }

    // lo 指向残差为负的一端
    let (mut lo, mut hi) = if r_min < 0.0 {
        (alpha_min, alpha_max)
    } else {
        (alpha_max, alpha_min)
    };

    let mut alpha = alpha.clamp(alpha_min, alpha_max);
    for _ in 0..max_iterations {
        let (residual, derivative) = entropy_residual(f_forced, f_noneq, weights, alpha);
        if residual < 0.0 {
            lo = alpha;
        } else {
            hi = alpha;
        }

        let newton = if derivative.abs() < f64::MIN_POSITIVE {
            f64::NAN
        } else {
            alpha - residual / derivative
        };
        let inside = if lo < hi {
            (lo..=hi).contains(&newton)
        } else {
            (hi..=lo).contains(&newton)
        };
        let next = if newton.is_finite() && inside {
            newton
        } else {
            0.5 * (lo + hi)
        };

        if (next - alpha).abs() < tolerance {
            return Some(next);
        }
        alpha = next;
    }
    None
}

// ============================================================================
// 测试
// ============================================================================
