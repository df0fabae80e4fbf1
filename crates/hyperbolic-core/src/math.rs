//! 数学基础类型与数值容差
//!
//! 所有分类判断（相切、重合、共线、理想点）都基于同一个绝对容差 [`EPSILON`]。
//! 该容差是绝对值而非相对误差，调用方需要把坐标保持在单位圆盘附近
//! （约 `[-1, 1]`），否则判定结果会失去意义。

use nalgebra::Matrix2;

/// 二维点（欧氏坐标）
pub type Point2 = nalgebra::Point2<f64>;

/// 二维向量
pub type Vector2 = nalgebra::Vector2<f64>;

/// 复数（Möbius 变换系数）
pub type Complex = nalgebra::Complex<f64>;

/// 近零判定容差 `2^-30`
pub const EPSILON: f64 = 1.0 / (1u64 << 30) as f64;

/// Möbius 变换分母接近零时的饱和放大倍数
pub const SATURATION_SCALE: f64 = 1e5;

/// `|val| <= EPSILON`
#[inline]
pub fn near_zero(val: f64) -> bool {
    (-EPSILON..=EPSILON).contains(&val)
}

/// 关于圆 `(cx, cy, r)` 的反演
pub fn circ_inv(p: Point2, center: Point2, r: f64) -> Point2 {
    let v = p - center;
    let a = r * r / v.norm_squared();
    center + v * a
}

/// 关于单位圆的反演
pub fn unit_circ_inv(p: Point2) -> Point2 {
    circ_inv(p, Point2::origin(), 1.0)
}

/// 欧氏半径 → 双曲距离（沿过原点的径向）
#[inline]
pub fn radial_euclid_to_poincare(r: f64) -> f64 {
    2.0 * r.atanh()
}

/// 双曲距离 → 欧氏半径（沿过原点的径向）
#[inline]
pub fn radial_poincare_to_euclid(hr: f64) -> f64 {
    (hr / 2.0).tanh()
}

/// 把角度归一化到 `[0, 360)`
#[inline]
pub fn wrap_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// 把弧度归一化到 `[0, 2π)`
#[inline]
pub fn wrap_radians(rad: f64) -> f64 {
    rad.rem_euclid(std::f64::consts::TAU)
}

/// 求解 2x2 线性方程组 `[[a, b], [c, d]] * x = rhs`
///
/// 行列式接近零（奇异）时返回 `None`。
pub fn solve2(a: f64, b: f64, c: f64, d: f64, rhs: Vector2) -> Option<Vector2> {
    let m = Matrix2::new(a, b, c, d);
    let scale = a.abs().max(b.abs()).max(c.abs()).max(d.abs());
    if scale == 0.0 || near_zero(m.determinant() / (scale * scale)) {
        return None;
    }
    m.try_inverse().map(|inv| inv * rhs)
}

/// 判断两个向量是否与原点共线（任一为零向量时视为共线）
pub fn inline_with_origin(v1: Vector2, v2: Vector2) -> bool {
    let n1 = v1.norm();
    let n2 = v2.norm();
    if near_zero(n1) || near_zero(n2) {
        return true;
    }
    near_zero(v1.perp(&v2) / (n1 * n2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero() {
        assert!(near_zero(0.0));
        assert!(near_zero(EPSILON));
        assert!(near_zero(-EPSILON));
        assert!(!near_zero(2.0 * EPSILON));
        assert!(!near_zero(-2.0 * EPSILON));
        assert!(!near_zero(1.0));
    }

    #[test]
    fn test_circ_inv() {
        let p = circ_inv(Point2::new(1.0, 1.0), Point2::origin(), 1.0);
        assert!((p.x - 0.5).abs() < EPSILON);
        assert!((p.y - 0.5).abs() < EPSILON);

        let p = circ_inv(Point2::new(1.0, 1.0), Point2::new(2.0, 2.0), 2.0);
        assert!(p.x.abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);

        let p = unit_circ_inv(Point2::new(-1.0, -1.0));
        assert!((p.x + 0.5).abs() < EPSILON);
        assert!((p.y + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_radial_conversion() {
        for r in [0.0, 0.1, 0.5, 0.9, 0.99] {
            let back = radial_poincare_to_euclid(radial_euclid_to_poincare(r));
            assert!((back - r).abs() < 1e-12);
        }
    }

    #[test]
    fn test_solve2() {
        let x = solve2(2.0, 1.0, 1.0, 3.0, Vector2::new(3.0, 5.0)).unwrap();
        assert!((x.x - 0.8).abs() < 1e-12);
        assert!((x.y - 1.4).abs() < 1e-12);

        assert!(solve2(1.0, 2.0, 2.0, 4.0, Vector2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_inline_with_origin() {
        assert!(inline_with_origin(Vector2::new(1.0, 1.0), Vector2::new(-2.0, -2.0)));
        assert!(inline_with_origin(Vector2::zeros(), Vector2::new(0.3, 0.1)));
        assert!(!inline_with_origin(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)));
    }
}
