//! 圆盘上的点映射
//!
//! [`Transform`] 是 Möbius 变换 `z ↦ (az + b) / (cz + d)`，可选地先取复共轭以表示反射。
//! [`KleinMap`] 是庞加莱圆盘与 Klein 圆盘之间的投影。两者都实现 [`PointMap`]，
//! 共享对点、点列表和欧氏图形的作用方式。

use super::point::Point;
use crate::error::GeometryError;
use crate::euclid::{Arc, Line, Shape};
use crate::math::{near_zero, Complex, Point2, SATURATION_SCALE};
use serde::{Deserialize, Serialize};
use std::ops::Mul;
use tracing::{debug, trace};

/// 作用在圆盘上的点映射
pub trait PointMap {
    /// 映射一个欧氏坐标
    fn apply_to_tuple(&self, p: Point2) -> Point2;

    /// 映射一个双曲点，结果落在圆盘外时返回错误
    fn apply_to_point(&self, p: &Point) -> Result<Point, GeometryError> {
        Point::from_point2(self.apply_to_tuple(p.to_point2()))
    }

    /// 映射一个理想点
    ///
    /// `verify` 为 `true` 时要求结果仍在单位圆上。
    fn apply_to_ideal(&self, p: &Point, verify: bool) -> Result<Point, GeometryError> {
        let q = self.apply_to_tuple(p.to_point2());
        if verify && !near_zero(q.coords.norm() - 1.0) {
            return Err(GeometryError::InvalidGeometry(format!(
                "ideal point mapped off the boundary to ({}, {})",
                q.x, q.y
            )));
        }
        Ok(Point::ideal(q.y.atan2(q.x)))
    }

    /// 逐点映射，理想点与内部点分别处理
    fn apply_to_list(&self, points: &[Point], verify: bool) -> Result<Vec<Point>, GeometryError> {
        points
            .iter()
            .map(|p| {
                if p.is_ideal() {
                    self.apply_to_ideal(p, verify)
                } else {
                    self.apply_to_point(p)
                }
            })
            .collect()
    }

    fn apply_to_tuples(&self, points: &[Point2]) -> Vec<Point2> {
        points.iter().map(|p| self.apply_to_tuple(*p)).collect()
    }

    /// 映射一个欧氏图形
    ///
    /// 取图形上的三个采样点映射后重建；三点共线时退化为直线。
    fn apply_to_shape(&self, shape: &Shape) -> Shape {
        let (p1, p2, p3, closed) = match shape {
            Shape::Circle(c) => {
                let mut p1 = c.point_at_degree(0.0);
                let p2 = c.point_at_degree(90.0);
                let mut p3 = c.point_at_degree(180.0);
                if !c.cw {
                    std::mem::swap(&mut p1, &mut p3);
                }
                (p1, p2, p3, true)
            }
            _ => (shape.start_point(), shape.midpoint(), shape.end_point(), false),
        };
        let p1 = self.apply_to_tuple(p1);
        let p2 = self.apply_to_tuple(p2);
        let p3 = self.apply_to_tuple(p3);

        match Arc::from_points(p1, p3, p2, false) {
            Ok(arc) if closed => Shape::Circle(arc.circle()),
            Ok(arc) => Shape::Arc(arc),
            Err(err) => {
                trace!(%err, "transformed sample points are collinear, using a line");
                Shape::Line(Line::new(p1, p3))
            }
        }
    }
}

/// Möbius 变换（可带共轭）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: Complex,
    pub b: Complex,
    pub c: Complex,
    pub d: Complex,
    /// 先对输入取共轭（反向等距）
    pub conj: bool,
}

impl Transform {
    pub fn new(a: Complex, b: Complex, c: Complex, d: Complex, conj: bool) -> Self {
        Self { a, b, c, d, conj }
    }

    pub fn identity() -> Self {
        Self::new(
            Complex::new(1.0, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(1.0, 0.0),
            false,
        )
    }

    fn conj_coefficients(&self) -> Self {
        Self::new(self.a.conj(), self.b.conj(), self.c.conj(), self.d.conj(), self.conj)
    }

    /// 逆变换
    pub fn inverted(&self) -> Self {
        let m = if self.conj { self.conj_coefficients() } else { *self };
        Self::new(-m.d, m.b, m.c, -m.a, self.conj)
    }

    /// 与复共轭复合
    pub fn conjugate(&self) -> Self {
        let m = self.conj_coefficients();
        Self { conj: !self.conj, ..m }
    }

    /// 依次应用 `transforms`（第一个最先作用）的复合变换
    pub fn merge(transforms: &[Transform]) -> Self {
        let mut acc = Self::identity();
        let mut conj = false;
        for t in transforms.iter().rev() {
            let next = if conj { t.conj_coefficients() } else { *t };
            acc = acc * next;
            conj ^= t.conj;
        }
        Self { conj, ..acc }
    }

    /// 把 `origin` 移到原点的等距变换
    ///
    /// 给出 `new_x` 时再旋转，使 `new_x` 落在正实轴上。
    pub fn shift_origin(origin: Point2, new_x: Option<Point2>) -> Self {
        let z0 = Complex::new(origin.x, origin.y);
        let mut a = Complex::new(1.0, 0.0);
        let mut b = -z0;
        let c = -z0.conj();
        let d = Complex::new(1.0, 0.0);
        if let Some(new_x) = new_x {
            let z1 = Complex::new(new_x.x, new_x.y);
            let e = (c * z1 + d) / (a * z1 + b);
            let e = e / e.norm();
            a *= e;
            b *= e;
        }
        Self::new(a, b, c, d, false)
    }

    /// 把原点移到 `offset` 的等距变换，`rotation` 给出正实轴的像所指向的点
    pub fn translation(offset: Point2, rotation: Option<Point2>) -> Self {
        Self::shift_origin(offset, rotation).inverted()
    }

    /// 绕原点旋转（弧度）
    pub fn rotation(rad: f64) -> Self {
        Self::rotation_by(Complex::from_polar(1.0, rad))
    }

    pub fn rotation_degrees(deg: f64) -> Self {
        Self::rotation(deg.to_radians())
    }

    /// 旋转到向量 `(x, y)` 的方向
    pub fn rotation_to(vec: Point2) -> Self {
        let z = Complex::new(vec.x, vec.y);
        Self::rotation_by(z / z.norm())
    }

    fn rotation_by(e: Complex) -> Self {
        let zero = Complex::new(0.0, 0.0);
        Self::new(e, zero, zero, Complex::new(1.0, 0.0), false)
    }

    /// 关于过 `p1`、`p2` 的测地线的反射
    pub fn mirror(p1: Point2, p2: Point2) -> Self {
        let z1 = Complex::new(p1.x, p1.y);
        let z2 = Complex::new(p2.x, p2.y);
        let (z1c, z2c) = (z1.conj(), z2.conj());
        let a = z1 * z2 * z1c - z1 * z2 * z2c - z1 + z2;
        let b = z1 * z2c - z2 * z1c;
        Self::new(a, b, -b, a.conj(), true)
    }

    /// 关于实轴的反射
    pub fn mirror_x_axis() -> Self {
        Self::mirror(Point2::origin(), Point2::new(1.0, 0.0))
    }

    /// 圆盘到上半平面的 Cayley 映射
    pub fn disk_to_half() -> Self {
        let i = Complex::new(0.0, 1.0);
        let one = Complex::new(1.0, 0.0);
        Self::new(i, -one, -one, i, false)
    }

    pub fn half_to_disk() -> Self {
        Self::disk_to_half().inverted()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// 系数矩阵乘法（不处理共轭标志）
impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(
            self.a * rhs.a + self.b * rhs.c,
            self.a * rhs.b + self.b * rhs.d,
            self.c * rhs.a + self.d * rhs.c,
            self.c * rhs.b + self.d * rhs.d,
            self.conj,
        )
    }
}

impl PointMap for Transform {
    fn apply_to_tuple(&self, p: Point2) -> Point2 {
        let mut z = Complex::new(p.x, p.y);
        if self.conj {
            z = z.conj();
        }
        let numer = self.a * z + self.b;
        let denom = self.c * z + self.d;
        let zt = if near_zero(denom.norm()) {
            debug!(x = p.x, y = p.y, "transform denominator vanished, saturating");
            numer * SATURATION_SCALE
        } else {
            numer / denom
        };
        Point2::new(zt.re, zt.im)
    }
}

/// 庞加莱圆盘与 Klein 圆盘之间的投影
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KleinMap {
    /// `true` 时从 Klein 圆盘映射回庞加莱圆盘
    pub inverse: bool,
}

impl KleinMap {
    pub fn to_klein() -> Self {
        Self { inverse: false }
    }

    pub fn from_klein() -> Self {
        Self { inverse: true }
    }

    pub fn inverted(&self) -> Self {
        Self {
            inverse: !self.inverse,
        }
    }
}

impl PointMap for KleinMap {
    fn apply_to_tuple(&self, p: Point2) -> Point2 {
        let (x, y) = (p.x, p.y);
        if self.inverse {
            let denom = 1.0 + (1.0 - x * x - y * y).max(0.0).sqrt();
            Point2::new(x / denom, y / denom)
        } else {
            let denom = 1.0 + x * x + y * y;
            Point2::new(2.0 * x / denom, 2.0 * y / denom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::euclid::Circle;

    fn assert_point_eq(a: Point2, b: Point2) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_shift_origin() {
        let t = Transform::shift_origin(Point2::new(0.5, 0.0), None);
        assert_point_eq(t.apply_to_tuple(Point2::new(0.5, 0.0)), Point2::origin());

        let t = Transform::shift_origin(Point2::new(0.2, 0.3), Some(Point2::new(-0.4, 0.1)));
        assert_point_eq(t.apply_to_tuple(Point2::new(0.2, 0.3)), Point2::origin());
        let x = t.apply_to_tuple(Point2::new(-0.4, 0.1));
        assert!(x.x > 0.0);
        assert!(x.y.abs() < 1e-9);
    }

    #[test]
    fn test_inverse() {
        let transforms = [
            Transform::shift_origin(Point2::new(0.2, -0.3), Some(Point2::new(0.5, 0.5))),
            Transform::rotation_degrees(37.0),
            Transform::mirror(Point2::new(0.1, 0.2), Point2::new(-0.3, 0.4)),
            Transform::mirror_x_axis().conjugate(),
        ];
        let p = Point2::new(0.3, -0.1);
        for t in transforms {
            let back = t.inverted().apply_to_tuple(t.apply_to_tuple(p));
            assert_point_eq(back, p);
        }
    }

    #[test]
    fn test_mirror() {
        let t = Transform::mirror_x_axis();
        assert_point_eq(t.apply_to_tuple(Point2::new(0.3, 0.4)), Point2::new(0.3, -0.4));

        // 关于虚轴
        let t = Transform::mirror(Point2::origin(), Point2::new(0.0, 0.5));
        assert_point_eq(t.apply_to_tuple(Point2::new(0.3, 0.4)), Point2::new(-0.3, 0.4));

        // 测地线上的点保持不动
        let (p1, p2) = (Point2::new(0.1, 0.2), Point2::new(-0.3, 0.4));
        let t = Transform::mirror(p1, p2);
        assert_point_eq(t.apply_to_tuple(p1), p1);
        assert_point_eq(t.apply_to_tuple(p2), p2);
    }

    #[test]
    fn test_merge_applies_in_order() {
        let shift = Transform::shift_origin(Point2::new(0.5, 0.0), None);
        let rot = Transform::rotation_degrees(90.0);
        let mirror = Transform::mirror_x_axis();
        let p = Point2::new(0.1, 0.2);

        let merged = Transform::merge(&[shift, mirror, rot]);
        let expected = rot.apply_to_tuple(mirror.apply_to_tuple(shift.apply_to_tuple(p)));
        assert_point_eq(merged.apply_to_tuple(p), expected);

        let merged = Transform::merge(&[mirror, shift, mirror, rot]);
        let expected = rot.apply_to_tuple(
            mirror.apply_to_tuple(shift.apply_to_tuple(mirror.apply_to_tuple(p))),
        );
        assert_point_eq(merged.apply_to_tuple(p), expected);
        assert!(!merged.conj);
    }

    #[test]
    fn test_saturation() {
        let t = Transform::disk_to_half();
        // 分母 -z + i 在 z = i 时为零
        let q = t.apply_to_tuple(Point2::new(0.0, 1.0));
        assert!((q - Point2::new(-2.0 * SATURATION_SCALE, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_half_plane_round_trip() {
        let p = Point2::new(0.2, 0.7);
        let half = Transform::disk_to_half().apply_to_tuple(p);
        assert!(half.y > 0.0);
        let q = Transform::half_to_disk().apply_to_tuple(half);
        assert_point_eq(p, q);
    }

    #[test]
    fn test_apply_to_ideal() {
        let t = Transform::rotation_degrees(90.0);
        let q = t.apply_to_ideal(&Point::ideal(0.0), true).unwrap();
        assert!(q.is_ideal());
        assert!((q.theta() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

        let bad = Transform::new(
            Complex::new(0.5, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(1.0, 0.0),
            false,
        );
        assert!(bad.apply_to_ideal(&Point::ideal(0.0), true).is_err());
    }

    #[test]
    fn test_apply_to_list_mixed() {
        let t = Transform::rotation_degrees(180.0);
        let points = [Point::ideal(0.0), Point::from_euclid(0.5, 0.0).unwrap()];
        let mapped = t.apply_to_list(&points, false).unwrap();
        assert!(mapped[0].is_ideal());
        assert!(!mapped[1].is_ideal());
        assert_point_eq(mapped[1].to_point2(), Point2::new(-0.5, 0.0));
    }

    #[test]
    fn test_apply_to_shape_keeps_orientation() {
        let t = Transform::shift_origin(Point2::new(0.1, 0.1), None);
        for cw in [true, false] {
            let circle = Circle::with_orientation(Point2::new(0.2, 0.0), 0.3, cw);
            match t.apply_to_shape(&Shape::Circle(circle)) {
                Shape::Circle(c) => assert_eq!(c.cw, cw),
                other => panic!("expected a circle, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_apply_to_shape_line_fallback() {
        let t = Transform::rotation_degrees(90.0);
        let line = Shape::Line(Line::new(Point2::new(-0.5, 0.0), Point2::new(0.5, 0.0)));
        match t.apply_to_shape(&line) {
            Shape::Line(l) => {
                assert_point_eq(l.start, Point2::new(0.0, -0.5));
                assert_point_eq(l.end, Point2::new(0.0, 0.5));
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn test_klein_round_trip() {
        let p = Point2::new(0.3, -0.4);
        let k = KleinMap::to_klein().apply_to_tuple(p);
        assert!(k.coords.norm() > p.coords.norm());
        let back = KleinMap::to_klein().inverted().apply_to_tuple(k);
        assert_point_eq(back, p);
    }
}
