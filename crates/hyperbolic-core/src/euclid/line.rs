//! 有向直线
//!
//! [`Line`] 由两个点确定，方向从 `start` 指向 `end`；作为线段使用时两点即为端点，
//! 作为无限长直线使用时只关心其方向与位置。

use super::circle::Circle;
use super::Shape;
use crate::error::GeometryError;
use crate::math::{near_zero, Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// 直线（或线段）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// 方向角（弧度）
    pub fn atan2(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 单位方向向量
    pub fn direction(&self) -> Vector2 {
        (self.end - self.start).normalize()
    }

    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// 平行（同向或反向）
    pub fn parallel_to(&self, other: &Line) -> bool {
        angle_near_multiple(self.atan2() - other.atan2(), PI)
    }

    /// 同向平行
    pub fn parallel_dir_to(&self, other: &Line) -> bool {
        angle_near_multiple(self.atan2() - other.atan2(), TAU)
    }

    /// 反向平行
    pub fn antiparallel_to(&self, other: &Line) -> bool {
        angle_near_multiple(self.atan2() - other.atan2() - PI, TAU)
    }

    /// 假设两点在直线上，返回以它们为端点的新线段
    pub fn trimmed(&self, start: Point2, end: Point2) -> Self {
        Self::new(start, end)
    }

    /// 过点 `point` 且垂直于自身的直线
    ///
    /// 起点为 `point` 在自身上的垂足，方向为自身方向逆时针旋转 90°（数学坐标系），
    /// 长度为 `length`。
    pub fn make_perpendicular(&self, point: Point2, length: f64) -> Self {
        let dir = self.direction();
        let foot = self.start + dir * (point - self.start).dot(&dir);
        let normal = Vector2::new(-dir.y, dir.x);
        Self::new(foot, foot + normal * length)
    }

    /// 过点 `point` 且平行于自身的直线，起点为 `point`
    pub fn make_parallel(&self, point: Point2, length: f64) -> Self {
        Self::new(point, point + self.direction() * length)
    }

    /// 假设点已在无限长直线上，判断它是否在两端点之间
    pub fn is_point_on_segment(&self, point: Point2) -> bool {
        let k1 = (point - self.start).dot(&(self.end - self.start));
        let k2 = (point - self.end).dot(&(self.start - self.end));
        (k1 >= 0.0 || near_zero(k1)) && (k2 >= 0.0 || near_zero(k2))
    }

    /// 两个圆（点视为零半径圆）的根轴
    ///
    /// 任一输入为直线时直接返回该直线；两条直线或同心圆没有根轴。
    pub fn radical_axis(a: &Shape, b: &Shape) -> Result<Self, GeometryError> {
        match (a.as_circle(), b.as_circle()) {
            (Some(c1), Some(c2)) => Self::radical_axis_of_circles(&c1, &c2),
            (None, Some(_)) => a
                .as_line()
                .ok_or_else(|| GeometryError::InvalidGeometry("unsupported shape".into())),
            (Some(_), None) => b
                .as_line()
                .ok_or_else(|| GeometryError::InvalidGeometry("unsupported shape".into())),
            (None, None) => Err(GeometryError::InvalidGeometry(
                "no radical axis exists for two lines".into(),
            )),
        }
    }

    fn radical_axis_of_circles(c1: &Circle, c2: &Circle) -> Result<Self, GeometryError> {
        let d = (c2.center - c1.center).norm();
        if near_zero(d) {
            return Err(GeometryError::InvalidGeometry("circles are concentric".into()));
        }
        let d1 = (d * d + c1.radius * c1.radius - c2.radius * c2.radius) / (2.0 * d);
        let m = c1.center + (c2.center - c1.center) * (d1 / d);
        Ok(Line::new(c1.center, c2.center).make_perpendicular(m, 1.0))
    }
}

/// 过原点的直线，由另一点确定方向
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginLine {
    pub point: Point2,
}

impl OriginLine {
    pub fn new(point: Point2) -> Self {
        Self { point }
    }

    pub fn to_line(&self) -> Line {
        Line::new(Point2::origin(), self.point)
    }

    pub fn reverse(&mut self) {
        self.point = Point2::from(-self.point.coords);
    }

    pub fn reversed(&self) -> Self {
        Self::new(Point2::from(-self.point.coords))
    }
}

/// `angle` 是否近似为 `modulus` 的整数倍
pub(crate) fn angle_near_multiple(angle: f64, modulus: f64) -> bool {
    let m = angle.rem_euclid(modulus);
    near_zero(m) || near_zero(modulus - m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    #[test]
    fn test_reverse() {
        let mut line = Line::from_coords(1.0, 1.0, -1.0, -1.0);
        line.reverse();
        assert_eq!(line, Line::from_coords(-1.0, -1.0, 1.0, 1.0));
        assert_eq!(line.reversed(), Line::from_coords(1.0, 1.0, -1.0, -1.0));
    }

    #[test]
    fn test_atan2_and_length() {
        let line = Line::from_coords(0.0, 0.0, 1.0, 1.0);
        assert!((line.atan2() - PI / 4.0).abs() < EPSILON);
        assert!((line.length() - 2f64.sqrt()).abs() < EPSILON);
        assert!(Line::from_coords(0.0, 0.0, 0.0, 0.0).atan2().abs() < EPSILON);
    }

    #[test]
    fn test_parallel_tests() {
        let a = Line::from_coords(0.0, 0.0, 1.0, 0.0);
        let b = Line::from_coords(0.0, 1.0, 2.0, 1.0);
        let c = b.reversed();
        assert!(a.parallel_to(&b));
        assert!(a.parallel_to(&c));
        assert!(a.parallel_dir_to(&b));
        assert!(!a.parallel_dir_to(&c));
        assert!(a.antiparallel_to(&c));
        assert!(!a.antiparallel_to(&b));
        assert!(!a.parallel_to(&Line::from_coords(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_make_perpendicular() {
        let line = Line::from_coords(0.0, 0.0, 2.0, 0.0);
        let perp = line.make_perpendicular(Point2::new(1.0, 0.5), 1.0);
        assert!((perp.start - Point2::new(1.0, 0.0)).norm() < EPSILON);
        assert!((perp.end - Point2::new(1.0, 1.0)).norm() < EPSILON);

        // 点恰好在起点时仍然给出同一方向
        let perp = line.make_perpendicular(Point2::new(0.0, 0.0), 1.0);
        assert!((perp.end - Point2::new(0.0, 1.0)).norm() < EPSILON);
    }

    #[test]
    fn test_make_parallel() {
        let line = Line::from_coords(0.0, 0.0, 2.0, 0.0);
        let par = line.make_parallel(Point2::new(1.0, 0.5), 1.0);
        assert!(par.parallel_dir_to(&line));
        assert!((par.start - Point2::new(1.0, 0.5)).norm() < EPSILON);
    }

    #[test]
    fn test_point_on_segment() {
        let line = Line::from_coords(0.0, 0.0, 1.0, 0.0);
        assert!(line.is_point_on_segment(Point2::new(0.5, 0.0)));
        assert!(line.is_point_on_segment(Point2::new(0.0, 0.0)));
        assert!(line.is_point_on_segment(Point2::new(1.0, 0.0)));
        assert!(!line.is_point_on_segment(Point2::new(1.5, 0.0)));
        assert!(!line.is_point_on_segment(Point2::new(-0.5, 0.0)));
    }

    #[test]
    fn test_radical_axis() {
        let c1 = Shape::Circle(Circle::new(Point2::new(-1.0, 0.0), 1.0));
        let c2 = Shape::Circle(Circle::new(Point2::new(1.0, 0.0), 1.0));
        let axis = Line::radical_axis(&c1, &c2).unwrap();
        // 等半径圆的根轴是中垂线 x = 0
        assert!(axis.start.x.abs() < EPSILON);
        assert!(axis.end.x.abs() < EPSILON);

        let line = Shape::Line(Line::from_coords(0.0, 0.0, 1.0, 1.0));
        assert_eq!(Line::radical_axis(&line, &c1).unwrap(), Line::from_coords(0.0, 0.0, 1.0, 1.0));
        assert!(Line::radical_axis(&line, &line).is_err());
        assert!(Line::radical_axis(&c1, &c1).is_err());
    }

    #[test]
    fn test_origin_line() {
        let mut ol = OriginLine::new(Point2::new(0.5, 0.25));
        assert_eq!(ol.to_line().start, Point2::origin());
        ol.reverse();
        assert_eq!(ol.point, Point2::new(-0.5, -0.25));
        assert_eq!(ol.reversed().point, Point2::new(0.5, 0.25));
    }
}
