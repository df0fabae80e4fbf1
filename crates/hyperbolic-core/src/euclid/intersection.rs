//! 欧氏图元求交
//!
//! 每个求交函数都返回 [`Intersection`]，用不同的变体区分两个交点、相切、重合与相离。
//! 输入直线长度为零时返回 [`GeometryError::InsufficientPrecision`]。
//!
//! 两个交点的顺序遵循统一约定：在第一个（较小的）图形上，从第一个交点沿角度增大方向
//! 扫到第二个交点的那段弧位于第二个图形内侧。调用方据此可以直接构造方向正确的圆弧。

use super::circle::Circle;
use super::line::{angle_near_multiple, Line};
use super::Shape;
use crate::error::GeometryError;
use crate::math::{near_zero, solve2, Point2, Vector2};
use std::f64::consts::PI;
use tracing::trace;

/// 求交结果
#[derive(Debug, Clone, PartialEq)]
pub enum Intersection {
    /// 一般情况
    TwoPoints(Point2, Point2),
    /// 相切
    OnePoint(Point2),
    /// 两图形重合，携带其中一个
    Coincident(Shape),
    /// 无交点
    None,
}

impl Intersection {
    /// 有限个交点；重合时返回 [`GeometryError::InfiniteIntersections`]
    pub fn points(&self) -> Result<Vec<Point2>, GeometryError> {
        match self {
            Intersection::TwoPoints(p1, p2) => Ok(vec![*p1, *p2]),
            Intersection::OnePoint(p) => Ok(vec![*p]),
            Intersection::None => Ok(Vec::new()),
            Intersection::Coincident(shape) => {
                Err(GeometryError::InfiniteIntersections(Box::new(shape.clone())))
            }
        }
    }

    /// 恰好两个交点，其余情况转换为对应的错误
    pub fn two_points(&self) -> Result<(Point2, Point2), GeometryError> {
        match self {
            Intersection::TwoPoints(p1, p2) => Ok((*p1, *p2)),
            Intersection::OnePoint(p) => Err(GeometryError::SingleIntersection { x: p.x, y: p.y }),
            Intersection::None => Err(GeometryError::NoIntersection),
            Intersection::Coincident(shape) => {
                Err(GeometryError::InfiniteIntersections(Box::new(shape.clone())))
            }
        }
    }

    /// 恰好一个交点
    pub fn one_point(&self) -> Result<Point2, GeometryError> {
        match self {
            Intersection::OnePoint(p) => Ok(*p),
            Intersection::TwoPoints(..) => Err(GeometryError::InvalidGeometry(
                "expected a single intersection, found two".into(),
            )),
            Intersection::None => Err(GeometryError::NoIntersection),
            Intersection::Coincident(shape) => {
                Err(GeometryError::InfiniteIntersections(Box::new(shape.clone())))
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Intersection::None)
    }
}

/// 圆与圆求交
pub fn circle_circle(c1: &Circle, c2: &Circle) -> Result<Intersection, GeometryError> {
    let original = *c1;
    // circ1 始终是较小的圆
    let (circ1, circ2, swapped) = if c1.radius > c2.radius {
        (c2, c1, true)
    } else {
        (c1, c2, false)
    };

    let d_vec = circ1.center - circ2.center;
    let d = d_vec.norm();
    let (r1, r2) = (circ1.radius, circ2.radius);

    if near_zero(d) {
        if near_zero(r1 - r2) {
            return Ok(Intersection::Coincident(Shape::Circle(original)));
        }
        // 同心
        return Ok(Intersection::None);
    }

    if near_zero(r1 + r2 - d) || near_zero(r2 - r1 - d) {
        return Ok(Intersection::OnePoint(circ2.center + d_vec / d * r2));
    }
    if d > r1 + r2 || d < r2 - r1 {
        return Ok(Intersection::None);
    }

    // 余弦定理，先把参数夹到 [-1, 1] 吸收舍入误差
    let t = ((r1 * r1 - d * d - r2 * r2) / (-2.0 * d * r2)).clamp(-1.0, 1.0);
    let diff = t.acos();
    let center_rad = d_vec.y.atan2(d_vec.x);

    let i1 = circ2.point_at_angle(center_rad - diff);
    let i2 = circ2.point_at_angle(center_rad + diff);

    if swapped {
        Ok(Intersection::TwoPoints(i1, i2))
    } else {
        Ok(Intersection::TwoPoints(i2, i1))
    }
}

/// 圆与直线求交，交点顺序以圆为准
pub fn circle_line(circle: &Circle, line: &Line) -> Result<Intersection, GeometryError> {
    let dir = line.end - line.start;
    if near_zero(dir.x) && near_zero(dir.y) {
        trace!(?line, "degenerate line in circle intersection");
        return Err(GeometryError::InsufficientPrecision);
    }

    let line_rad = dir.y.atan2(dir.x);
    let p1 = line.start - circle.center;
    let p_rad = p1.y.atan2(p1.x);
    // 圆心到直线的有向距离（直线在方向左侧为正）
    let d = p1.norm() * (p_rad - line_rad).sin();
    let negate = d < 0.0;
    let d = d.abs();
    let r = circle.radius;
    let sign = if negate { -1.0 } else { 1.0 };

    if near_zero(d - r) {
        let offset = Vector2::new(-r * line_rad.sin(), r * line_rad.cos()) * sign;
        return Ok(Intersection::OnePoint(circle.center + offset));
    }
    if d > r {
        return Ok(Intersection::None);
    }

    let diff = (d / r).acos();
    let i1 = Vector2::new(
        -r * (line_rad - diff).sin(),
        r * (line_rad - diff).cos(),
    ) * sign;
    let i2 = Vector2::new(
        -r * (line_rad + diff).sin(),
        r * (line_rad + diff).cos(),
    ) * sign;

    Ok(Intersection::TwoPoints(
        circle.center + i1,
        circle.center + i2,
    ))
}

/// 直线与圆求交，交点沿直线方向排列
pub fn line_circle(line: &Line, circle: &Circle) -> Result<Intersection, GeometryError> {
    match circle_line(circle, line)? {
        Intersection::TwoPoints(p1, p2) => {
            if (p2 - p1).dot(&(line.end - line.start)) < 0.0 {
                Ok(Intersection::TwoPoints(p2, p1))
            } else {
                Ok(Intersection::TwoPoints(p1, p2))
            }
        }
        other => Ok(other),
    }
}

/// 直线与直线求交
pub fn line_line(l1: &Line, l2: &Line) -> Result<Intersection, GeometryError> {
    let d1 = l1.end - l1.start;
    let d2 = l2.end - l2.start;
    if (near_zero(d1.x) && near_zero(d1.y)) || (near_zero(d2.x) && near_zero(d2.y)) {
        trace!(?l1, ?l2, "degenerate line in line intersection");
        return Err(GeometryError::InsufficientPrecision);
    }

    let a1 = l1.atan2();
    if angle_near_multiple(a1 - l2.atan2(), PI) {
        let on_first = |p: Point2| {
            let v = p - l1.start;
            near_zero(v.norm()) || angle_near_multiple(v.y.atan2(v.x) - a1, PI)
        };
        if on_first(l2.start) && on_first(l2.end) {
            return Ok(Intersection::Coincident(Shape::Line(*l1)));
        }
        return Ok(Intersection::None);
    }

    let rhs = l2.start - l1.start;
    let solution =
        solve2(d1.x, -d2.x, d1.y, -d2.y, rhs).ok_or(GeometryError::InsufficientPrecision)?;
    Ok(Intersection::OnePoint(l1.start + d1 * solution.x))
}

/// 任意两个图形求交，圆弧按所在整圆、过原点直线按普通直线处理
pub fn shapes(a: &Shape, b: &Shape) -> Result<Intersection, GeometryError> {
    match (a.as_circle(), b.as_circle()) {
        (Some(c1), Some(c2)) => circle_circle(&c1, &c2),
        (Some(c), None) => circle_line(&c, &require_line(b)?),
        (None, Some(c)) => line_circle(&require_line(a)?, &c),
        (None, None) => line_line(&require_line(a)?, &require_line(b)?),
    }
}

fn require_line(shape: &Shape) -> Result<Line, GeometryError> {
    shape
        .as_line()
        .ok_or_else(|| GeometryError::InvalidGeometry(format!("{} is not a line", shape.type_name())))
}
