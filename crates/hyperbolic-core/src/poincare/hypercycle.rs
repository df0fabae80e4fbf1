//! 超圆与双曲直线
//!
//! 超圆是到某条测地线距离恒定的曲线，在圆盘中表现为一段与单位圆相交（但不一定正交）
//! 的圆弧或直线。距离为零时退化为测地线，即 [`Line`]，其欧氏图形与单位圆正交。
//!
//! 非线段形式的超圆总是被裁剪到它与单位圆的两个交点之间。

use super::point::Point;
use super::polygon::{Edge, Polygon};
use super::stroke::StrokeWidth;
use super::transform::PointMap;
use crate::error::GeometryError;
use crate::euclid::{intersection, Arc, Circle as ECircle, Line as ELine, Shape, TrimDirection};
use crate::math::{
    inline_with_origin, near_zero, radial_euclid_to_poincare, radial_poincare_to_euclid,
    unit_circ_inv, wrap_radians, Point2, Vector2,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::ops::Deref;
use tracing::trace;

/// 由三点构造超圆时的选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HypercycleOptions {
    /// 只保留起点到终点之间的部分
    pub segment: bool,
    /// 第三个点不在起点与终点之间
    pub exclude_mid: bool,
}

impl HypercycleOptions {
    pub fn segment() -> Self {
        Self {
            segment: true,
            exclude_mid: false,
        }
    }
}

/// 超圆（或其线段）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hypercycle {
    shape: Shape,
    segment: bool,
}

impl Hypercycle {
    /// 由欧氏图形构造
    ///
    /// 非线段形式会把图形裁剪到单位圆内并保持原有方向；线段形式必须给出圆弧或直线。
    pub fn new(shape: Shape, segment: bool) -> Result<Self, GeometryError> {
        if segment {
            let shape = match shape {
                Shape::Arc(_) | Shape::Line(_) => shape,
                Shape::OriginLine(l) => Shape::Line(l.to_line()),
                Shape::Circle(_) => {
                    return Err(GeometryError::InvalidGeometry(
                        "a full circle does not determine segment endpoints".into(),
                    ))
                }
            };
            return Ok(Self { shape, segment });
        }

        let shape = match shape {
            Shape::Circle(c) => Shape::Arc(clip_circle(&c)?),
            Shape::Arc(a) => Shape::Arc(clip_circle(&a.circle())?),
            Shape::Line(l) => Shape::Line(clip_line(&l)?),
            Shape::OriginLine(l) => Shape::Line(clip_line(&l.to_line())?),
        };
        Ok(Self { shape, segment })
    }

    /// 经过三点的超圆
    ///
    /// `start`、`end` 为端点，`mid` 为第三个点；三点共线时得到直线。
    pub fn from_points(
        start: Point2,
        end: Point2,
        mid: Point2,
        options: HypercycleOptions,
    ) -> Result<Self, GeometryError> {
        if same_point(start, end) {
            return Err(GeometryError::InvalidGeometry(
                "start and end points are the same".into(),
            ));
        }
        if same_point(start, mid) || same_point(mid, end) {
            return Err(GeometryError::InvalidGeometry(
                "middle point coincides with an endpoint".into(),
            ));
        }
        let shape = if inline_with_origin(start - mid, end - mid) {
            Shape::Line(ELine::new(start, end))
        } else {
            Shape::Arc(Arc::from_points(start, end, mid, options.exclude_mid)?)
        };
        Self::new(shape, options.segment)
    }

    /// 与 `h` 距离为 `offset` 的超圆
    ///
    /// 正的 `offset` 位于沿 `h` 前进方向的右侧（数学坐标系）。结果总是非线段形式。
    pub fn from_hypercycle_offset(h: &Hypercycle, offset: f64) -> Result<Self, GeometryError> {
        let dh = -offset;
        let unit = ECircle::unit();
        let (p1, p2, through) = match h.shape {
            Shape::Circle(_) | Shape::Arc(_) => {
                let c = h.circle()?;
                let (mut p1, mut p2) = intersection::circle_circle(&c, &unit)?.two_points()?;
                if !c.cw {
                    std::mem::swap(&mut p1, &mut p2);
                }
                let rc = c.center.coords.norm();
                let dh_mid = radial_euclid_to_poincare(rc - c.radius);
                let sign = if c.cw { 1.0 } else { -1.0 };
                let t = radial_poincare_to_euclid(dh_mid + sign * dh);
                (p1, p2, Point2::from(c.center.coords * (t / rc)))
            }
            Shape::Line(_) | Shape::OriginLine(_) => {
                let line = h.line()?;
                let (p1, p2) = intersection::line_circle(&line, &unit)?.two_points()?;
                let chord = p2 - p1;
                let line_ang = chord.y.atan2(chord.x);
                let m = nalgebra::center(&p1, &p2);
                let ang = if near_zero(m.x) && near_zero(m.y) {
                    line_ang + FRAC_PI_2
                } else {
                    m.y.atan2(m.x)
                };
                // 直线是否绕原点顺时针
                let cw = wrap_radians(ang - line_ang) >= PI;
                let sign = if cw { -1.0 } else { 1.0 };
                let dh_mid = radial_euclid_to_poincare(m.coords.norm());
                let t = radial_poincare_to_euclid(dh_mid + sign * dh);
                (p1, p2, Point2::new(t * ang.cos(), t * ang.sin()))
            }
        };
        Self::from_points(p1, p2, through, HypercycleOptions::default())
    }

    /// 欧氏图形
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_segment(&self) -> bool {
        self.segment
    }

    pub fn start_point(&self) -> Result<Point, GeometryError> {
        Point::from_point2(self.shape.start_point())
    }

    pub fn end_point(&self) -> Result<Point, GeometryError> {
        Point::from_point2(self.shape.end_point())
    }

    /// 欧氏意义下的中点（弧或线段的中点）
    pub fn midpoint_euclid(&self) -> Result<Point, GeometryError> {
        Point::from_point2(self.shape.midpoint())
    }

    fn circle(&self) -> Result<ECircle, GeometryError> {
        self.shape
            .as_circle()
            .ok_or_else(|| GeometryError::InvalidGeometry("hypercycle is not circular".into()))
    }

    fn line(&self) -> Result<ELine, GeometryError> {
        self.shape
            .as_line()
            .ok_or_else(|| GeometryError::InvalidGeometry("hypercycle is not straight".into()))
    }

    /// 与另一条超圆（视为无限长）在圆盘内的交点
    ///
    /// 落在圆盘外的交点会被丢弃；两者重合时返回 [`GeometryError::InfiniteIntersections`]。
    pub fn intersections_with_hcycle(
        &self,
        other: &Hypercycle,
    ) -> Result<Vec<Point>, GeometryError> {
        let points = intersection::shapes(&self.shape, &other.shape)?.points()?;
        Ok(points
            .into_iter()
            .filter_map(|p| match Point::from_point2(p) {
                Ok(point) => Some(point),
                Err(err) => {
                    trace!(%err, "discarding intersection outside the disk");
                    None
                }
            })
            .collect())
    }

    /// 同时位于两条线段上的交点
    pub fn segment_intersections_with_hcycle(
        &self,
        other: &Hypercycle,
    ) -> Result<Vec<Point>, GeometryError> {
        Ok(self
            .intersections_with_hcycle(other)?
            .into_iter()
            .filter(|p| {
                self.is_point_on_segment(p.to_point2()) && other.is_point_on_segment(p.to_point2())
            })
            .collect())
    }

    pub fn is_point_on_segment(&self, p: Point2) -> bool {
        self.shape.is_point_on_segment(p)
    }

    /// 截取 `start` 到 `end` 的线段（假设两点都在曲线上）
    pub fn trimmed(&self, start: Point2, end: Point2, direction: TrimDirection) -> Self {
        Self {
            shape: self.shape.trimmed(start, end, direction),
            segment: true,
        }
    }

    pub fn reverse(&mut self) {
        self.shape.reverse();
    }

    pub fn reversed(&self) -> Self {
        Self {
            shape: self.shape.reversed(),
            segment: self.segment,
        }
    }

    /// 过点 `p` 且与自身垂直的测地线
    ///
    /// 结果的方向是自身在 `p` 处的前进方向逆时针旋转 90°（数学坐标系）。
    pub fn make_perpendicular(&self, p: Point2) -> Result<Line, GeometryError> {
        let point = Shape::Circle(ECircle::point(p));
        let radical1 = if near_zero(p.x) && near_zero(p.y) {
            None
        } else {
            Some(ELine::radical_axis(&Shape::Circle(ECircle::unit()), &point)?)
        };
        let radical2 = ELine::radical_axis(&self.shape, &point)?;

        let mut shape = match radical1 {
            Some(radical1) if !radical1.parallel_to(&radical2) => {
                let center = intersection::line_line(&radical1, &radical2)?.one_point()?;
                Shape::Circle(ECircle::new(center, (center - p).norm()))
            }
            // 半径无穷大的圆，即过原点的直线
            _ => Shape::Line(radical2.make_perpendicular(p, 1.0)),
        };
        if tangent_at(&self.shape, p).perp(&tangent_at(&shape, p)) < 0.0 {
            shape.reverse();
        }
        Line::new(shape, false)
    }

    /// 线段端点处的封口：理想点保持为点，否则为过该点的垂线
    pub fn make_cap(&self, pt: &Point) -> Result<Edge, GeometryError> {
        if pt.is_ideal() {
            Ok(Edge::Ideal(*pt))
        } else {
            Ok(Edge::Curve(
                self.make_perpendicular(pt.to_point2())?.into_hypercycle(),
            ))
        }
    }

    pub fn make_offset(&self, offset: f64) -> Result<Self, GeometryError> {
        Self::from_hypercycle_offset(self, offset)
    }

    /// 经点映射变换后的超圆
    pub fn transformed<M: PointMap + ?Sized>(&self, map: &M) -> Result<Self, GeometryError> {
        Self::new(map.apply_to_shape(&self.shape), self.segment)
    }

    /// 无限长超圆描边的两条边界，第二条已反向以便首尾相接
    pub fn stroke_boundaries(&self, width: StrokeWidth) -> Result<(Self, Self), GeometryError> {
        let (hw1, hw2) = width.halves();
        Ok((self.make_offset(hw1)?, self.make_offset(hw2)?.reversed()))
    }

    /// 线段描边的轮廓多边形：两条偏移曲线加上两端的封口
    pub fn stroke_outline(&self, width: StrokeWidth) -> Result<Polygon, GeometryError> {
        if !self.segment {
            return Err(GeometryError::InvalidGeometry(
                "only segments have a closed stroke outline".into(),
            ));
        }
        let (hw1, hw2) = width.halves();
        let edges = vec![
            Edge::Curve(self.make_offset(hw1)?),
            self.make_cap(&self.start_point()?)?,
            Edge::Curve(self.make_offset(hw2)?),
            self.make_cap(&self.end_point()?)?,
        ];
        Polygon::from_edges(edges, true)
    }
}

/// 把圆裁剪到单位圆内，保持方向
fn clip_circle(c: &ECircle) -> Result<Arc, GeometryError> {
    let (mut p1, mut p2) = intersection::circle_circle(c, &ECircle::unit())?.two_points()?;
    if !c.cw {
        std::mem::swap(&mut p1, &mut p2);
    }
    Arc::from_points_with_center(p1, p2, c.center, Some(c.radius), c.cw)
}

/// 把直线裁剪到单位圆内，保持方向
fn clip_line(l: &ELine) -> Result<ELine, GeometryError> {
    let (mut p1, mut p2) = intersection::circle_line(&ECircle::unit(), l)?.two_points()?;
    let chord = p2 - p1;
    let ang_diff = wrap_radians(chord.y.atan2(chord.x) - l.atan2());
    if FRAC_PI_2 < ang_diff && ang_diff < 3.0 * FRAC_PI_2 {
        std::mem::swap(&mut p1, &mut p2);
    }
    Ok(ELine::new(p1, p2))
}

/// 图形在点 `p` 处的前进方向
fn tangent_at(shape: &Shape, p: Point2) -> Vector2 {
    match shape.as_circle() {
        Some(c) => {
            let v = p - c.center;
            let t = Vector2::new(-v.y, v.x);
            if c.cw {
                t
            } else {
                -t
            }
        }
        None => shape.end_point() - shape.start_point(),
    }
}

fn same_point(a: Point2, b: Point2) -> bool {
    near_zero(a.x - b.x) && near_zero(a.y - b.y)
}

/// 双曲直线（测地线）
///
/// 欧氏图形与单位圆正交的超圆。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(Hypercycle);

impl Line {
    /// 由欧氏图形构造，要求图形与单位圆正交（直线须过原点）
    pub fn new(shape: Shape, segment: bool) -> Result<Self, GeometryError> {
        check_orthogonal(&shape)?;
        Ok(Self(Hypercycle::new(shape, segment)?))
    }

    /// 经过两点的测地线
    pub fn from_points(p1: Point2, p2: Point2, segment: bool) -> Result<Self, GeometryError> {
        if same_point(p1, p2) {
            return Err(GeometryError::InvalidGeometry(
                "start and end points are the same".into(),
            ));
        }

        if inline_with_origin(p1.coords, p2.coords) {
            let shape = if segment {
                ELine::new(p1, p2)
            } else {
                let dir = (p2 - p1).normalize();
                ELine::new(Point2::from(-dir), Point2::from(dir))
            };
            return Self::new(Shape::Line(shape), segment);
        }

        let r1 = p1.coords.norm();
        let r2 = p2.coords.norm();
        if near_zero(r1 - 1.0) && near_zero(r2 - 1.0) {
            // 两个理想点：取测地线上离原点最近的点作为第三个点
            let a1 = p1.y.atan2(p1.x);
            let a2 = p2.y.atan2(p2.x);
            let (lo, diff) = if wrap_radians(a2 - a1) > PI {
                (a2, wrap_radians(a1 - a2))
            } else {
                (a1, wrap_radians(a2 - a1))
            };
            let half = diff / 2.0;
            let dist = (1.0 - half.sin()) / half.cos();
            let ang = lo + half;
            let closest = Point2::new(dist * ang.cos(), dist * ang.sin());
            let arc = Arc::from_points(p1, p2, closest, false)?;
            // 两个端点已覆盖整条线，不再是线段
            return Self::new(Shape::Arc(arc), false);
        }

        // 用圆反演得到同一测地线上的第三个点
        let (p3, ex_mid) = if near_zero(r1 - 1.0) {
            (unit_circ_inv(p2), r2 <= 1.0)
        } else {
            (unit_circ_inv(p1), r1 <= 1.0)
        };
        let arc = Arc::from_points(p1, p2, p3, ex_mid)?;
        Self::new(Shape::Arc(arc), segment)
    }

    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    pub fn reversed(&self) -> Self {
        Self(self.0.reversed())
    }

    pub fn hypercycle(&self) -> &Hypercycle {
        &self.0
    }

    pub fn into_hypercycle(self) -> Hypercycle {
        self.0
    }

    pub fn transformed<M: PointMap + ?Sized>(&self, map: &M) -> Result<Self, GeometryError> {
        Self::new(map.apply_to_shape(self.0.shape()), self.0.is_segment())
    }
}

impl Deref for Line {
    type Target = Hypercycle;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Line> for Hypercycle {
    fn from(line: Line) -> Self {
        line.0
    }
}

fn check_orthogonal(shape: &Shape) -> Result<(), GeometryError> {
    if let Some(c) = shape.as_circle() {
        let r2 = c.radius * c.radius;
        if !near_zero((c.center.coords.norm_squared() - 1.0 - r2) / r2.max(1.0)) {
            return Err(GeometryError::InvalidGeometry(format!(
                "circle at ({}, {}) with r = {} is not orthogonal to the unit circle",
                c.center.x, c.center.y, c.radius
            )));
        }
    } else if let Some(l) = shape.as_line() {
        let len = l.length();
        if near_zero(len) {
            return Err(GeometryError::InsufficientPrecision);
        }
        if !near_zero((l.end - l.start).perp(&l.start.coords) / len) {
            return Err(GeometryError::InvalidGeometry(
                "line does not pass through the origin".into(),
            ));
        }
    }
    Ok(())
}
