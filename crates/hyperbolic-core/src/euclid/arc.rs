//! 有向圆弧

use super::circle::Circle;
use crate::error::GeometryError;
use crate::math::{near_zero, wrap_degrees, Point2};
use serde::{Deserialize, Serialize};

/// 圆弧
///
/// 角度以度为单位。`cw == true` 时从 `start_deg` 沿角度增大方向扫到 `end_deg`，
/// 否则沿角度减小方向。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（度）
    pub start_deg: f64,
    /// 终止角度（度）
    pub end_deg: f64,
    pub cw: bool,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_deg: f64, end_deg: f64, cw: bool) -> Self {
        if radius < 0.0 {
            // 负半径等价于对径方向上的正半径
            Self {
                center,
                radius: -radius,
                start_deg: start_deg + 180.0,
                end_deg: end_deg + 180.0,
                cw,
            }
        } else {
            Self {
                center,
                radius,
                start_deg,
                end_deg,
                cw,
            }
        }
    }

    /// 所在的整圆（保留方向）
    pub fn circle(&self) -> Circle {
        Circle::with_orientation(self.center, self.radius, self.cw)
    }

    pub fn start_point(&self) -> Point2 {
        self.circle().point_at_degree(self.start_deg)
    }

    pub fn end_point(&self) -> Point2 {
        self.circle().point_at_degree(self.end_deg)
    }

    /// 扫过的角度（度，非负）
    pub fn sweep_degrees(&self) -> f64 {
        if self.cw {
            wrap_degrees(self.end_deg - self.start_deg)
        } else {
            wrap_degrees(self.start_deg - self.end_deg)
        }
    }

    /// 弧中点所在角度（度，`[0, 360)`）
    pub fn mid_degree(&self) -> f64 {
        let (start, end) = if self.cw {
            (self.start_deg, self.end_deg)
        } else {
            (self.end_deg, self.start_deg)
        };
        let diff = wrap_degrees(end - start);
        wrap_degrees(start + diff / 2.0)
    }

    pub fn midpoint(&self) -> Point2 {
        self.circle().point_at_degree(self.mid_degree())
    }

    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start_deg, &mut self.end_deg);
        self.cw = !self.cw;
    }

    pub fn reversed(&self) -> Self {
        Self {
            start_deg: self.end_deg,
            end_deg: self.start_deg,
            cw: !self.cw,
            ..*self
        }
    }

    /// 判断圆上的点是否落在弧段内（假设该点已在圆上）
    pub fn is_point_on_segment(&self, point: Point2) -> bool {
        let p_deg = wrap_degrees(self.circle().degree_of(point));
        let start = wrap_degrees(self.start_deg);
        let end = wrap_degrees(self.end_deg);
        if degrees_match(p_deg, start) || degrees_match(p_deg, end) {
            return true;
        }
        if self.cw {
            wrap_degrees(p_deg - start) <= wrap_degrees(end - start)
        } else {
            wrap_degrees(start - p_deg) <= wrap_degrees(start - end)
        }
    }

    /// 以 `start` 为起点、`end` 为终点、经过（或避开）`mid` 的圆弧
    ///
    /// `exclude_mid` 为 `true` 时，`mid` 不在所得弧上。
    pub fn from_points(
        start: Point2,
        end: Point2,
        mid: Point2,
        exclude_mid: bool,
    ) -> Result<Self, GeometryError> {
        let (center, radius) = Circle::center_radius_from_points(start, end, mid)?;
        let circle = Circle::new(center, radius);
        let start_deg = circle.degree_of(start);
        let end_deg = circle.degree_of(end);
        let mid_deg = circle.degree_of(mid);
        // mid 位于 start → end 的角度增大方向上时为顺时针
        let cw = wrap_degrees(mid_deg - start_deg) <= wrap_degrees(end_deg - start_deg);
        Ok(Self::new(center, radius, start_deg, end_deg, cw ^ exclude_mid))
    }

    /// 已知圆心时由起止点构造圆弧
    pub fn from_points_with_center(
        start: Point2,
        end: Point2,
        center: Point2,
        radius: Option<f64>,
        cw: bool,
    ) -> Result<Self, GeometryError> {
        let sr = (start - center).norm();
        let er = (end - center).norm();
        let radius = radius.unwrap_or((sr + er) / 2.0);
        if !near_zero(sr - radius) || !near_zero(er - radius) {
            return Err(GeometryError::InvalidGeometry(format!(
                "arc endpoints are not on the circle (r = {radius}, got {sr} and {er})"
            )));
        }
        let circle = Circle::new(center, radius);
        Ok(Self::new(
            center,
            radius,
            circle.degree_of(start),
            circle.degree_of(end),
            cw,
        ))
    }
}

fn degrees_match(a: f64, b: f64) -> bool {
    let diff = wrap_degrees(a - b);
    near_zero(diff) || near_zero(360.0 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    fn assert_point_eq(a: Point2, b: Point2) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_from_points_orientation() {
        // 经过 (1, 0) 从 (0, -1) 到 (0, 1)：角度增大方向
        let arc = Arc::from_points(
            Point2::new(0.0, -1.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
            false,
        )
        .unwrap();
        assert!(arc.cw);
        assert!(arc.center.coords.norm() < EPSILON);
        assert_point_eq(arc.midpoint(), Point2::new(1.0, 0.0));

        let excluded = Arc::from_points(
            Point2::new(0.0, -1.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
            true,
        )
        .unwrap();
        assert!(!excluded.cw);
        assert_point_eq(excluded.midpoint(), Point2::new(-1.0, 0.0));
    }

    #[test]
    fn test_point_on_segment() {
        let arc = Arc::new(Point2::origin(), 1.0, -60.0, 60.0, true);
        assert!(arc.is_point_on_segment(Point2::new(1.0, 0.0)));
        assert!(!arc.is_point_on_segment(Point2::new(-1.0, 0.0)));
        assert!(arc.is_point_on_segment(arc.start_point()));
        assert!(arc.is_point_on_segment(arc.end_point()));

        let reversed = arc.reversed();
        assert!(reversed.is_point_on_segment(Point2::new(1.0, 0.0)));
        assert!(!reversed.is_point_on_segment(Point2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_reverse_swaps_endpoints() {
        let mut arc = Arc::new(Point2::new(0.5, 0.5), 0.25, 10.0, 100.0, true);
        let reversed = arc.reversed();
        arc.reverse();
        assert_eq!(arc, reversed);
        assert_point_eq(arc.start_point(), arc.circle().point_at_degree(100.0));
        assert_point_eq(arc.end_point(), arc.circle().point_at_degree(10.0));
        assert!((arc.mid_degree() - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_radius() {
        let arc = Arc::new(Point2::origin(), -1.0, 0.0, 90.0, true);
        assert!((arc.radius - 1.0).abs() < EPSILON);
        assert_point_eq(arc.start_point(), Point2::new(-1.0, 0.0));
        assert_point_eq(arc.end_point(), Point2::new(0.0, -1.0));
    }

    #[test]
    fn test_from_points_with_center_rejects_off_circle() {
        let result = Arc::from_points_with_center(
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::origin(),
            Some(1.0),
            true,
        );
        assert!(matches!(result, Err(GeometryError::InvalidGeometry(_))));
    }
}
