//! 欧氏几何图元
//!
//! 双曲对象在庞加莱圆盘中最终都由一个欧氏图形（圆、圆弧或直线）表示，
//! 本模块提供这些图形以及它们之间的求交。

pub mod arc;
pub mod circle;
pub mod intersection;
pub mod line;

pub use arc::Arc;
pub use circle::{Circle, TrimDirection};
pub use intersection::Intersection;
pub use line::{Line, OriginLine};

use crate::math::Point2;
use serde::{Deserialize, Serialize};

/// 欧氏图形的封闭和类型
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Arc(Arc),
    Line(Line),
    OriginLine(OriginLine),
}

impl Shape {
    /// 获取图形类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "Circle",
            Shape::Arc(_) => "Arc",
            Shape::Line(_) => "Line",
            Shape::OriginLine(_) => "OriginLine",
        }
    }

    pub fn reverse(&mut self) {
        match self {
            Shape::Circle(c) => c.reverse(),
            Shape::Arc(a) => a.reverse(),
            Shape::Line(l) => l.reverse(),
            Shape::OriginLine(l) => l.reverse(),
        }
    }

    pub fn reversed(&self) -> Self {
        let mut shape = *self;
        shape.reverse();
        shape
    }

    /// 方向标志；直线没有方向标志，恒为 `true`
    pub fn cw(&self) -> bool {
        match self {
            Shape::Circle(c) => c.cw,
            Shape::Arc(a) => a.cw,
            Shape::Line(_) | Shape::OriginLine(_) => true,
        }
    }

    /// 起点（整圆取 0°）
    pub fn start_point(&self) -> Point2 {
        match self {
            Shape::Circle(c) => c.point_at_degree(0.0),
            Shape::Arc(a) => a.start_point(),
            Shape::Line(l) => l.start,
            Shape::OriginLine(_) => Point2::origin(),
        }
    }

    /// 终点（整圆取 0°）
    pub fn end_point(&self) -> Point2 {
        match self {
            Shape::Circle(c) => c.point_at_degree(0.0),
            Shape::Arc(a) => a.end_point(),
            Shape::Line(l) => l.end,
            Shape::OriginLine(l) => l.point,
        }
    }

    /// 中点（整圆取 180°）
    pub fn midpoint(&self) -> Point2 {
        match self {
            Shape::Circle(c) => c.point_at_degree(180.0),
            Shape::Arc(a) => a.midpoint(),
            Shape::Line(l) => l.midpoint(),
            Shape::OriginLine(l) => l.to_line().midpoint(),
        }
    }

    /// 判断图形所在整圆/直线上的点是否位于图形的有限部分内
    pub fn is_point_on_segment(&self, point: Point2) -> bool {
        match self {
            Shape::Circle(c) => c.is_point_on_segment(point),
            Shape::Arc(a) => a.is_point_on_segment(point),
            Shape::Line(l) => l.is_point_on_segment(point),
            Shape::OriginLine(l) => l.to_line().is_point_on_segment(point),
        }
    }

    /// 截取 `start` 与 `end` 之间的部分
    pub fn trimmed(&self, start: Point2, end: Point2, direction: TrimDirection) -> Shape {
        match self {
            Shape::Circle(c) => Shape::Arc(c.trimmed(start, end, direction)),
            Shape::Arc(a) => Shape::Arc(a.circle().trimmed(start, end, direction)),
            Shape::Line(l) => Shape::Line(l.trimmed(start, end)),
            Shape::OriginLine(_) => Shape::Line(Line::new(start, end)),
        }
    }

    /// 圆或圆弧所在的（有向）整圆
    pub fn as_circle(&self) -> Option<Circle> {
        match self {
            Shape::Circle(c) => Some(*c),
            Shape::Arc(a) => Some(a.circle()),
            Shape::Line(_) | Shape::OriginLine(_) => None,
        }
    }

    /// 直线形式
    pub fn as_line(&self) -> Option<Line> {
        match self {
            Shape::Line(l) => Some(*l),
            Shape::OriginLine(l) => Some(l.to_line()),
            Shape::Circle(_) | Shape::Arc(_) => None,
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Arc> for Shape {
    fn from(a: Arc) -> Self {
        Shape::Arc(a)
    }
}

impl From<Line> for Shape {
    fn from(l: Line) -> Self {
        Shape::Line(l)
    }
}

impl From<OriginLine> for Shape {
    fn from(l: OriginLine) -> Self {
        Shape::OriginLine(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversal_involution() {
        let shapes = [
            Shape::Circle(Circle::new(Point2::new(0.1, 0.2), 0.5)),
            Shape::Arc(Arc::new(Point2::origin(), 1.0, 10.0, 80.0, true)),
            Shape::Line(Line::from_coords(0.0, 0.0, 0.5, 0.5)),
            Shape::OriginLine(OriginLine::new(Point2::new(0.3, 0.0))),
        ];
        for shape in shapes {
            assert_ne!(shape.reversed(), shape);
            assert_eq!(shape.reversed().reversed(), shape);
        }
    }

    #[test]
    fn test_circle_sample_points() {
        let shape = Shape::from(Circle::unit());
        assert!((shape.start_point() - Point2::new(1.0, 0.0)).norm() < 1e-12);
        assert!((shape.midpoint() - Point2::new(-1.0, 0.0)).norm() < 1e-12);
        assert!(shape.as_circle().is_some());
        assert!(shape.as_line().is_none());
    }

    #[test]
    fn test_trimmed_arc_keeps_circle() {
        let shape = Shape::from(Arc::new(Point2::origin(), 1.0, 0.0, 90.0, true));
        let trimmed = shape.trimmed(
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
            TrimDirection::Inherit,
        );
        match trimmed {
            Shape::Arc(a) => {
                assert!((a.start_deg - 90.0).abs() < 1e-9);
                assert!((a.end_deg - 180.0).abs() < 1e-9);
                assert!(a.cw);
            }
            other => panic!("expected an arc, got {other:?}"),
        }
    }
}
