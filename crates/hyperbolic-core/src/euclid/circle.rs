//! 有向欧氏圆

use super::arc::Arc;
use crate::error::GeometryError;
use crate::math::{solve2, wrap_degrees, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 截取圆弧时的方向选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrimDirection {
    /// 沿用原图形的方向（默认）
    #[default]
    Inherit,
    /// 显式指定 `cw`
    Explicit(bool),
    /// 选择两点之间较短的那段弧
    Shorter,
}

/// 圆
///
/// `cw == true` 表示沿数学角度增大的方向绕行（在 y 轴朝下的画布上即顺时针）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
    pub cw: bool,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self::with_orientation(center, radius, true)
    }

    /// 创建指定方向的圆，负半径会被取反并翻转方向
    pub fn with_orientation(center: Point2, radius: f64, cw: bool) -> Self {
        if radius < 0.0 {
            Self {
                center,
                radius: -radius,
                cw: !cw,
            }
        } else {
            Self { center, radius, cw }
        }
    }

    /// 单位圆（庞加莱圆盘的边界）
    pub fn unit() -> Self {
        Self::new(Point2::origin(), 1.0)
    }

    /// 半径为零的圆，用于把点当作圆参与根轴计算
    pub fn point(center: Point2) -> Self {
        Self::new(center, 0.0)
    }

    pub fn reverse(&mut self) {
        self.cw = !self.cw;
    }

    pub fn reversed(&self) -> Self {
        Self {
            cw: !self.cw,
            ..*self
        }
    }

    /// 获取圆上指定角度（弧度）的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// 获取圆上指定角度（度）的点
    pub fn point_at_degree(&self, deg: f64) -> Point2 {
        self.point_at_angle(deg.to_radians())
    }

    /// 点相对圆心的方位角（度）
    pub fn degree_of(&self, point: Point2) -> f64 {
        let v = point - self.center;
        v.y.atan2(v.x).to_degrees()
    }

    /// 整圆总是包含其上的点
    pub fn is_point_on_segment(&self, _point: Point2) -> bool {
        true
    }

    /// 截取从 `start` 到 `end` 的圆弧（假设两点都在圆上）
    pub fn trimmed(&self, start: Point2, end: Point2, direction: TrimDirection) -> Arc {
        let start_deg = self.degree_of(start);
        let end_deg = self.degree_of(end);
        let cw = match direction {
            TrimDirection::Inherit => self.cw,
            TrimDirection::Explicit(cw) => cw,
            TrimDirection::Shorter => wrap_degrees(end_deg - start_deg) <= 180.0,
        };
        Arc::new(self.center, self.radius, start_deg, end_deg, cw)
    }

    /// 三点确定圆心与半径
    pub fn center_radius_from_points(
        p1: Point2,
        p2: Point2,
        p3: Point2,
    ) -> Result<(Point2, f64), GeometryError> {
        let c1 = 2.0 * (p1.x - p2.x);
        let c2 = 2.0 * (p1.y - p2.y);
        let c3 = p2.x * p2.x - p1.x * p1.x + p2.y * p2.y - p1.y * p1.y;
        let c4 = 2.0 * (p1.x - p3.x);
        let c5 = 2.0 * (p1.y - p3.y);
        let c6 = p3.x * p3.x - p1.x * p1.x + p3.y * p3.y - p1.y * p1.y;

        let solution =
            solve2(c1, c2, c4, c5, Vector2::new(-c3, -c6)).ok_or(GeometryError::Collinear)?;
        let center = Point2::new(solution.x, solution.y);
        Ok((center, (p1 - center).norm()))
    }

    /// 过三点的圆
    pub fn from_points(p1: Point2, p2: Point2, p3: Point2, cw: bool) -> Result<Self, GeometryError> {
        let (center, radius) = Self::center_radius_from_points(p1, p2, p3)?;
        Ok(Self::with_orientation(center, radius, cw))
    }
}
