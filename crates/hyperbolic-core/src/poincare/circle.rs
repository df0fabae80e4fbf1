//! 双曲圆
//!
//! 到某个双曲点距离恒定的点集。在圆盘中仍是一个欧氏圆，但欧氏圆心与双曲圆心一般不重合。

use super::point::Point;
use super::stroke::{Annulus, StrokeWidth};
use super::transform::PointMap;
use crate::error::GeometryError;
use crate::euclid::{Circle as ECircle, Shape};
use crate::math::{radial_euclid_to_poincare, radial_poincare_to_euclid, Point2};
use serde::{Deserialize, Serialize};

/// 双曲圆
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    shape: ECircle,
    center: Point,
    radius: f64,
}

impl Circle {
    /// 由欧氏圆推出双曲圆心与半径，欧氏圆必须完全位于圆盘内部
    pub fn from_shape(shape: ECircle) -> Result<Self, GeometryError> {
        let de0 = shape.center.coords.norm();
        let de1 = de0 - shape.radius;
        let de2 = de0 + shape.radius;
        if de2 >= 1.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "circle at ({}, {}) with r = {} leaves the disk",
                shape.center.x, shape.center.y, shape.radius
            )));
        }
        let dh1 = radial_euclid_to_poincare(de1);
        let dh2 = radial_euclid_to_poincare(de2);
        let theta = shape.center.y.atan2(shape.center.x);
        Ok(Self {
            shape,
            center: Point::from_h_polar((dh2 + dh1) / 2.0, theta),
            radius: (dh2 - dh1) / 2.0,
        })
    }

    /// 由双曲圆心与半径构造
    ///
    /// 负半径取绝对值并翻转方向。圆心不能是理想点。
    pub fn from_center_radius(center: Point, radius: f64, cw: bool) -> Result<Self, GeometryError> {
        if center.is_ideal() {
            return Err(GeometryError::InvalidGeometry(
                "circle center must be inside the disk".into(),
            ));
        }
        let (radius, cw) = if radius < 0.0 { (-radius, !cw) } else { (radius, cw) };
        let de1 = radial_poincare_to_euclid(center.hr() - radius);
        let de2 = radial_poincare_to_euclid(center.hr() + radius);
        let ecr = (de2 + de1) / 2.0;
        let theta = center.theta();
        let shape = ECircle::with_orientation(
            Point2::new(ecr * theta.cos(), ecr * theta.sin()),
            (de2 - de1) / 2.0,
            cw,
        );
        Ok(Self {
            shape,
            center,
            radius,
        })
    }

    /// 欧氏图形
    pub fn shape(&self) -> &ECircle {
        &self.shape
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    /// 双曲半径
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn reversed(&self) -> Self {
        Self {
            shape: self.shape.reversed(),
            ..*self
        }
    }

    pub fn transformed<M: PointMap + ?Sized>(&self, map: &M) -> Result<Self, GeometryError> {
        match map.apply_to_shape(&Shape::Circle(self.shape)) {
            Shape::Circle(c) => Self::from_shape(c),
            other => Err(GeometryError::InvalidGeometry(format!(
                "circle mapped to a {}",
                other.type_name()
            ))),
        }
    }

    /// 描边区域
    ///
    /// 内圆沿角度增大方向，外圆沿角度减小方向。`positive_radius` 为 `true` 时，
    /// 半径降到零以下的边界被去掉，区域退化为实心圆或圆心。
    pub fn stroke_annulus(
        &self,
        width: StrokeWidth,
        positive_radius: bool,
    ) -> Result<Annulus, GeometryError> {
        let (hw1, hw2) = match width {
            StrokeWidth::Split(hw1, hw2) if !self.shape.cw => (-hw2, -hw1),
            _ => width.halves(),
        };
        let mut r_inner = self.radius - hw1;
        let mut r_outer = self.radius - hw2;
        if r_outer < r_inner {
            std::mem::swap(&mut r_inner, &mut r_outer);
        }

        if positive_radius {
            if r_inner <= 0.0 && r_outer <= 0.0 {
                return Ok(Annulus::Dot(self.shape.center));
            }
            if r_inner <= 0.0 {
                let outer = Self::from_center_radius(self.center, r_outer, true)?;
                return Ok(Annulus::Disk(outer.shape));
            }
        }

        let inner = Self::from_center_radius(self.center, r_inner, true)?;
        let outer = Self::from_center_radius(self.center, r_outer, false)?;
        Ok(Annulus::Ring {
            inner: inner.shape,
            outer: outer.shape,
        })
    }
}
