//! 极限圆
//!
//! 与单位圆内切的欧氏圆，切点是一个理想点。圆上与切点径向相对的点称为最近点。
//! 圆包含原点时 `surround_origin` 为 `true`。

use super::point::Point;
use super::stroke::{Annulus, StrokeWidth};
use super::transform::PointMap;
use crate::error::GeometryError;
use crate::euclid::{Circle as ECircle, Shape};
use crate::math::{near_zero, radial_euclid_to_poincare, Point2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 极限圆
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Horocycle {
    shape: ECircle,
    closest_point: Point,
    surround_origin: bool,
}

impl Horocycle {
    /// 由欧氏圆构造，要求与单位圆内切
    pub fn new(shape: ECircle) -> Result<Self, GeometryError> {
        let cr = shape.center.coords.norm();
        check_tangent(&shape, cr)?;
        let theta = shape.center.y.atan2(shape.center.x);
        Ok(Self {
            shape,
            closest_point: Point::from_polar_euclid(cr - shape.radius, theta)?,
            surround_origin: shape.radius > cr,
        })
    }

    /// 以给定最近点构造，`surround_origin` 必须与欧氏圆一致
    ///
    /// 圆心恰好落在半径中点时两种取值都被接受。
    pub fn with_closest_point(
        shape: ECircle,
        closest_point: Point,
        surround_origin: bool,
    ) -> Result<Self, GeometryError> {
        let cr = shape.center.coords.norm();
        check_tangent(&shape, cr)?;
        if !near_zero(shape.radius - cr) && surround_origin != (shape.radius > cr) {
            return Err(GeometryError::InvalidGeometry(
                "shape is not consistent with surround_origin".into(),
            ));
        }
        Ok(Self {
            shape,
            closest_point,
            surround_origin,
        })
    }

    /// 经过点 `pt` 的极限圆
    ///
    /// `surround_origin` 为 `false` 时切点在 `pt` 的方向上，否则在相反方向上。
    pub fn from_closest_point(
        pt: Point,
        surround_origin: bool,
        cw: bool,
    ) -> Result<Self, GeometryError> {
        let (epr, theta) = if surround_origin {
            (-pt.euclid_radius(), pt.theta() + PI)
        } else {
            (pt.euclid_radius(), pt.theta())
        };
        let er = (1.0 - epr) / 2.0;
        let ecr = epr + er;
        let shape = ECircle::with_orientation(
            Point2::new(ecr * theta.cos(), ecr * theta.sin()),
            er,
            cw,
        );
        Self::with_closest_point(shape, pt, surround_origin)
    }

    /// 最近点以双曲极坐标给出，负的 `hr` 表示包含原点
    pub fn from_closest_point_h_polar(hr: f64, theta: f64, cw: bool) -> Result<Self, GeometryError> {
        Self::from_closest_point(Point::from_h_polar(hr, theta), hr < 0.0, cw)
    }

    /// 最近点以欧氏极坐标给出，负的 `er` 表示包含原点
    pub fn from_closest_point_e_polar(er: f64, theta: f64, cw: bool) -> Result<Self, GeometryError> {
        Self::from_closest_point(Point::from_polar_euclid(er, theta)?, er < 0.0, cw)
    }

    /// 欧氏图形
    pub fn shape(&self) -> &ECircle {
        &self.shape
    }

    pub fn closest_point(&self) -> &Point {
        &self.closest_point
    }

    pub fn surround_origin(&self) -> bool {
        self.surround_origin
    }

    /// 与单位圆的切点
    pub fn ideal_point(&self) -> Point {
        Point::ideal(self.shape.center.y.atan2(self.shape.center.x))
    }

    pub fn transformed<M: PointMap + ?Sized>(&self, map: &M) -> Result<Self, GeometryError> {
        match map.apply_to_shape(&Shape::Circle(self.shape)) {
            Shape::Circle(c) => Self::new(c),
            other => Err(GeometryError::InvalidGeometry(format!(
                "horocycle mapped to a {}",
                other.type_name()
            ))),
        }
    }

    /// 描边区域：切于同一理想点、最近点沿径向偏移的两个极限圆
    ///
    /// 内圆（更靠近切点）沿角度增大方向，外圆沿角度减小方向。
    pub fn stroke_annulus(&self, width: StrokeWidth) -> Result<Annulus, GeometryError> {
        let (hw1, hw2) = match width {
            StrokeWidth::Split(hw1, hw2) if !self.shape.cw => (-hw2, -hw1),
            _ => width.halves(),
        };
        let center = self.shape.center;
        let theta = center.y.atan2(center.x);
        let epr = center.coords.norm() - self.shape.radius;
        let hpr = radial_euclid_to_poincare(epr);
        let mut pr_inner = hpr - hw1;
        let mut pr_outer = hpr - hw2;
        if pr_outer > pr_inner {
            std::mem::swap(&mut pr_inner, &mut pr_outer);
        }
        let inner = Self::from_closest_point_h_polar(pr_inner, theta, true)?;
        let outer = Self::from_closest_point_h_polar(pr_outer, theta, false)?;
        Ok(Annulus::Ring {
            inner: inner.shape,
            outer: outer.shape,
        })
    }
}

fn check_tangent(shape: &ECircle, cr: f64) -> Result<(), GeometryError> {
    if near_zero(shape.radius + cr - 1.0) {
        Ok(())
    } else {
        Err(GeometryError::InvalidGeometry(format!(
            "circle at ({}, {}) with r = {} is not tangent to the unit circle",
            shape.center.x, shape.center.y, shape.radius
        )))
    }
}
