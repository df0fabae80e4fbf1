//! 庞加莱圆盘中的点
//!
//! 同时保存欧氏坐标 `(x, y)` 与双曲极坐标 `(hr, theta)`。位于单位圆上的点是理想点，
//! 其 `hr` 为正无穷，坐标由 `theta` 推出。

use super::transform::{PointMap, Transform};
use crate::error::GeometryError;
use crate::math::{
    near_zero, radial_euclid_to_poincare, radial_poincare_to_euclid, wrap_radians, Point2,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 双曲点（可能是理想点）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(into = "PointRepr", try_from = "PointRepr")]
pub struct Point {
    x: f64,
    y: f64,
    hr: f64,
    theta: f64,
}

/// 序列化形式，只保留欧氏坐标
#[derive(Serialize, Deserialize)]
struct PointRepr {
    x: f64,
    y: f64,
}

impl From<Point> for PointRepr {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl TryFrom<PointRepr> for Point {
    type Error = GeometryError;

    fn try_from(repr: PointRepr) -> Result<Self, Self::Error> {
        Point::from_euclid(repr.x, repr.y)
    }
}

impl Point {
    /// 圆盘内部的点，不做区域检查
    fn interior(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            hr: radial_euclid_to_poincare(x.hypot(y)),
            theta: wrap_radians(y.atan2(x)),
        }
    }

    /// 理想点
    pub fn ideal(theta: f64) -> Self {
        let theta = wrap_radians(theta);
        Self {
            x: theta.cos(),
            y: theta.sin(),
            hr: f64::INFINITY,
            theta,
        }
    }

    pub fn ideal_from_degrees(deg: f64) -> Self {
        Self::ideal(deg.to_radians())
    }

    pub fn origin() -> Self {
        Self::interior(0.0, 0.0)
    }

    /// 由欧氏坐标构造
    ///
    /// 在单位圆上（容差内）得到理想点，圆外返回 [`GeometryError::OutOfDomain`]。
    pub fn from_euclid(x: f64, y: f64) -> Result<Self, GeometryError> {
        let r = x.hypot(y);
        if near_zero(r - 1.0) {
            Ok(Self::ideal(y.atan2(x)))
        } else if r < 1.0 {
            Ok(Self::interior(x, y))
        } else {
            Err(GeometryError::OutOfDomain { x, y })
        }
    }

    pub fn from_point2(p: Point2) -> Result<Self, GeometryError> {
        Self::from_euclid(p.x, p.y)
    }

    /// 由欧氏极坐标构造（角度为弧度）
    pub fn from_polar_euclid(r: f64, rad: f64) -> Result<Self, GeometryError> {
        if near_zero(r - 1.0) {
            Ok(Self::ideal(rad))
        } else if r < 1.0 {
            Ok(Self::interior(r * rad.cos(), r * rad.sin()))
        } else {
            Err(GeometryError::OutOfDomain {
                x: r * rad.cos(),
                y: r * rad.sin(),
            })
        }
    }

    pub fn from_polar_euclid_degrees(r: f64, deg: f64) -> Result<Self, GeometryError> {
        Self::from_polar_euclid(r, deg.to_radians())
    }

    /// 由双曲极坐标构造
    ///
    /// 负的 `hr` 表示反方向上的点。
    pub fn from_h_polar(hr: f64, theta: f64) -> Self {
        let (hr, theta) = if hr < 0.0 { (-hr, theta + PI) } else { (hr, theta) };
        if hr.is_infinite() {
            return Self::ideal(theta);
        }
        let r = radial_poincare_to_euclid(hr);
        if near_zero(r - 1.0) {
            return Self::ideal(theta);
        }
        Self {
            x: r * theta.cos(),
            y: r * theta.sin(),
            hr,
            theta: wrap_radians(theta),
        }
    }

    pub fn from_h_polar_degrees(hr: f64, deg: f64) -> Self {
        Self::from_h_polar(hr, deg.to_radians())
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// 到原点的双曲距离，理想点为正无穷
    pub fn hr(&self) -> f64 {
        self.hr
    }

    /// 极角（弧度，`[0, 2π)`）
    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn is_ideal(&self) -> bool {
        self.hr.is_infinite()
    }

    /// 欧氏坐标
    pub fn to_point2(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// 欧氏半径
    pub fn euclid_radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// 从自身到 `other` 的极角差
    pub fn polar_angle_to(&self, other: &Point) -> f64 {
        other.theta - self.theta
    }

    /// 双曲距离；任一点为理想点时为正无穷
    ///
    /// 按 `2·asinh(|p − q|·cosh(hr₁/2)·cosh(hr₂/2))` 计算，其中
    /// `cosh(hr/2) = 1/sqrt(1 − |p|²)`。相同的点距离恰好为零。
    pub fn distance_to(&self, other: &Point) -> f64 {
        if self.is_ideal() || other.is_ideal() {
            return f64::INFINITY;
        }
        let chord = (self.to_point2() - other.to_point2()).norm();
        2.0 * (chord * (self.hr / 2.0).cosh() * (other.hr / 2.0).cosh()).asinh()
    }

    /// 沿测地线从自身走向 `other`，距离为总长的 `frac` 倍
    pub fn midpoint_with(&self, other: &Point, frac: f64) -> Result<Point, GeometryError> {
        if self.is_ideal() || other.is_ideal() {
            return Err(GeometryError::InvalidGeometry(
                "midpoint is undefined for ideal points".into(),
            ));
        }
        let d = self.distance_to(other);
        let p_mid = Point::from_h_polar(d * frac, 0.0);
        Transform::translation(self.to_point2(), Some(other.to_point2())).apply_to_point(&p_mid)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        near_zero(self.x - other.x) && near_zero(self.y - other.y)
    }
}

impl From<Point> for Point2 {
    fn from(p: Point) -> Self {
        p.to_point2()
    }
}

impl From<&Point> for Point2 {
    fn from(p: &Point) -> Self {
        p.to_point2()
    }
}
