//! 双曲几何内核
//!
//! 在庞加莱圆盘模型中构造点、测地线、超圆、圆、极限圆、多边形与三角形，并用 Möbius 变换移动它们。
//!
//! # 架构设计
//!
//! 分为两层：
//! - `euclid`: 欧氏圆、圆弧、直线及其求交，求交结果区分两点、相切、重合与相离
//! - `poincare`: 建立在欧氏图形之上的双曲对象，每个对象都持有一个欧氏图形用于求交与绘制
//!
//! 数值判断统一使用 [`math::EPSILON`] 绝对容差。
//!
//! # 示例
//!
//! ```rust
//! use hyperbolic_core::prelude::*;
//!
//! let p = Point::from_euclid(0.5, 0.0).unwrap();
//! let q = Point::from_h_polar(1.0, std::f64::consts::FRAC_PI_2);
//!
//! // 经过两点的测地线段
//! let line = Line::from_points(p.to_point2(), q.to_point2(), true).unwrap();
//! assert!(line.is_segment());
//!
//! // 把 p 移到原点
//! let t = Transform::shift_origin(p.to_point2(), None);
//! assert!(t.apply_to_point(&p).unwrap().hr() < 1e-9);
//! ```

pub mod error;
pub mod euclid;
pub mod math;
pub mod poincare;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::error::GeometryError;
    pub use crate::euclid::{
        Arc, Circle as ECircle, Intersection, Line as ELine, OriginLine, Shape, TrimDirection,
    };
    pub use crate::math::{Point2, Vector2, EPSILON};
    pub use crate::poincare::{
        Annulus, Circle, Edge, Horocycle, Hypercycle, HypercycleOptions, KleinMap, Line, Point,
        PointMap, Polygon, StrokeWidth, Transform, Triangle, VertexOffset,
    };
}
