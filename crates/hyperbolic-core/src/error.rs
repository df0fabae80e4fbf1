//! 几何错误定义

use crate::euclid::Shape;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GeometryError {
    #[error("Shapes coincide: {0:?}")]
    InfiniteIntersections(Box<Shape>),

    #[error("Shapes touch at a single point ({x}, {y})")]
    SingleIntersection { x: f64, y: f64 },

    #[error("Shapes do not intersect")]
    NoIntersection,

    #[error("Line endpoints are too close to define a direction")]
    InsufficientPrecision,

    #[error("Polygon edge join {index} is ambiguous")]
    AmbiguousJoin { index: usize },

    #[error("Polygon edges at join {index} do not intersect")]
    DisjointEdges { index: usize },

    #[error("Euclidean coordinates ({x}, {y}) are outside the unit circle")]
    OutOfDomain { x: f64, y: f64 },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Points are collinear")]
    Collinear,
}
