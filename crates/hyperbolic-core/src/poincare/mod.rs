//! 庞加莱圆盘模型
//!
//! 所有双曲对象最终都由一个欧氏图形表示（见 [`crate::euclid`]），
//! 单位圆是无穷远边界，边界上的点是理想点。

pub mod circle;
pub mod horocycle;
pub mod hypercycle;
pub mod point;
pub mod polygon;
pub mod stroke;
pub mod transform;
pub mod triangle;

pub use circle::Circle;
pub use horocycle::Horocycle;
pub use hypercycle::{Hypercycle, HypercycleOptions, Line};
pub use point::Point;
pub use polygon::{Edge, Polygon};
pub use stroke::{Annulus, StrokeWidth};
pub use transform::{KleinMap, PointMap, Transform};
pub use triangle::{Triangle, VertexOffset};
