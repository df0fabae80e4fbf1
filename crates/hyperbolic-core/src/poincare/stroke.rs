//! 描边几何
//!
//! 只计算描边区域的边界图形，不涉及任何绘制输出。

use crate::euclid::Circle as ECircle;
use crate::math::Point2;
use serde::{Deserialize, Serialize};

/// 双曲描边宽度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrokeWidth {
    /// 以曲线为中心、两侧各占一半
    Symmetric(f64),
    /// 两侧分别指定的有向偏移量
    Split(f64, f64),
}

impl StrokeWidth {
    /// 两条边界的有向偏移量 `(hw1, hw2)`
    pub fn halves(&self) -> (f64, f64) {
        match *self {
            StrokeWidth::Symmetric(w) => (w / 2.0, -w / 2.0),
            StrokeWidth::Split(hw1, hw2) => (hw1, hw2),
        }
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        StrokeWidth::Symmetric(0.0)
    }
}

impl From<f64> for StrokeWidth {
    fn from(width: f64) -> Self {
        StrokeWidth::Symmetric(width)
    }
}

/// 圆或极限圆描边后的区域
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Annulus {
    /// 圆环，内圆沿角度增大方向、外圆沿角度减小方向
    Ring { inner: ECircle, outer: ECircle },
    /// 内半径退化后的实心圆
    Disk(ECircle),
    /// 内外半径都退化后只剩圆心
    Dot(Point2),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halves() {
        assert_eq!(StrokeWidth::Symmetric(0.2).halves(), (0.1, -0.1));
        assert_eq!(StrokeWidth::Split(0.3, 0.1).halves(), (0.3, 0.1));
        assert_eq!(StrokeWidth::from(1.0), StrokeWidth::Symmetric(1.0));
    }
}
