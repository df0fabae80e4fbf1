//! 双曲多边形
//!
//! 由首尾相接的超圆线段组成，相邻两条边的交点即顶点。理想顶点可以用
//! [`Edge::Ideal`] 占位，此时它两侧的边都延伸到这个理想点。
//!
//! 第 `i` 条边连接顶点 `i` 与顶点 `i + 1`，顶点 `i` 是边 `i - 1` 与边 `i` 的交点。

use super::hypercycle::{Hypercycle, HypercycleOptions, Line};
use super::point::Point;
use super::stroke::StrokeWidth;
use super::transform::{PointMap, Transform};
use crate::error::GeometryError;
use crate::euclid::TrimDirection;
use crate::math::{wrap_degrees, Point2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 多边形的边
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Edge {
    /// 超圆（或测地线）线段
    Curve(Hypercycle),
    /// 长度为零的边，代表一个理想顶点
    Ideal(Point),
}

impl Edge {
    pub fn as_hypercycle(&self) -> Option<&Hypercycle> {
        match self {
            Edge::Curve(h) => Some(h),
            Edge::Ideal(_) => None,
        }
    }

    fn make_offset(&self, offset: f64) -> Result<Edge, GeometryError> {
        match self {
            Edge::Curve(h) => Ok(Edge::Curve(h.make_offset(offset)?)),
            Edge::Ideal(p) => Ok(Edge::Ideal(*p)),
        }
    }
}

impl From<Hypercycle> for Edge {
    fn from(h: Hypercycle) -> Self {
        Edge::Curve(h)
    }
}

impl From<Line> for Edge {
    fn from(line: Line) -> Self {
        Edge::Curve(line.into_hypercycle())
    }
}

/// 双曲多边形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    edges: Vec<Edge>,
    vertices: Vec<Point>,
}

impl Polygon {
    /// 由边推出顶点
    ///
    /// 相邻两边在圆盘内必须恰好有一个交点。`join` 为 `true` 时把每条边裁剪到
    /// 两端顶点之间（取较短的弧）。
    pub fn from_edges(edges: Vec<Edge>, join: bool) -> Result<Self, GeometryError> {
        let n = edges.len();
        if n < 2 {
            return Err(GeometryError::InvalidGeometry(format!(
                "a polygon needs at least two edges, got {n}"
            )));
        }

        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            let vertex = match (&edges[(i + n - 1) % n], &edges[i]) {
                (Edge::Ideal(p), _) | (_, Edge::Ideal(p)) => *p,
                (Edge::Curve(e1), Edge::Curve(e2)) => {
                    let mut points = e1.intersections_with_hcycle(e2)?;
                    match points.len() {
                        1 => points.remove(0),
                        0 => {
                            debug!(index = i, "polygon edges do not intersect");
                            return Err(GeometryError::DisjointEdges { index: i });
                        }
                        count => {
                            debug!(index = i, count, "polygon edge join is ambiguous");
                            return Err(GeometryError::AmbiguousJoin { index: i });
                        }
                    }
                }
            };
            vertices.push(vertex);
        }

        let edges = if join {
            edges
                .iter()
                .enumerate()
                .map(|(i, edge)| match edge {
                    Edge::Curve(h) => Edge::Curve(h.trimmed(
                        vertices[i].to_point2(),
                        vertices[(i + 1) % n].to_point2(),
                        TrimDirection::Shorter,
                    )),
                    Edge::Ideal(p) => Edge::Ideal(*p),
                })
                .collect()
        } else {
            edges
        };

        Ok(Self { edges, vertices })
    }

    /// 依次用测地线段连接各顶点
    pub fn from_vertices(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        let n = vertices.len();
        if n < 2 {
            return Err(GeometryError::InvalidGeometry(format!(
                "a polygon needs at least two vertices, got {n}"
            )));
        }
        let edges = (0..n)
            .map(|i| {
                let line = Line::from_points(
                    vertices[i].to_point2(),
                    vertices[(i + 1) % n].to_point2(),
                    true,
                )?;
                Ok(Edge::from(line))
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;
        Ok(Self { edges, vertices })
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// 所有顶点都是理想点
    pub fn is_ideal(&self) -> bool {
        self.vertices.iter().all(Point::is_ideal)
    }

    /// 顶点是否按逆时针（数学坐标系）排列
    pub fn is_ccw(&self) -> Result<bool, GeometryError> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(GeometryError::InvalidGeometry(
                "orientation needs at least three vertices".into(),
            ));
        }

        let Some(k) = self.vertices.iter().position(|v| !v.is_ideal()) else {
            let deg0 = self.vertices[0].theta().to_degrees();
            let deg1 = self.vertices[1].theta().to_degrees();
            let deg2 = self.vertices[2].theta().to_degrees();
            return Ok(wrap_degrees(deg2 - deg0) >= wrap_degrees(deg1 - deg0));
        };

        // 把顶点 k 移到原点、下一个顶点转到正实轴上，再看上一个顶点落在哪一侧
        let next = self.vertices[(k + 1) % n].to_point2();
        let prev = self.vertices[(k + n - 1) % n].to_point2();
        let shift = Transform::shift_origin(self.vertices[k].to_point2(), Some(next));
        let p = shift.apply_to_tuple(prev);
        Ok(wrap_degrees(p.y.atan2(p.x).to_degrees()) <= 180.0)
    }

    /// 每条边偏移 `offset` 后重新连接
    ///
    /// 对逆时针多边形，正的 `offset` 得到更大的多边形，负的得到更小的。
    /// `reverse_order` 为 `true` 时按相反的顺序排列边。
    pub fn offset_polygon(&self, offset: f64, reverse_order: bool) -> Result<Self, GeometryError> {
        let mut edges = self
            .edges
            .par_iter()
            .map(|edge| edge.make_offset(offset))
            .collect::<Result<Vec<_>, GeometryError>>()?;
        if reverse_order {
            edges.reverse();
        }
        Self::from_edges(edges, true)
    }

    /// 描边轮廓的两条边界：第一个多边形保持顶点顺序，第二个顺序相反
    pub fn stroke_outline(&self, width: StrokeWidth) -> Result<(Self, Self), GeometryError> {
        let (hw1, hw2) = match width {
            StrokeWidth::Symmetric(w) => (-w / 2.0, w / 2.0),
            StrokeWidth::Split(hw1, hw2) => (hw1, hw2),
        };
        Ok((
            self.offset_polygon(hw1, false)?,
            self.offset_polygon(hw2, true)?,
        ))
    }

    /// 用于重建多边形的点列表：顶点与边的中点交替排列
    ///
    /// 理想点占位的边不产生点。
    pub fn make_restore_points(&self) -> Vec<Point2> {
        self.vertices
            .iter()
            .zip(&self.edges)
            .filter_map(|(vertex, edge)| {
                edge.as_hypercycle()
                    .map(|h| [vertex.to_point2(), h.shape().midpoint()])
            })
            .flatten()
            .collect()
    }

    /// 从 [`Polygon::make_restore_points`] 的结果重建多边形
    pub fn from_restore_points(points: &[Point2]) -> Result<Self, GeometryError> {
        if points.len() % 2 != 0 || points.len() < 4 {
            return Err(GeometryError::InvalidGeometry(format!(
                "restore point list has invalid length {}",
                points.len()
            )));
        }
        let n = points.len() / 2;
        let mut vertices = Vec::with_capacity(n);
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let start = points[i * 2];
            let mid = points[i * 2 + 1];
            let end = points[(i * 2 + 2) % (n * 2)];
            vertices.push(Point::from_point2(start)?);
            edges.push(Edge::Curve(Hypercycle::from_points(
                start,
                end,
                mid,
                HypercycleOptions::segment(),
            )?));
        }
        Ok(Self { edges, vertices })
    }

    /// 经点映射变换后的多边形
    pub fn transformed<M: PointMap + ?Sized>(&self, map: &M) -> Result<Self, GeometryError> {
        Self::from_restore_points(&map.apply_to_tuples(&self.make_restore_points()))
    }
}
