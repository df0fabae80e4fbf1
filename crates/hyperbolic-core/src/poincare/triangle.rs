//! 双曲三角形
//!
//! 恰好三条边的 [`Polygon`]，额外提供边的内外偏移、δ-slim 判定以及描边用的
//! 端点封口与转角连接。
//!
//! 边与顶点的下标按 3 取模：顶点 `i` 是边 `i - 1` 的终点、边 `i` 的起点。

use super::circle::Circle;
use super::hypercycle::Hypercycle;
use super::point::Point;
use super::polygon::{Edge, Polygon};
use crate::error::GeometryError;
use crate::euclid::{Arc, Shape, TrimDirection};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::{debug, trace};

/// 求最小 δ 时加倍的上限
const MAX_DOUBLINGS: i32 = 8;

/// 二分结束时的步长指数
const BISECTION_BITS: i32 = 44;

/// 顶点偏移点的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexOffset {
    /// 过顶点的垂线与内侧偏移曲线的交点
    Inner,
    /// 过顶点的垂线与外侧偏移曲线的交点
    Outer,
    /// 边上距顶点 `|offset|` 的点
    OnEdge,
}

/// 双曲三角形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Polygon", into = "Polygon")]
pub struct Triangle(Polygon);

impl Triangle {
    /// 由三条边构造，见 [`Polygon::from_edges`]
    pub fn from_edges(edges: Vec<Edge>, join: bool) -> Result<Self, GeometryError> {
        check_count("edges", edges.len())?;
        Self::try_from(Polygon::from_edges(edges, join)?)
    }

    /// 用测地线段连接三个顶点
    pub fn from_vertices(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        check_count("vertices", vertices.len())?;
        Self::try_from(Polygon::from_vertices(vertices)?)
    }

    pub fn polygon(&self) -> &Polygon {
        &self.0
    }

    pub fn into_polygon(self) -> Polygon {
        self.0
    }

    fn side(&self, index: usize) -> Result<&Hypercycle, GeometryError> {
        self.0.edges()[index % 3]
            .as_hypercycle()
            .ok_or_else(|| GeometryError::InvalidGeometry(format!("edge {index} is an ideal point")))
    }

    fn vertex(&self, index: usize) -> Point {
        self.0.vertices()[index % 3]
    }

    /// 第 `index` 条边距离 `|offset|` 的超圆
    ///
    /// `inner` 为 `true` 时位于三角形内侧，否则位于外侧。
    pub fn offset_edge(
        &self,
        index: usize,
        offset: f64,
        inner: bool,
    ) -> Result<Hypercycle, GeometryError> {
        // 逆时针三角形的内部在每条边的左侧，即负偏移方向
        let inward = if self.is_ccw()? {
            -offset.abs()
        } else {
            offset.abs()
        };
        let offset = if inner { inward } else { -inward };
        self.side(index)?.make_offset(offset)
    }

    /// 每条边是否都被另外两条边的 δ 邻域覆盖
    pub fn is_delta_slim(&self, delta: f64) -> Result<bool, GeometryError> {
        for i in 0..3 {
            let edge = self.side(i)?;
            let from_prev = inner_crossings(edge, &self.offset_edge(i + 2, delta, true)?)?;
            let from_next = inner_crossings(edge, &self.offset_edge(i + 1, delta, true)?)?;
            let (p1, p2) = match (from_prev.as_slice(), from_next.as_slice()) {
                ([], _) | (_, []) => {
                    trace!(edge = i, delta, "edge lies inside a single neighbourhood");
                    continue;
                }
                ([p1], [p2]) => (*p1, *p2),
                _ => {
                    return Err(GeometryError::InvalidGeometry(format!(
                        "intersection with edge {i} is ambiguous"
                    )))
                }
            };
            let covered = edge
                .trimmed(
                    self.vertex(i).to_point2(),
                    p1.to_point2(),
                    TrimDirection::Inherit,
                )
                .is_point_on_segment(p2.to_point2());
            if !covered {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 使三角形 δ-slim 的最小 δ
    ///
    /// 从 1 开始加倍直到满足条件，再二分到 `2^-44`。
    pub fn slimness(&self) -> Result<f64, GeometryError> {
        let mut delta = 1.0;
        let mut doublings = 0;
        while !self.is_delta_slim(delta)? {
            if doublings == MAX_DOUBLINGS {
                return Err(GeometryError::InvalidGeometry(format!(
                    "triangle is not {delta}-slim"
                )));
            }
            delta *= 2.0;
            doublings += 1;
        }

        let mut step = delta / 2.0;
        for _ in 0..doublings + BISECTION_BITS {
            if self.is_delta_slim(delta)? {
                delta -= step;
            } else {
                delta += step;
            }
            step /= 2.0;
        }
        if !self.is_delta_slim(delta)? {
            delta += step * 2.0;
        }
        debug!(delta, "triangle slimness");
        Ok(delta)
    }

    /// 顶点 `vertex` 沿边 `edge` 的偏移点
    ///
    /// `vertex` 必须是 `edge` 的端点。理想顶点原样返回。
    pub fn offset_vertex(
        &self,
        vertex: usize,
        edge: usize,
        offset: f64,
        side: VertexOffset,
    ) -> Result<Point, GeometryError> {
        if edge % 3 == (vertex + 1) % 3 {
            return Err(GeometryError::InvalidGeometry(format!(
                "vertex {vertex} is not an endpoint of edge {edge}"
            )));
        }
        let vert = self.vertex(vertex);
        if vert.is_ideal() {
            return Ok(vert);
        }

        let hcycle = self.side(edge)?;
        let perp = hcycle.make_perpendicular(vert.to_point2())?;
        let points = match side {
            VertexOffset::OnEdge => {
                // 垂线的正偏移沿边的前进方向
                let shift = if vertex % 3 == edge % 3 {
                    offset.abs()
                } else {
                    -offset.abs()
                };
                hcycle.intersections_with_hcycle(&perp.make_offset(shift)?)?
            }
            VertexOffset::Inner | VertexOffset::Outer => self
                .offset_edge(edge, offset, side == VertexOffset::Inner)?
                .intersections_with_hcycle(perp.hypercycle())?,
        };
        single_point(points, "offset vertex")
    }

    /// 与边 `index` 相对的顶点处，两条相邻边内侧偏移曲线的交点
    pub fn offset_edge_intersection(
        &self,
        index: usize,
        offset: f64,
    ) -> Result<Point, GeometryError> {
        let h1 = self.offset_edge(index + 1, offset, true)?;
        let h2 = self.offset_edge(index + 2, offset, true)?;
        let points = h1
            .intersections_with_hcycle(&h2)?
            .into_iter()
            .filter(|p| !p.is_ideal())
            .collect();
        single_point(points, "offset edge intersection")
    }

    /// 边 `edge` 在端点 `vertex` 处的圆形封口
    ///
    /// 从内侧偏移点绕过顶点到外侧偏移点，半径为 `|offset|`。
    pub fn end_cap(&self, vertex: usize, edge: usize, offset: f64) -> Result<Edge, GeometryError> {
        let vert = self.vertex(vertex);
        if vert.is_ideal() {
            return Ok(Edge::Ideal(vert));
        }
        let start = self.offset_vertex(vertex, edge, offset, VertexOffset::Inner)?;
        let mid = self.offset_vertex(vertex, edge, offset, VertexOffset::OnEdge)?;
        let end = self.offset_vertex(vertex, edge, offset, VertexOffset::Outer)?;
        if let Some(ideal) = [start, mid, end].into_iter().find(Point::is_ideal) {
            return Ok(Edge::Ideal(ideal));
        }
        let arc = Arc::from_points(start.to_point2(), end.to_point2(), mid.to_point2(), true)?;
        Ok(Edge::Curve(Hypercycle::new(Shape::Arc(arc), true)?))
    }

    /// 顶点 `vertex` 处的圆角连接
    ///
    /// 位于转角外侧，从边 `vertex - 1` 的外侧偏移点到边 `vertex` 的外侧偏移点。
    pub fn mid_cap(&self, vertex: usize, offset: f64) -> Result<Edge, GeometryError> {
        let vert = self.vertex(vertex);
        if vert.is_ideal() {
            return Ok(Edge::Ideal(vert));
        }
        let start = self.offset_vertex(vertex, vertex + 2, offset, VertexOffset::Outer)?;
        let end = self.offset_vertex(vertex, vertex, offset, VertexOffset::Outer)?;
        if let Some(ideal) = [start, end].into_iter().find(Point::is_ideal) {
            return Ok(Edge::Ideal(ideal));
        }
        let circle = Circle::from_center_radius(vert, offset.abs(), true)?;
        let shape = circle.shape();
        let arc = Arc::from_points_with_center(
            start.to_point2(),
            end.to_point2(),
            shape.center,
            Some(shape.radius),
            self.is_ccw()?,
        )?;
        Ok(Edge::Curve(Hypercycle::new(Shape::Arc(arc), true)?))
    }
}

impl Deref for Triangle {
    type Target = Polygon;

    fn deref(&self) -> &Polygon {
        &self.0
    }
}

impl TryFrom<Polygon> for Triangle {
    type Error = GeometryError;

    fn try_from(polygon: Polygon) -> Result<Self, Self::Error> {
        check_count("edges", polygon.edges().len())?;
        if polygon.edges().iter().any(|e| e.as_hypercycle().is_none()) {
            return Err(GeometryError::InvalidGeometry(
                "triangle edges must be curves".into(),
            ));
        }
        Ok(Self(polygon))
    }
}

impl From<Triangle> for Polygon {
    fn from(triangle: Triangle) -> Self {
        triangle.0
    }
}

fn check_count(what: &str, count: usize) -> Result<(), GeometryError> {
    if count == 3 {
        Ok(())
    } else {
        Err(GeometryError::InvalidGeometry(format!(
            "a triangle needs 3 {what}, got {count}"
        )))
    }
}

/// 边与偏移曲线在圆盘内部的交点，理想点不计
fn inner_crossings(edge: &Hypercycle, other: &Hypercycle) -> Result<Vec<Point>, GeometryError> {
    Ok(edge
        .segment_intersections_with_hcycle(other)?
        .into_iter()
        .filter(|p| !p.is_ideal())
        .collect())
}

fn single_point(points: Vec<Point>, what: &str) -> Result<Point, GeometryError> {
    match points.as_slice() {
        [p] => Ok(*p),
        _ => Err(GeometryError::InvalidGeometry(format!(
            "expected a single {what}, found {}",
            points.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;

    fn triangle() -> Triangle {
        let vertices = [90.0, 210.0, 330.0]
            .iter()
            .map(|deg| Point::from_polar_euclid_degrees(0.3, *deg).unwrap())
            .collect();
        Triangle::from_vertices(vertices).unwrap()
    }

    fn ideal_triangle() -> Triangle {
        let vertices = [0.0, 120.0, 240.0]
            .iter()
            .map(|deg| Point::ideal_from_degrees(*deg))
            .collect();
        Triangle::from_vertices(vertices).unwrap()
    }

    #[test]
    fn test_requires_three_sides() {
        let vertices: Vec<Point> = [0.0, 90.0, 180.0, 270.0]
            .iter()
            .map(|deg| Point::from_polar_euclid_degrees(0.4, *deg).unwrap())
            .collect();
        assert!(matches!(
            Triangle::from_vertices(vertices.clone()),
            Err(GeometryError::InvalidGeometry(_))
        ));
        let square = Polygon::from_vertices(vertices).unwrap();
        assert!(Triangle::try_from(square).is_err());

        let t = triangle();
        let rebuilt = Triangle::from_edges(t.edges().to_vec(), true).unwrap();
        for (a, b) in rebuilt.vertices().iter().zip(t.vertices()) {
            assert!((a.to_point2() - b.to_point2()).norm() < 1e-9);
        }
        assert!(t.is_ccw().unwrap());
        assert!(ideal_triangle().is_ideal());
    }

    #[test]
    fn test_offset_edge_sides() {
        let t = triangle();
        let inner = t.offset_edge(0, 0.1, true).unwrap();
        let outer = t.offset_edge(0, -0.1, false).unwrap();
        let base = t.edges()[0].as_hypercycle().unwrap().shape().midpoint();
        let inner_mid = inner.midpoint_euclid().unwrap();
        let outer_mid = outer.midpoint_euclid().unwrap();
        // 三角形以原点为中心，内侧更靠近原点
        assert!(inner_mid.euclid_radius() < base.coords.norm());
        assert!(outer_mid.euclid_radius() > base.coords.norm());

        let mut reversed = t.vertices().to_vec();
        reversed.reverse();
        let cw = Triangle::from_vertices(reversed).unwrap();
        let inner = cw.offset_edge(1, 0.1, true).unwrap();
        assert!(inner.midpoint_euclid().unwrap().euclid_radius() < base.coords.norm());
    }

    #[test]
    fn test_delta_slim() {
        let t = triangle();
        assert!(t.is_delta_slim(0.5).unwrap());
        assert!(!t.is_delta_slim(0.4).unwrap());
        assert!((t.slimness().unwrap() - 0.4330208).abs() < 1e-5);
    }

    #[test]
    fn test_ideal_triangle_slimness() {
        let t = ideal_triangle();
        assert!(!t.is_delta_slim(0.8).unwrap());
        assert!(t.is_delta_slim(1.0).unwrap());
        assert!((t.slimness().unwrap() - (1.0 + SQRT_2).ln()).abs() < 1e-5);
    }

    #[test]
    fn test_offset_vertex() {
        let t = triangle();
        let v0 = t.vertices()[0];
        let v1 = t.vertices()[1];
        let side = v0.distance_to(&v1);

        let inner = t.offset_vertex(0, 0, 0.1, VertexOffset::Inner).unwrap();
        let outer = t.offset_vertex(0, 0, 0.1, VertexOffset::Outer).unwrap();
        assert!((inner.distance_to(&v0) - 0.1).abs() < 1e-9);
        assert!((outer.distance_to(&v0) - 0.1).abs() < 1e-9);
        assert!((inner.distance_to(&outer) - 0.2).abs() < 1e-9);
        assert!(inner.hr() < v0.hr());
        assert!(outer.hr() > v0.hr());

        let on_start = t.offset_vertex(0, 0, 0.1, VertexOffset::OnEdge).unwrap();
        assert!((on_start.distance_to(&v0) - 0.1).abs() < 1e-9);
        assert!((on_start.distance_to(&v1) - (side - 0.1)).abs() < 1e-9);
        let on_end = t.offset_vertex(1, 0, 0.1, VertexOffset::OnEdge).unwrap();
        assert!((on_end.distance_to(&v0) - (side - 0.1)).abs() < 1e-9);

        assert!(t.offset_vertex(0, 1, 0.1, VertexOffset::Inner).is_err());
        let ideal = ideal_triangle();
        assert_eq!(
            ideal.offset_vertex(0, 0, 0.1, VertexOffset::Outer).unwrap(),
            Point::ideal(0.0)
        );
    }

    #[test]
    fn test_offset_edge_intersection_matches_shrunk_polygon() {
        let t = triangle();
        let shrunk = t.offset_polygon(-0.1, false).unwrap();
        let corner = t.offset_edge_intersection(0, 0.1).unwrap();
        assert!((corner.to_point2() - shrunk.vertices()[2].to_point2()).norm() < 1e-9);
        assert!((corner.theta().to_degrees() - 330.0).abs() < 1e-6);
    }

    #[test]
    fn test_end_cap() {
        let t = triangle();
        let v0 = t.vertices()[0];
        let v1 = t.vertices()[1];
        let cap = t.end_cap(0, 0, 0.1).unwrap();
        let h = cap.as_hypercycle().unwrap();
        assert!(h.is_segment());
        let start = t.offset_vertex(0, 0, 0.1, VertexOffset::Inner).unwrap();
        let end = t.offset_vertex(0, 0, 0.1, VertexOffset::Outer).unwrap();
        assert_eq!(h.start_point().unwrap(), start);
        assert_eq!(h.end_point().unwrap(), end);

        let mid = h.midpoint_euclid().unwrap();
        assert!((mid.distance_to(&v0) - 0.1).abs() < 1e-9);
        assert!(mid.distance_to(&v1) > v0.distance_to(&v1));

        assert_eq!(
            ideal_triangle().end_cap(1, 0, 0.1).unwrap(),
            Edge::Ideal(Point::ideal_from_degrees(120.0))
        );
    }

    #[test]
    fn test_mid_cap() {
        let t = triangle();
        let v0 = t.vertices()[0];
        let cap = t.mid_cap(0, 0.1).unwrap();
        let h = cap.as_hypercycle().unwrap();
        let start = t.offset_vertex(0, 2, 0.1, VertexOffset::Outer).unwrap();
        let end = t.offset_vertex(0, 0, 0.1, VertexOffset::Outer).unwrap();
        assert_eq!(h.start_point().unwrap(), start);
        assert_eq!(h.end_point().unwrap(), end);

        // 圆角在转角外侧
        let mid = h.midpoint_euclid().unwrap();
        assert!((mid.distance_to(&v0) - 0.1).abs() < 1e-9);
        assert!(mid.hr() > v0.hr());
    }

    #[test]
    fn test_serde_round_trip() {
        let t = triangle();
        let json = serde_json::to_string(&t).unwrap();
        let back: Triangle = serde_json::from_str(&json).unwrap();
        assert_eq!(back.vertices(), t.vertices());
    }
}
