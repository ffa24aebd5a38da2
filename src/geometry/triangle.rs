// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle built from three edges

use serde::{Deserialize, Serialize};

use super::{Edge, Tolerance, Vertex};
use crate::error::Result;

/// Facet made of three edges plus its position in the input sequence.
///
/// Closure is a query, not a construction precondition, so a malformed
/// facet can still be represented and reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    index: usize,
    edges: [Edge; 3],
}

impl Triangle {
    /// Store three edges in the given order
    pub fn new(index: usize, e1: Edge, e2: Edge, e3: Edge) -> Self {
        Self {
            index,
            edges: [e1, e2, e3],
        }
    }

    /// Edges v0-v1, v1-v2, v2-v0 of a facet.
    ///
    /// Fails with `DegenerateEdge` if any two corners coincide.
    pub fn from_vertices(index: usize, vertices: &[Vertex; 3], tol: &Tolerance) -> Result<Self> {
        let [v0, v1, v2] = *vertices;
        Ok(Self::new(
            index,
            Edge::new(v0, v1, tol)?,
            Edge::new(v1, v2, tol)?,
            Edge::new(v2, v0, tol)?,
        ))
    }

    /// Position of the source facet in the input
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn edges(&self) -> &[Edge; 3] {
        &self.edges
    }

    /// The three distinct corners, following the direction of the first
    /// edge. Edges may run either way round.
    ///
    /// `None` unless the edges are exactly the three sides of one triangle.
    pub fn corners(&self, tol: &Tolerance) -> Option<[Vertex; 3]> {
        let [e0, e1, e2] = &self.edges;
        let (c0, c1) = (*e0.start(), *e0.end());
        let is_known = |p: &Vertex| tol.same_point(p, &c0) || tol.same_point(p, &c1);

        let c2 = match (is_known(e1.start()), is_known(e1.end())) {
            (true, false) => *e1.end(),
            (false, true) => *e1.start(),
            _ => return None,
        };

        let s1 = Edge::new(c1, c2, tol).ok()?;
        let s2 = Edge::new(c2, c0, tol).ok()?;
        let sides = (Edge::same_edge(e1, &s1, tol) && Edge::same_edge(e2, &s2, tol))
            || (Edge::same_edge(e1, &s2, tol) && Edge::same_edge(e2, &s1, tol));
        sides.then_some([c0, c1, c2])
    }

    /// True iff every pair of edges touches at a vertex
    pub fn is_closed_loop(&self, tol: &Tolerance) -> bool {
        let [e0, e1, e2] = &self.edges;
        Edge::has_shared_vertex(e0, e1, tol)
            && Edge::has_shared_vertex(e0, e2, tol)
            && Edge::has_shared_vertex(e1, e2, tol)
    }

    /// Number of edges of `t1` that are also edges of `t2`
    pub fn shared_edge_count(t1: &Triangle, t2: &Triangle, tol: &Tolerance) -> usize {
        t1.edges
            .iter()
            .filter(|x| t2.edges.iter().any(|y| Edge::same_edge(x, y, tol)))
            .count()
    }

    /// True iff the triangles have at least one edge in common
    pub fn are_neighbors(t1: &Triangle, t2: &Triangle, tol: &Tolerance) -> bool {
        t1.edges
            .iter()
            .any(|x| t2.edges.iter().any(|y| Edge::same_edge(x, y, tol)))
    }

    /// Area spanned by the corners, zero when they do not form a triangle
    pub fn area(&self, tol: &Tolerance) -> f64 {
        self.corners(tol)
            .map_or(0.0, |[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn tol() -> Tolerance {
        Tolerance::new(1e-6).unwrap()
    }

    fn tri(index: usize, v: [[f64; 3]; 3]) -> Triangle {
        let vertices = [Point3::from(v[0]), Point3::from(v[1]), Point3::from(v[2])];
        Triangle::from_vertices(index, &vertices, &tol()).unwrap()
    }

    #[test]
    fn test_facet_triangle_is_closed_loop() {
        let t = tri(0, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert!(t.is_closed_loop(&tol()));
        assert_relative_eq!(t.area(&tol()), 0.5);
    }

    #[test]
    fn test_corners_of_mixed_direction_edges() {
        let tol = tol();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        // AB, CB, CA: the last two run against the loop
        let t = Triangle::new(
            0,
            Edge::new(a, b, &tol).unwrap(),
            Edge::new(c, b, &tol).unwrap(),
            Edge::new(c, a, &tol).unwrap(),
        );
        assert!(t.is_closed_loop(&tol));
        assert_eq!(t.corners(&tol), Some([a, b, c]));
        assert_relative_eq!(t.area(&tol), 0.5);
    }

    #[test]
    fn test_star_of_edges_has_no_corners() {
        let tol = tol();
        let hub = Point3::new(0.0, 0.0, 0.0);
        let t = Triangle::new(
            0,
            Edge::new(hub, Point3::new(1.0, 0.0, 0.0), &tol).unwrap(),
            Edge::new(hub, Point3::new(0.0, 1.0, 0.0), &tol).unwrap(),
            Edge::new(hub, Point3::new(0.0, 0.0, 1.0), &tol).unwrap(),
        );
        // Every pair touches at the hub, yet there is no triangle
        assert!(t.is_closed_loop(&tol));
        assert_eq!(t.corners(&tol), None);
        assert_relative_eq!(t.area(&tol), 0.0);
    }

    #[test]
    fn test_disconnected_edge_breaks_loop() {
        let tol = tol();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let far = Point3::new(10.0, 10.0, 10.0);
        let far2 = Point3::new(11.0, 10.0, 10.0);

        let t = Triangle::new(
            3,
            Edge::new(a, b, &tol).unwrap(),
            Edge::new(b, c, &tol).unwrap(),
            Edge::new(far, far2, &tol).unwrap(),
        );
        assert!(!t.is_closed_loop(&tol));
        assert_eq!(t.index(), 3);
    }

    #[test]
    fn test_degenerate_facet_fails() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(Triangle::from_vertices(0, &vertices, &tol()).is_err());
    }

    #[test]
    fn test_neighbors_share_one_edge() {
        let t1 = tri(0, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let t2 = tri(1, [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        let t3 = tri(2, [[5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [5.0, 1.0, 0.0]]);

        assert!(Triangle::are_neighbors(&t1, &t2, &tol()));
        assert!(Triangle::are_neighbors(&t2, &t1, &tol()));
        assert_eq!(Triangle::shared_edge_count(&t1, &t2, &tol()), 1);

        assert!(!Triangle::are_neighbors(&t1, &t3, &tol()));
        assert!(!Triangle::are_neighbors(&t3, &t1, &tol()));
    }

    #[test]
    fn test_touching_at_a_corner_is_not_neighbors() {
        let t1 = tri(0, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let t2 = tri(1, [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 1.0, 0.0]]);
        assert!(!Triangle::are_neighbors(&t1, &t2, &tol()));
    }

    #[test]
    fn test_duplicate_facet_shares_three_edges() {
        let t1 = tri(0, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let t2 = tri(1, [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        assert_eq!(Triangle::shared_edge_count(&t1, &t2, &tol()), 3);
    }
}
