// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex welding over a spatial hash grid
//!
//! STL repeats the coordinates of a shared corner in every facet that uses
//! it. Welding maps each occurrence to a canonical vertex id so edges can be
//! keyed by integer pairs. Cells are `epsilon` wide, so every point within
//! tolerance of a query lies in one of the 27 cells around it.
//!
//! Welding is transitive: occurrences chained by within-tolerance pairs form
//! one connected component and share one id, even when the ends of the chain
//! are further apart than `epsilon`. The result is independent of the order
//! in which pairs are discovered.

use ahash::AHashMap;

use super::{Tolerance, Vertex};

type Cell = [i64; 3];

fn cell_of(tol: &Tolerance, point: &Vertex) -> Cell {
    let inv = 1.0 / tol.epsilon();
    [
        (point.x * inv).floor() as i64,
        (point.y * inv).floor() as i64,
        (point.z * inv).floor() as i64,
    ]
}

fn neighborhood([cx, cy, cz]: Cell) -> impl Iterator<Item = Cell> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dz| {
                [
                    cx.saturating_add(dx),
                    cy.saturating_add(dy),
                    cz.saturating_add(dz),
                ]
            })
        })
    })
}

/// Disjoint sets whose root is always the smallest member
struct Components {
    parent: Vec<usize>,
}

impl Components {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn root(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.root(a), self.root(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Welds a batch of point occurrences into canonical vertices.
///
/// Ids are numbered by the first occurrence of each component, and that
/// occurrence's coordinates are the canonical position.
#[derive(Debug, Clone)]
pub struct VertexWelder {
    tol: Tolerance,
    grid: AHashMap<Cell, Vec<usize>>,
    points: Vec<Vertex>,
    ids: Vec<usize>,
    vertices: Vec<Vertex>,
}

impl VertexWelder {
    /// Weld every occurrence in `points`
    pub fn weld_all(tol: Tolerance, points: Vec<Vertex>) -> Self {
        let mut grid: AHashMap<Cell, Vec<usize>> = AHashMap::with_capacity(points.len() / 4 + 1);
        let mut components = Components::new(points.len());

        for (i, point) in points.iter().enumerate() {
            let cell = cell_of(&tol, point);
            for near in neighborhood(cell) {
                let Some(others) = grid.get(&near) else {
                    continue;
                };
                for &j in others {
                    if tol.same_point(&points[j], point) {
                        components.union(i, j);
                    }
                }
            }
            grid.entry(cell).or_default().push(i);
        }

        let mut canonical: AHashMap<usize, usize> = AHashMap::new();
        let mut vertices = Vec::new();
        let ids = (0..points.len())
            .map(|i| {
                let root = components.root(i);
                *canonical.entry(root).or_insert_with(|| {
                    vertices.push(points[root]);
                    vertices.len() - 1
                })
            })
            .collect();

        Self {
            tol,
            grid,
            points,
            ids,
            vertices,
        }
    }

    /// Canonical id of occurrence `occurrence`
    pub fn id_of(&self, occurrence: usize) -> usize {
        self.ids[occurrence]
    }

    /// Canonical id of every occurrence, in input order
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Canonical id of a point within tolerance of any welded occurrence.
    /// Ties go to the lowest id.
    pub fn find(&self, point: &Vertex) -> Option<usize> {
        neighborhood(cell_of(&self.tol, point))
            .filter_map(|cell| self.grid.get(&cell))
            .flatten()
            .filter(|&&i| self.tol.same_point(&self.points[i], point))
            .map(|&i| self.ids[i])
            .min()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn weld(eps: f64, points: &[[f64; 3]]) -> VertexWelder {
        let points = points.iter().map(|&p| Point3::from(p)).collect();
        VertexWelder::weld_all(Tolerance::new(eps).unwrap(), points)
    }

    #[test]
    fn test_weld_vertices() {
        let welder = weld(1e-6, &[[0.0, 0.0, 0.0], [1e-8, 0.0, 0.0], [1.0, 0.0, 0.0]]);

        assert_eq!(welder.ids(), &[0, 0, 1]);
        assert_eq!(welder.len(), 2);
    }

    #[test]
    fn test_weld_across_cell_boundary() {
        let eps = 1e-3;
        // Straddles the boundary at x = 1.0
        let welder = weld(eps, &[[1.0 - 0.2 * eps, 0.0, 0.0], [1.0 + 0.2 * eps, 0.0, 0.0]]);
        assert_eq!(welder.id_of(0), welder.id_of(1));
    }

    #[test]
    fn test_first_occurrence_is_canonical() {
        let welder = weld(1e-3, &[[2.0, 2.0, 2.0], [2.0005, 2.0, 2.0]]);
        assert_eq!(welder.vertices(), &[Point3::new(2.0, 2.0, 2.0)]);
    }

    #[test]
    fn test_negative_coordinates() {
        let welder = weld(1e-4, &[[-0.00001, -5.0, 3.0], [0.00001, -5.0, 3.0]]);
        assert_eq!(welder.len(), 1);
    }

    #[test]
    fn test_chain_welds_to_one_component() {
        // Ends are 1.8 * epsilon apart, linked through the middle point
        let welder = weld(1e-3, &[[0.0, 0.0, 0.0], [0.0009, 0.0, 0.0], [0.0018, 0.0, 0.0]]);
        assert_eq!(welder.ids(), &[0, 0, 0]);
        assert_eq!(welder.vertices(), &[Point3::new(0.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_chain_is_order_independent() {
        // The middle link arrives last and joins two existing vertices
        let welder = weld(1e-3, &[[0.0, 0.0, 0.0], [0.0018, 0.0, 0.0], [0.0009, 0.0, 0.0]]);
        assert_eq!(welder.ids(), &[0, 0, 0]);
        assert_eq!(welder.len(), 1);
    }

    #[test]
    fn test_find_resolves_to_component() {
        let welder = weld(1e-3, &[[0.0, 0.0, 0.0], [0.0009, 0.0, 0.0], [0.0018, 0.0, 0.0], [5.0, 0.0, 0.0]]);
        assert_eq!(welder.find(&Point3::new(0.0025, 0.0, 0.0)), Some(0));
        assert_eq!(welder.find(&Point3::new(5.0, 0.0, 0.0)), Some(1));
        assert_eq!(welder.find(&Point3::new(3.0, 0.0, 0.0)), None);
    }
}
