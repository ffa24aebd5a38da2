// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Undirected edge between two vertices

use serde::{Deserialize, Serialize};

use super::{Tolerance, Vertex};
use crate::error::{Result, ShipError};

/// Undirected edge.
///
/// Endpoints are stored in construction order, but equality between edges
/// ignores direction. Edges compare by value, never by identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    a: Vertex,
    b: Vertex,
}

impl Edge {
    /// Build an edge, rejecting coincident endpoints
    pub fn new(a: Vertex, b: Vertex, tol: &Tolerance) -> Result<Self> {
        if tol.same_point(&a, &b) {
            return Err(ShipError::DegenerateEdge { a, b });
        }
        Ok(Self { a, b })
    }

    pub fn start(&self) -> &Vertex {
        &self.a
    }

    pub fn end(&self) -> &Vertex {
        &self.b
    }

    pub fn endpoints(&self) -> [Vertex; 2] {
        [self.a, self.b]
    }

    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// True if `point` is one of the endpoints
    pub fn touches(&self, point: &Vertex, tol: &Tolerance) -> bool {
        tol.same_point(&self.a, point) || tol.same_point(&self.b, point)
    }

    /// True iff any endpoint of `e1` equals any endpoint of `e2`
    pub fn has_shared_vertex(e1: &Edge, e2: &Edge, tol: &Tolerance) -> bool {
        e1.touches(&e2.a, tol) || e1.touches(&e2.b, tol)
    }

    /// True iff both edges connect the same pair of points, in either direction
    pub fn same_edge(e1: &Edge, e2: &Edge, tol: &Tolerance) -> bool {
        let forward = tol.same_point(&e1.a, &e2.a) && tol.same_point(&e1.b, &e2.b);
        forward || (tol.same_point(&e1.a, &e2.b) && tol.same_point(&e1.b, &e2.a))
    }
}
