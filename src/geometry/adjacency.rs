// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle adjacency reconstruction
//!
//! Turns a triangle soup into [`Triangle`]s, groups their edges and derives
//! which triangles are neighbors. Two strategies back the same result:
//!
//! - `Pairwise` compares the welded edge keys of every pair of triangles.
//!   Quadratic, meant for small meshes.
//! - `EdgeIndex` groups edges under their key and pairs up the triangles
//!   that co-occur under one.
//!
//! Both see the same edge keys: sorted pairs of canonical vertex ids from one
//! transitive weld, so they always agree.
//!
//! Both are deterministic: defects are ordered by first occurrence in the
//! input, and parallel work never changes the result.

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{
    BoundingBox, Defect, DefectList, MalformedReason, Tolerance, Triangle, Vertex, VertexWelder,
};
use crate::config::ShipConfig;
use crate::error::{Result, ShipError};
use crate::io::RawFacet;

/// How neighbor relations are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjacencyStrategy {
    /// Pairwise up to `pairwise_limit` triangles, edge index above
    Auto,
    Pairwise,
    EdgeIndex,
}

impl AdjacencyStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjacencyStrategy::Auto => "auto",
            AdjacencyStrategy::Pairwise => "pairwise",
            AdjacencyStrategy::EdgeIndex => "edge-index",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(AdjacencyStrategy::Auto),
            "pairwise" => Some(AdjacencyStrategy::Pairwise),
            "edge-index" | "edge_index" | "index" => Some(AdjacencyStrategy::EdgeIndex),
            _ => None,
        }
    }
}

/// Canonical, order-independent key of an edge: sorted welded vertex ids
pub type EdgeKey = (usize, usize);

#[inline]
fn edge_key(a: usize, b: usize) -> EdgeKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One physical edge and every triangle that uses it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Welded vertex ids, ascending
    pub vertices: [usize; 2],
    /// Geometry of the first occurrence
    pub endpoints: [Vertex; 2],
    /// Triangle indices in input order
    pub triangles: Vec<usize>,
    /// Triangle index and edge slot of the first occurrence
    pub first: (usize, usize),
}

impl EdgeRecord {
    pub fn is_boundary(&self) -> bool {
        self.triangles.len() == 1
    }

    pub fn is_manifold(&self) -> bool {
        self.triangles.len() == 2
    }

    pub fn is_non_manifold(&self) -> bool {
        self.triangles.len() > 2
    }
}

/// Triangles of a model with their derived connectivity
#[derive(Debug, Clone)]
pub struct Mesh {
    tolerance: Tolerance,
    strategy: AdjacencyStrategy,
    facet_count: usize,
    triangles: Vec<Triangle>,
    /// Position in `triangles` for each input index
    lookup: Vec<Option<usize>>,
    /// Welded corner ids for triangles that entered the index
    corners: BTreeMap<usize, [usize; 3]>,
    attributes: Vec<u16>,
    welder: VertexWelder,
    edges: Vec<EdgeRecord>,
    edge_lookup: AHashMap<EdgeKey, usize>,
    adjacency: BTreeMap<usize, BTreeSet<usize>>,
    bounds: BoundingBox,
}

impl Mesh {
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Strategy that actually ran (never `Auto`)
    pub fn strategy(&self) -> AdjacencyStrategy {
        self.strategy
    }

    /// Number of facets in the input, including malformed ones
    pub fn facet_count(&self) -> usize {
        self.facet_count
    }

    /// Triangles that could be constructed, in input order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangle built from input facet `index`
    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.lookup
            .get(index)
            .copied()
            .flatten()
            .map(|pos| &self.triangles[pos])
    }

    /// Welded corner ids of a triangle that took part in adjacency
    pub fn corner_ids(&self, index: usize) -> Option<[usize; 3]> {
        self.corners.get(&index).copied()
    }

    /// Indices of triangles that took part in adjacency, ascending
    pub fn indexed_triangles(&self) -> impl Iterator<Item = usize> + '_ {
        self.corners.keys().copied()
    }

    /// Auxiliary attribute word of input facet `index`
    pub fn attribute(&self, index: usize) -> u16 {
        self.attributes.get(index).copied().unwrap_or(0)
    }

    /// Canonical vertices, in first-occurrence order
    pub fn vertices(&self) -> &[Vertex] {
        self.welder.vertices()
    }

    pub fn vertex_count(&self) -> usize {
        self.welder.len()
    }

    /// Edge records in first-occurrence order
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Triangles using the edge between two points, if such an edge exists
    pub fn edge_triangles(&self, a: &Vertex, b: &Vertex) -> Option<&[usize]> {
        let ia = self.welder.find(a)?;
        let ib = self.welder.find(b)?;
        self.edge_lookup
            .get(&edge_key(ia, ib))
            .map(|&pos| self.edges[pos].triangles.as_slice())
    }

    /// Full neighbor relation keyed by triangle index
    pub fn adjacency(&self) -> &BTreeMap<usize, BTreeSet<usize>> {
        &self.adjacency
    }

    pub fn neighbors(&self, index: usize) -> Option<&BTreeSet<usize>> {
        self.adjacency.get(&index)
    }

    /// Triangles `a` and `b` share exactly one edge
    pub fn are_neighbors(&self, a: usize, b: usize) -> bool {
        self.adjacency
            .get(&a)
            .map_or(false, |neighbors| neighbors.contains(&b))
    }

    /// Every edge borders exactly two triangles
    pub fn is_watertight(&self) -> bool {
        !self.edges.is_empty() && self.edges.iter().all(EdgeRecord::is_manifold)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }
}

/// Builds a [`Mesh`] and its [`DefectList`] from input triangles
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    tolerance: Tolerance,
    strategy: AdjacencyStrategy,
    pairwise_limit: usize,
    parallel: bool,
}

impl MeshBuilder {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            strategy: AdjacencyStrategy::Auto,
            pairwise_limit: ShipConfig::default().pairwise_limit,
            parallel: false,
        }
    }

    pub fn from_config(config: &ShipConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tolerance: config.tolerance()?,
            strategy: config.strategy,
            pairwise_limit: config.pairwise_limit,
            parallel: config.parallel,
        })
    }

    pub fn strategy(mut self, strategy: AdjacencyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Strategy that will run for `triangle_count` triangles
    pub fn resolve_strategy(&self, triangle_count: usize) -> AdjacencyStrategy {
        match self.strategy {
            AdjacencyStrategy::Auto if triangle_count <= self.pairwise_limit => {
                AdjacencyStrategy::Pairwise
            }
            AdjacencyStrategy::Auto => AdjacencyStrategy::EdgeIndex,
            other => other,
        }
    }

    /// Build from raw facets. Facets with coincident corners become
    /// `MalformedTriangle` defects instead of aborting the build.
    pub fn build(&self, facets: &[RawFacet]) -> (Mesh, DefectList) {
        let mut triangles = Vec::with_capacity(facets.len());
        let mut degenerate = Vec::new();

        for (index, facet) in facets.iter().enumerate() {
            match Triangle::from_vertices(index, &facet.vertices, &self.tolerance) {
                Ok(triangle) => triangles.push(triangle),
                Err(err) => {
                    debug!("facet {} rejected: {}", index, err);
                    let endpoints = match err {
                        ShipError::DegenerateEdge { a, b } => Some([a, b]),
                        _ => None,
                    };
                    degenerate.push((index, endpoints));
                }
            }
        }

        let bounds = BoundingBox::from_points(facets.iter().flat_map(|f| f.vertices.iter()));
        let attributes = facets.iter().map(|f| f.attribute).collect();
        self.assemble(facets.len(), triangles, degenerate, attributes, bounds)
    }

    /// Build from already constructed triangles, e.g. ones assembled from
    /// arbitrary edges. `facet_count` must exceed every triangle index.
    pub fn build_from_triangles(
        &self,
        facet_count: usize,
        triangles: Vec<Triangle>,
    ) -> (Mesh, DefectList) {
        let bounds = BoundingBox::from_points(
            triangles
                .iter()
                .flat_map(|t| t.edges().iter())
                .flat_map(|e| [e.start(), e.end()]),
        );
        self.assemble(facet_count, triangles, Vec::new(), vec![0; facet_count], bounds)
    }

    fn assemble(
        &self,
        facet_count: usize,
        triangles: Vec<Triangle>,
        degenerate: Vec<(usize, Option<[Vertex; 2]>)>,
        attributes: Vec<u16>,
        bounds: BoundingBox,
    ) -> (Mesh, DefectList) {
        let tol = self.tolerance;
        let strategy = self.resolve_strategy(triangles.len());

        let closed: Vec<bool> = if self.parallel {
            triangles.par_iter().map(|t| t.is_closed_loop(&tol)).collect()
        } else {
            triangles.iter().map(|t| t.is_closed_loop(&tol)).collect()
        };

        // (triangle index, slot, tiebreak) -> defect
        let mut ordered: Vec<((usize, usize, usize), Defect)> = degenerate
            .into_iter()
            .map(|(index, endpoints)| {
                let defect = Defect::MalformedTriangle {
                    triangle: index,
                    reason: MalformedReason::DegenerateEdge,
                    endpoints,
                };
                ((index, 0, 0), defect)
            })
            .collect();

        // Weld both endpoints of every edge of every closed loop at once
        let points: Vec<Vertex> = triangles
            .iter()
            .zip(&closed)
            .filter(|(_, closed)| **closed)
            .flat_map(|(t, _)| t.edges().iter())
            .flat_map(|e| [*e.start(), *e.end()])
            .collect();
        let welder = VertexWelder::weld_all(tol, points);
        let mut occurrences = welder.ids().chunks_exact(6);

        let mut corners = BTreeMap::new();
        let mut members: Vec<(usize, [EdgeKey; 3])> = Vec::with_capacity(triangles.len());

        for (pos, triangle) in triangles.iter().enumerate() {
            let index = triangle.index();
            if !closed[pos] {
                ordered.push((
                    (index, 0, 0),
                    Defect::MalformedTriangle {
                        triangle: index,
                        reason: MalformedReason::OpenLoop,
                        endpoints: None,
                    },
                ));
                continue;
            }

            let Some(welded) = occurrences.next() else {
                break;
            };
            let ids = [
                [welded[0], welded[1]],
                [welded[2], welded[3]],
                [welded[4], welded[5]],
            ];

            match loop_corners(&ids) {
                Ok(face) => {
                    corners.insert(index, face);
                    members.push((pos, ids.map(|[a, b]| edge_key(a, b))));
                }
                Err((reason, slot)) => {
                    let endpoints = slot.map(|slot| triangle.edges()[slot].endpoints());
                    ordered.push((
                        (index, 0, 0),
                        Defect::MalformedTriangle {
                            triangle: index,
                            reason,
                            endpoints,
                        },
                    ));
                }
            }
        }

        let (edges, edge_lookup) = group_edges(&triangles, &members);

        let shared = match strategy {
            AdjacencyStrategy::Pairwise => {
                let keyed: Vec<(usize, [EdgeKey; 3])> = members
                    .iter()
                    .map(|(pos, keys)| (triangles[*pos].index(), *keys))
                    .collect();
                pairwise_sharing(&keyed, self.parallel)
            }
            _ => indexed_sharing(&edges),
        };

        let mut adjacency: BTreeMap<usize, BTreeSet<usize>> =
            corners.keys().map(|&index| (index, BTreeSet::new())).collect();

        for (&(a, b), &count) in &shared {
            if count == 1 {
                adjacency.entry(a).or_default().insert(b);
                adjacency.entry(b).or_default().insert(a);
            } else {
                ordered.push((
                    (b, 4, a),
                    Defect::OverlappingFacets {
                        triangles: [a, b],
                        shared_edges: count,
                    },
                ));
            }
        }

        for record in &edges {
            let (first_triangle, slot) = record.first;
            if record.is_boundary() {
                ordered.push((
                    (first_triangle, 1 + slot, 0),
                    Defect::BoundaryEdge {
                        triangle: first_triangle,
                        endpoints: record.endpoints,
                    },
                ));
            } else if record.is_non_manifold() {
                ordered.push((
                    (first_triangle, 1 + slot, 0),
                    Defect::NonManifoldEdge {
                        triangles: record.triangles.clone(),
                        endpoints: record.endpoints,
                    },
                ));
            }
        }

        ordered.sort_by_key(|(key, _)| *key);
        let defects: DefectList = ordered
            .into_iter()
            .map(|(_, defect)| defect)
            .collect::<Vec<_>>()
            .into();

        let mut lookup = vec![None; facet_count];
        for (pos, triangle) in triangles.iter().enumerate() {
            if let Some(slot) = lookup.get_mut(triangle.index()) {
                *slot = Some(pos);
            }
        }

        debug!(
            "adjacency ({}): {} facets, {} triangles, {} vertices, {} edges, {} defects",
            strategy.as_str(),
            facet_count,
            triangles.len(),
            welder.len(),
            edges.len(),
            defects.len()
        );

        let mesh = Mesh {
            tolerance: tol,
            strategy,
            facet_count,
            triangles,
            lookup,
            corners,
            attributes,
            welder,
            edges,
            edge_lookup,
            adjacency,
            bounds,
        };

        (mesh, defects)
    }
}

/// Corner ids of a welded edge loop, following the direction of its first
/// edge.
///
/// The loop is a triangle iff it uses exactly three ids, each by two edges.
/// On failure returns the reason and the slot of the offending edge, if any.
fn loop_corners(
    ids: &[[usize; 2]; 3],
) -> std::result::Result<[usize; 3], (MalformedReason, Option<usize>)> {
    if let Some(slot) = ids.iter().position(|[a, b]| a == b) {
        return Err((MalformedReason::DegenerateEdge, Some(slot)));
    }

    let keys = ids.map(|[a, b]| edge_key(a, b));
    if let Some(slot) = (1..3).find(|&i| keys[..i].contains(&keys[i])) {
        return Err((MalformedReason::DegenerateEdge, Some(slot)));
    }

    let mut used = [ids[0][0], ids[0][1], ids[1][0], ids[1][1], ids[2][0], ids[2][1]];
    used.sort_unstable();
    let paired = used[0] == used[1] && used[2] == used[3] && used[4] == used[5];
    if !paired || used[1] == used[2] || used[3] == used[4] {
        return Err((MalformedReason::OpenLoop, None));
    }

    let [c0, c1] = ids[0];
    let c2 = [used[0], used[2], used[4]]
        .into_iter()
        .find(|&id| id != c0 && id != c1)
        .ok_or((MalformedReason::OpenLoop, None))?;
    Ok([c0, c1, c2])
}

/// Group edges of the indexed triangles under their canonical key
fn group_edges(
    triangles: &[Triangle],
    members: &[(usize, [EdgeKey; 3])],
) -> (Vec<EdgeRecord>, AHashMap<EdgeKey, usize>) {
    let mut edges: Vec<EdgeRecord> = Vec::with_capacity(members.len() * 3 / 2 + 1);
    let mut lookup: AHashMap<EdgeKey, usize> = AHashMap::with_capacity(edges.capacity());

    for (pos, keys) in members {
        let triangle = &triangles[*pos];
        for (slot, (key, edge)) in keys.iter().zip(triangle.edges()).enumerate() {
            match lookup.get(key) {
                Some(&record) => edges[record].triangles.push(triangle.index()),
                None => {
                    lookup.insert(*key, edges.len());
                    edges.push(EdgeRecord {
                        vertices: [key.0, key.1],
                        endpoints: edge.endpoints(),
                        triangles: vec![triangle.index()],
                        first: (triangle.index(), slot),
                    });
                }
            }
        }
    }

    (edges, lookup)
}

/// Shared-edge counts for every pair of triangles co-occurring under a key
fn indexed_sharing(edges: &[EdgeRecord]) -> BTreeMap<(usize, usize), usize> {
    let mut shared = BTreeMap::new();
    for record in edges.iter().filter(|r| r.triangles.len() > 1) {
        for (i, &a) in record.triangles.iter().enumerate() {
            for &b in &record.triangles[i + 1..] {
                *shared.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
    }
    shared
}

/// Shared-edge counts found by comparing the welded edge keys of every pair
/// of triangles
fn pairwise_sharing(
    keyed: &[(usize, [EdgeKey; 3])],
    parallel: bool,
) -> BTreeMap<(usize, usize), usize> {
    let row = |i: usize| -> Vec<((usize, usize), usize)> {
        let (a, keys_a) = &keyed[i];
        keyed[i + 1..]
            .iter()
            .filter_map(|(b, keys_b)| {
                let count = keys_a.iter().filter(|k| keys_b.contains(k)).count();
                (count > 0).then(|| (((*a).min(*b), (*a).max(*b)), count))
            })
            .collect()
    };

    let rows: Vec<Vec<((usize, usize), usize)>> = if parallel {
        (0..keyed.len()).into_par_iter().map(row).collect()
    } else {
        (0..keyed.len()).map(row).collect()
    };

    rows.into_iter().flatten().collect()
}
