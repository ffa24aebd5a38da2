// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion of a validated mesh into a connectivity-indexed model

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Mesh, Vertex};

/// Face of the output model.
///
/// `vertices` index into [`OutputModel::vertices`]; `source_index` and
/// `neighbors` use input facet indices so diagnostics stay traceable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFace {
    pub source_index: usize,
    pub vertices: [usize; 3],
    pub neighbors: Vec<usize>,
    pub attribute: u16,
}

/// Edge of the output model with the faces (input indices) bordering it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEdge {
    pub vertices: [usize; 2],
    pub faces: Vec<usize>,
}

/// Indexed representation of a mesh: shared vertices, faces by vertex id,
/// explicit edges and neighbor lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputModel {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<OutputFace>,
    pub edges: Vec<OutputEdge>,
    pub bounds: BoundingBox,
    /// Facets in the input, including ones left out of `faces`
    pub facet_count: usize,
}

impl OutputModel {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// V - E + F; 2 for a closed genus-0 surface
    pub fn euler_characteristic(&self) -> i64 {
        self.vertices.len() as i64 - self.edges.len() as i64 + self.faces.len() as i64
    }
}

/// Re-express `mesh` as an [`OutputModel`].
///
/// Only triangles that took part in adjacency become faces; malformed facets
/// are described by the defect list instead.
pub fn convert(mesh: &Mesh) -> OutputModel {
    let faces = mesh
        .indexed_triangles()
        .filter_map(|index| {
            let vertices = mesh.corner_ids(index)?;
            let neighbors = mesh
                .neighbors(index)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default();
            Some(OutputFace {
                source_index: index,
                vertices,
                neighbors,
                attribute: mesh.attribute(index),
            })
        })
        .collect();

    let edges = mesh
        .edges()
        .iter()
        .map(|record| OutputEdge {
            vertices: record.vertices,
            faces: record.triangles.clone(),
        })
        .collect();

    OutputModel {
        vertices: mesh.vertices().to_vec(),
        faces,
        edges,
        bounds: mesh.bounding_box(),
        facet_count: mesh.facet_count(),
    }
}
