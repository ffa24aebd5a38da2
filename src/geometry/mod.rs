// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - edges, triangles and adjacency reconstruction

mod adjacency;
mod bbox;
mod defect;
mod edge;
pub mod primitives;
mod tolerance;
mod triangle;
mod weld;

pub use adjacency::{AdjacencyStrategy, EdgeKey, EdgeRecord, Mesh, MeshBuilder};
pub use bbox::BoundingBox;
pub use defect::{Defect, DefectKind, DefectList, MalformedReason};
pub use edge::Edge;
pub use tolerance::{Tolerance, Vertex};
pub use triangle::Triangle;
pub use weld::VertexWelder;
