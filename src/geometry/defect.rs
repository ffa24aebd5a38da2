// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Defect taxonomy found while building adjacency

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Vertex;

/// Why a facet could not be treated as a well-formed triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedReason {
    /// Two corners coincide under the tolerance
    DegenerateEdge,
    /// The three edges do not pairwise touch
    OpenLoop,
}

impl MalformedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedReason::DegenerateEdge => "degenerate-edge",
            MalformedReason::OpenLoop => "open-loop",
        }
    }
}

/// Discriminant of [`Defect`], used for counting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefectKind {
    BoundaryEdge,
    NonManifoldEdge,
    MalformedTriangle,
    OverlappingFacets,
}

impl DefectKind {
    pub const ALL: [DefectKind; 4] = [
        DefectKind::BoundaryEdge,
        DefectKind::NonManifoldEdge,
        DefectKind::MalformedTriangle,
        DefectKind::OverlappingFacets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefectKind::BoundaryEdge => "boundary-edge",
            DefectKind::NonManifoldEdge => "non-manifold-edge",
            DefectKind::MalformedTriangle => "malformed-triangle",
            DefectKind::OverlappingFacets => "overlapping-facets",
        }
    }
}

/// A single deviation from closed 2-manifold geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Defect {
    /// Edge used by exactly one triangle
    BoundaryEdge {
        triangle: usize,
        endpoints: [Vertex; 2],
    },
    /// Edge used by three or more triangles
    NonManifoldEdge {
        triangles: Vec<usize>,
        endpoints: [Vertex; 2],
    },
    MalformedTriangle {
        triangle: usize,
        reason: MalformedReason,
        /// Coincident corner pair of a degenerate edge
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoints: Option<[Vertex; 2]>,
    },
    /// Two triangles with more than one edge in common
    OverlappingFacets {
        triangles: [usize; 2],
        shared_edges: usize,
    },
}

impl Defect {
    pub fn kind(&self) -> DefectKind {
        match self {
            Defect::BoundaryEdge { .. } => DefectKind::BoundaryEdge,
            Defect::NonManifoldEdge { .. } => DefectKind::NonManifoldEdge,
            Defect::MalformedTriangle { .. } => DefectKind::MalformedTriangle,
            Defect::OverlappingFacets { .. } => DefectKind::OverlappingFacets,
        }
    }

    /// Every triangle index the defect refers to, ascending
    pub fn triangles(&self) -> Vec<usize> {
        match self {
            Defect::BoundaryEdge { triangle, .. } | Defect::MalformedTriangle { triangle, .. } => {
                vec![*triangle]
            }
            Defect::NonManifoldEdge { triangles, .. } => triangles.clone(),
            Defect::OverlappingFacets { triangles, .. } => triangles.to_vec(),
        }
    }

    pub fn endpoints(&self) -> Option<&[Vertex; 2]> {
        match self {
            Defect::BoundaryEdge { endpoints, .. } | Defect::NonManifoldEdge { endpoints, .. } => {
                Some(endpoints)
            }
            Defect::MalformedTriangle { endpoints, .. } => endpoints.as_ref(),
            Defect::OverlappingFacets { .. } => None,
        }
    }
}

fn fmt_point(f: &mut fmt::Formatter<'_>, p: &Vertex) -> fmt::Result {
    write!(f, "({:.6}, {:.6}, {:.6})", p.x, p.y, p.z)
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.kind().as_str())?;
        match self {
            Defect::BoundaryEdge { triangle, endpoints } => {
                write!(f, "triangle {}, edge ", triangle)?;
                fmt_point(f, &endpoints[0])?;
                f.write_str(" - ")?;
                fmt_point(f, &endpoints[1])
            }
            Defect::NonManifoldEdge {
                triangles,
                endpoints,
            } => {
                let list: Vec<String> = triangles.iter().map(|t| t.to_string()).collect();
                write!(f, "triangles [{}], edge ", list.join(", "))?;
                fmt_point(f, &endpoints[0])?;
                f.write_str(" - ")?;
                fmt_point(f, &endpoints[1])
            }
            Defect::MalformedTriangle {
                triangle,
                reason,
                endpoints,
            } => {
                write!(f, "triangle {} ({})", triangle, reason.as_str())?;
                if let Some([a, b]) = endpoints {
                    f.write_str(", edge ")?;
                    fmt_point(f, a)?;
                    f.write_str(" - ")?;
                    fmt_point(f, b)?;
                }
                Ok(())
            }
            Defect::OverlappingFacets {
                triangles,
                shared_edges,
            } => write!(
                f,
                "triangles [{}, {}] share {} edges",
                triangles[0], triangles[1], shared_edges
            ),
        }
    }
}

/// Ordered defects of one validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefectList {
    defects: Vec<Defect>,
}

impl DefectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, defect: Defect) {
        self.defects.push(defect);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Defect> {
        self.defects.iter()
    }

    pub fn len(&self) -> usize {
        self.defects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn as_slice(&self) -> &[Defect] {
        &self.defects
    }

    pub fn count(&self, kind: DefectKind) -> usize {
        self.defects.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn of_kind(&self, kind: DefectKind) -> impl Iterator<Item = &Defect> + '_ {
        self.defects.iter().filter(move |d| d.kind() == kind)
    }

    /// No boundary, non-manifold, malformed or overlapping geometry
    pub fn is_closed(&self) -> bool {
        self.defects.is_empty()
    }
}

impl From<Vec<Defect>> for DefectList {
    fn from(defects: Vec<Defect>) -> Self {
        Self { defects }
    }
}

impl<'a> IntoIterator for &'a DefectList {
    type Item = &'a Defect;
    type IntoIter = std::slice::Iter<'a, Defect>;

    fn into_iter(self) -> Self::IntoIter {
        self.defects.iter()
    }
}
