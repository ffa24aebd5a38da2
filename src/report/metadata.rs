// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Metadata report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::{BoundingBox, Defect, DefectKind, DefectList, Vertex};
use crate::pipeline::OutputModel;

/// Structural summary of a shipped model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub facet_count: usize,
    pub triangle_count: usize,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub bounds: BoundingBox,
    pub closed: bool,
    pub defect_count: usize,
    pub defect_counts: BTreeMap<DefectKind, usize>,
    pub defects: Vec<Defect>,
}

impl ModelMetadata {
    pub fn new(name: &str, output: &OutputModel, defects: &DefectList) -> Self {
        let defect_counts = DefectKind::ALL
            .iter()
            .map(|&kind| (kind, defects.count(kind)))
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            name: name.to_string(),
            facet_count: output.facet_count,
            triangle_count: output.face_count(),
            vertex_count: output.vertex_count(),
            edge_count: output.edge_count(),
            bounds: output.bounds,
            closed: defects.is_closed() && output.face_count() > 0,
            defect_count: defects.len(),
            defect_counts,
            defects: defects.as_slice().to_vec(),
        }
    }

    pub fn status(&self) -> &'static str {
        if self.closed {
            "closed"
        } else {
            "open"
        }
    }

    /// Plain-text rendering of the report
    pub fn to_text(&self) -> String {
        let mut text = String::new();

        text.push_str(&format!("Model: {}\n", self.name));
        text.push_str(&format!(
            "Triangles: {} ({} facets in input)\n",
            self.triangle_count, self.facet_count
        ));
        text.push_str(&format!("Vertices: {}\n", self.vertex_count));
        text.push_str(&format!("Edges: {}\n", self.edge_count));

        text.push_str("Bounding box:\n");
        if self.bounds.is_empty() {
            text.push_str("  (empty)\n");
        } else {
            text.push_str(&format!("  min: {}\n", point(&self.bounds.min)));
            text.push_str(&format!("  max: {}\n", point(&self.bounds.max)));
            let size = self.bounds.size();
            text.push_str(&format!(
                "  size: {:.6} x {:.6} x {:.6}\n",
                size.x, size.y, size.z
            ));
        }

        text.push_str(&format!("Status: {}\n", self.status()));
        text.push_str(&format!("Defects: {}\n", self.defect_count));
        for (kind, count) in &self.defect_counts {
            text.push_str(&format!("  {}: {}\n", kind.as_str(), count));
        }

        if !self.defects.is_empty() {
            text.push('\n');
            for (n, defect) in self.defects.iter().enumerate() {
                text.push_str(&format!("{:>4}. {}\n", n + 1, defect));
            }
        }

        text
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn point(p: &Vertex) -> String {
    format!("({:.6}, {:.6}, {:.6})", p.x, p.y, p.z)
}
