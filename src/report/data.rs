// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Data report: the output model in textual form

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::OutputModel;

/// Textual form of the data artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataFormat {
    /// Line records: `v x y z`, `f source a b c a=attr n=neighbors`, `e a b t=faces`
    Indexed,
    /// Pretty-printed JSON of the output model
    Json,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Indexed => "indexed",
            DataFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "indexed" | "text" => Some(DataFormat::Indexed),
            "json" => Some(DataFormat::Json),
            _ => None,
        }
    }
}

fn join(values: &[usize]) -> String {
    if values.is_empty() {
        return "-".to_string();
    }
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Render `output` in the requested format
pub fn render_data(name: &str, output: &OutputModel, format: DataFormat) -> Result<String> {
    match format {
        DataFormat::Indexed => Ok(render_indexed(name, output)),
        DataFormat::Json => Ok(serde_json::to_string_pretty(output)?),
    }
}

fn render_indexed(name: &str, output: &OutputModel) -> String {
    let mut text = String::new();

    text.push_str("# meshship indexed model\n");
    text.push_str(&format!("# name: {}\n", name));
    text.push_str(&format!("# vertices: {}\n", output.vertex_count()));
    text.push_str(&format!("# faces: {}\n", output.face_count()));
    text.push_str(&format!("# edges: {}\n", output.edge_count()));

    for v in &output.vertices {
        text.push_str(&format!("v {:.6} {:.6} {:.6}\n", v.x, v.y, v.z));
    }

    for face in &output.faces {
        let [a, b, c] = face.vertices;
        text.push_str(&format!(
            "f {} {} {} {} a={} n={}\n",
            face.source_index,
            a,
            b,
            c,
            face.attribute,
            join(&face.neighbors)
        ));
    }

    for edge in &output.edges {
        text.push_str(&format!(
            "e {} {} t={}\n",
            edge.vertices[0],
            edge.vertices[1],
            join(&edge.faces)
        ));
    }

    text
}
