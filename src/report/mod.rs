// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Report module - data and metadata artifacts of a shipped model

mod data;
mod metadata;

pub use data::{render_data, DataFormat};
pub use metadata::ModelMetadata;

use crate::error::Result;
use crate::geometry::DefectList;
use crate::pipeline::OutputModel;

/// The two text artifacts produced for one model
#[derive(Debug, Clone, PartialEq)]
pub struct Reports {
    pub metadata: ModelMetadata,
    pub data_text: String,
    pub metadata_text: String,
}

/// Render both reports for `output`.
///
/// Pure: the same inputs always give byte-identical text.
pub fn render(
    name: &str,
    output: &OutputModel,
    defects: &DefectList,
    format: DataFormat,
) -> Result<Reports> {
    let metadata = ModelMetadata::new(name, output, defects);
    let data_text = render_data(name, output, format)?;
    let metadata_text = metadata.to_text();

    Ok(Reports {
        metadata,
        data_text,
        metadata_text,
    })
}
