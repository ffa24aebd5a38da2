// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshship
//!
//! Reconstructs connectivity for STL triangle soups. Facets are turned into
//! edges and triangles, shared edges are found under a single vertex
//! tolerance, and every edge that does not border exactly two triangles is
//! reported as a defect. A staged pipeline then ships the connected model as
//! a data text and a metadata text.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use config::{ShipConfig, DEFAULT_EPSILON};
pub use error::{Result, ShipError};
pub use geometry::{
    AdjacencyStrategy, Defect, DefectKind, DefectList, Edge, Mesh, MeshBuilder, Tolerance,
    Triangle, Vertex,
};
pub use io::{load_stl, ModelSource, RawFacet, RawModel, StlFile};
pub use logging::{LogLevel, LogMessage, LogSink, MemorySink, NullSink, TracingSink};
pub use pipeline::{convert, validate, ConversionResult, ModelShipper, OutputModel, Stage};
pub use report::{DataFormat, ModelMetadata};

use std::path::Path;

/// Ship the STL file at `path` with `config`, logging through `tracing`
pub fn ship_file(path: impl AsRef<Path>, config: ShipConfig) -> Result<ConversionResult> {
    let source = StlFile::new(path.as_ref());
    ModelShipper::with_sink(config, TracingSink).run(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_missing_file() {
        let err = ship_file("does/not/exist.stl", ShipConfig::default()).unwrap_err();
        assert!(matches!(err, ShipError::Load { .. }));
        assert!(err.is_fatal());
    }
}
