// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the shipping pipeline

use nalgebra::Point3;
use thiserror::Error;

use crate::pipeline::Stage;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ShipError>;

/// Errors raised by the core and the pipeline.
///
/// Mesh defects are not errors; they are reported through
/// [`DefectList`](crate::geometry::DefectList).
#[derive(Debug, Error)]
pub enum ShipError {
    /// Both endpoints of an edge are the same point under the active tolerance.
    #[error("degenerate edge: ({:.6}, {:.6}, {:.6}) and ({:.6}, {:.6}, {:.6}) coincide", a.x, a.y, a.z, b.x, b.y, b.z)]
    DegenerateEdge { a: Point3<f64>, b: Point3<f64> },

    /// The model source could not be read or parsed.
    #[error("failed to load model '{source_name}': {reason}")]
    Load { source_name: String, reason: String },

    /// The loaded model has no facets.
    #[error("model contains no triangles")]
    EmptyModel,

    /// A getter was called before the stage producing its value ran.
    #[error("{artifact} is not available yet (pipeline is at stage {stage})")]
    NotYetAvailable { artifact: &'static str, stage: Stage },

    /// A stage was requested out of order.
    #[error("cannot move pipeline from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },

    /// Configuration value out of range or unparsable.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to render report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ShipError {
    pub(crate) fn load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that end a run before any artifact is produced.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::EmptyModel)
    }
}
