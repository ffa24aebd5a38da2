// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - model sources and artifact persistence

mod artifacts;
mod raw;
mod stl;

pub use artifacts::{mirrored_dir, write_artifacts, write_text, ArtifactPaths};
pub use raw::{ModelSource, RawFacet, RawModel};
pub use stl::{load_stl, read_stl, StlFile};
