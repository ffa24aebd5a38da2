// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL model source backed by `stl_io`

use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use super::{ModelSource, RawFacet, RawModel};
use crate::error::{Result, ShipError};

/// STL file on disk, ASCII or binary
#[derive(Debug, Clone)]
pub struct StlFile {
    path: PathBuf,
}

impl StlFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for StlFile {
    fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn load(&self) -> Result<RawModel> {
        // The handle is dropped on every return path, including parse errors
        let file = File::open(&self.path)
            .map_err(|e| ShipError::load(self.path.display().to_string(), e))?;
        let mut reader = BufReader::new(file);
        read_stl(&mut reader, &self.name())
    }
}

/// Parse STL content from any seekable reader.
///
/// `stl_io` does not surface the per-facet attribute word, so facets read
/// here carry an attribute of 0.
pub fn read_stl<R: Read + Seek>(reader: &mut R, name: &str) -> Result<RawModel> {
    let stl = stl_io::read_stl(reader).map_err(|e| ShipError::load(name, e))?;

    let mut facets = Vec::with_capacity(stl.faces.len());
    for (index, face) in stl.faces.iter().enumerate() {
        let mut corners = [Point3::origin(); 3];
        for (corner, &vertex_index) in corners.iter_mut().zip(face.vertices.iter()) {
            let position = stl.vertices.get(vertex_index).ok_or_else(|| {
                ShipError::load(
                    name,
                    format!("facet {} references missing vertex {}", index, vertex_index),
                )
            })?;
            *corner = Point3::new(
                f64::from(position[0]),
                f64::from(position[1]),
                f64::from(position[2]),
            );
        }

        let normal = Vector3::new(
            f64::from(face.normal[0]),
            f64::from(face.normal[1]),
            f64::from(face.normal[2]),
        );
        let facet = RawFacet::new(corners).with_normal(normal);
        if !facet.is_finite() {
            return Err(ShipError::load(
                name,
                format!("facet {} has a non-finite coordinate", index),
            ));
        }
        facets.push(facet);
    }

    Ok(RawModel::new(name, facets))
}

/// Load an STL file from disk
pub fn load_stl(path: impl AsRef<Path>) -> Result<RawModel> {
    StlFile::new(path.as_ref()).load()
}
