// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Raw triangle soup handed over by a model loader

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShipError};
use crate::geometry::{BoundingBox, Vertex};

/// One facet as read from the source: three corners, the stored normal and
/// the auxiliary attribute word, which is carried through untouched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFacet {
    pub vertices: [Vertex; 3],
    pub normal: Vector3<f64>,
    pub attribute: u16,
}

impl RawFacet {
    pub fn new(vertices: [Vertex; 3]) -> Self {
        Self {
            vertices,
            normal: Vector3::zeros(),
            attribute: 0,
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_attribute(mut self, attribute: u16) -> Self {
        self.attribute = attribute;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.coords.iter().all(|c| c.is_finite()))
    }
}

/// Ordered facets of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawModel {
    name: String,
    facets: Vec<RawFacet>,
}

impl RawModel {
    pub fn new(name: impl Into<String>, facets: Vec<RawFacet>) -> Self {
        Self {
            name: name.into(),
            facets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facets(&self) -> &[RawFacet] {
        &self.facets
    }

    pub fn facets_mut(&mut self) -> &mut [RawFacet] {
        &mut self.facets
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.facets.iter().flat_map(|f| f.vertices.iter()))
    }
}

/// Anything that can produce a [`RawModel`].
///
/// Loading is not retried: a source that failed once fails again.
pub trait ModelSource {
    /// Name used in diagnostics and artifact file names
    fn name(&self) -> String;

    fn load(&self) -> Result<RawModel>;
}

impl ModelSource for RawModel {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> Result<RawModel> {
        if let Some(index) = self.facets.iter().position(|f| !f.is_finite()) {
            return Err(ShipError::load(
                self.name.clone(),
                format!("facet {} has a non-finite coordinate", index),
            ));
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_in_memory_source_rejects_nan() {
        let facet = RawFacet::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let model = RawModel::new("bad", vec![facet]);
        let err = model.load().unwrap_err();
        assert!(matches!(err, ShipError::Load { .. }));
        assert!(err.to_string().contains("facet 0"));
    }

    #[test]
    fn test_attribute_and_normal_builders() {
        let facet = RawFacet::new([Point3::origin(); 3])
            .with_attribute(0x7c00)
            .with_normal(Vector3::z());
        assert_eq!(facet.attribute, 0x7c00);
        assert_eq!(facet.normal, Vector3::z());
    }
}
