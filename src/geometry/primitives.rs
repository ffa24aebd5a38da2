// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Synthetic closed models
//!
//! Each primitive is emitted as a triangle soup with corners repeated per
//! facet, the same way an STL file stores them.

use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

use crate::io::{RawFacet, RawModel};

fn soup(name: &str, positions: &[Point3<f64>], faces: &[[usize; 3]]) -> RawModel {
    let facets = faces
        .iter()
        .map(|&[a, b, c]| RawFacet::new([positions[a], positions[b], positions[c]]))
        .collect();
    RawModel::new(name, facets)
}

/// Axis-aligned cube spanning `[0, size]` on every axis, 12 facets
pub fn cube(size: f64) -> RawModel {
    let positions = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(size, 0.0, 0.0),
        Point3::new(size, size, 0.0),
        Point3::new(0.0, size, 0.0),
        Point3::new(0.0, 0.0, size),
        Point3::new(size, 0.0, size),
        Point3::new(size, size, size),
        Point3::new(0.0, size, size),
    ];

    let faces = [
        // Front (z+)
        [4, 5, 6],
        [4, 6, 7],
        // Back (z-)
        [1, 0, 3],
        [1, 3, 2],
        // Right (x+)
        [5, 1, 2],
        [5, 2, 6],
        // Left (x-)
        [0, 4, 7],
        [0, 7, 3],
        // Top (y+)
        [7, 6, 2],
        [7, 2, 3],
        // Bottom (y-)
        [0, 1, 5],
        [0, 5, 4],
    ];

    soup("cube", &positions, &faces)
}

/// Torus around the z axis. Closed and manifold for any
/// `major_segments >= 3` and `minor_segments >= 3`.
pub fn torus(major_radius: f64, minor_radius: f64, major_segments: usize, minor_segments: usize) -> RawModel {
    let major_segments = major_segments.max(3);
    let minor_segments = minor_segments.max(3);

    let mut positions = Vec::with_capacity(major_segments * minor_segments);
    for i in 0..major_segments {
        let theta = 2.0 * PI * i as f64 / major_segments as f64;
        let axis = Vector3::new(theta.cos(), theta.sin(), 0.0);
        for j in 0..minor_segments {
            let phi = 2.0 * PI * j as f64 / minor_segments as f64;
            let radial = major_radius + minor_radius * phi.cos();
            positions.push(Point3::from(axis * radial + Vector3::z() * minor_radius * phi.sin()));
        }
    }

    let at = |i: usize, j: usize| (i % major_segments) * minor_segments + (j % minor_segments);
    let mut faces = Vec::with_capacity(major_segments * minor_segments * 2);
    for i in 0..major_segments {
        for j in 0..minor_segments {
            let a = at(i, j);
            let b = at(i + 1, j);
            let c = at(i + 1, j + 1);
            let d = at(i, j + 1);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }

    soup("torus", &positions, &faces)
}
