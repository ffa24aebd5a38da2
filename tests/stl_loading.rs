// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shipping models read from STL files on disk

use anyhow::{Context, Result};
use meshship::geometry::{primitives, DefectKind};
use meshship::{load_stl, ship_file, ModelShipper, RawModel, ShipConfig, ShipError, StlFile};
use std::fs::File;
use std::path::Path;
use stl_io::{Normal, Triangle, Vertex};
use tempfile::tempdir;

/// Write `model` as a binary STL file
fn write_binary_stl(model: &RawModel, path: &Path) -> Result<()> {
    let triangles: Vec<Triangle> = model
        .facets()
        .iter()
        .map(|facet| {
            let [a, b, c] = facet.vertices;
            Triangle {
                normal: Normal::new([0.0, 0.0, 0.0]),
                vertices: [
                    Vertex::new([a.x as f32, a.y as f32, a.z as f32]),
                    Vertex::new([b.x as f32, b.y as f32, b.z as f32]),
                    Vertex::new([c.x as f32, c.y as f32, c.z as f32]),
                ],
            }
        })
        .collect();

    let mut file = File::create(path).context("Failed to create STL file")?;
    stl_io::write_stl(&mut file, triangles.iter()).context("Failed to write STL file")?;
    Ok(())
}

#[test]
fn test_binary_cube_ships_closed() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("block.stl");
    write_binary_stl(&primitives::cube(25.0), &path)?;

    let mut config = ShipConfig::default();
    config.output_dir = Some(dir.path().join("reports"));
    let result = ModelShipper::new(config).run(&StlFile::new(&path))?;

    assert_eq!(result.name(), "block");
    assert_eq!(result.input_model().len(), 12);
    assert!(result.is_closed());
    assert_eq!(result.output_model().vertex_count(), 8);
    assert!(dir.path().join("reports/block.data.txt").exists());
    assert!(dir.path().join("reports/block.meta.txt").exists());
    Ok(())
}

#[test]
fn test_torus_from_disk_matches_in_memory() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("ring.stl");
    // Shared corners narrow to the same f32, so the soup stays closed
    let model = primitives::torus(20.0, 5.0, 24, 12);
    write_binary_stl(&model, &path)?;

    let loaded = load_stl(&path)?;
    assert_eq!(loaded.len(), model.len());

    let result = ship_file(&path, ShipConfig::default())?;
    assert!(result.is_closed());
    assert_eq!(result.output_model().euler_characteristic(), 0);
    Ok(())
}

#[test]
fn test_ascii_open_surface() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fan.stl");
    std::fs::write(
        &path,
        "solid fan
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 1 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid fan
",
    )?;

    let result = ship_file(&path, ShipConfig::default())?;
    assert!(!result.is_closed());
    assert!(result.mesh().are_neighbors(0, 1));
    assert_eq!(result.defects().count(DefectKind::BoundaryEdge), 4);
    assert!(result
        .output_metadata_text()
        .contains("boundary-edge: 4"));
    Ok(())
}

#[test]
fn test_unreadable_file_is_fatal() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.stl");
    std::fs::write(&path, b"")?;

    let mut config = ShipConfig::default();
    config.output_dir = Some(dir.path().join("reports"));
    let err = ModelShipper::new(config)
        .run(&StlFile::new(&path))
        .unwrap_err();

    assert!(matches!(err, ShipError::Load { .. }));
    assert!(!dir.path().join("reports").exists());
    Ok(())
}
