// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end pipeline behaviour on synthetic models

use anyhow::Result;
use meshship::geometry::{primitives, DefectKind};
use meshship::logging::LogLevel;
use meshship::{
    validate, AdjacencyStrategy, Defect, MemorySink, ModelShipper, RawFacet, RawModel,
    ShipConfig, ShipError, Stage,
};
use nalgebra::Point3;
use std::sync::Arc;
use tempfile::tempdir;

fn perturbed_cube() -> RawModel {
    let mut model = primitives::cube(1.0);
    // Facet 0 is [4, 5, 6]; move its copy of vertex 4 off the cube
    model.facets_mut()[0].vertices[0].z += 0.01;
    model
}

#[test]
fn test_closed_cube() -> Result<()> {
    for strategy in [AdjacencyStrategy::Pairwise, AdjacencyStrategy::EdgeIndex] {
        let config = ShipConfig::default().strategy(strategy);
        let (mesh, defects) = validate(&primitives::cube(1.0), &config)?;

        assert!(defects.is_empty());
        assert!(mesh.is_watertight());
        assert_eq!(mesh.edges().len(), 18);
        assert!(mesh.edges().iter().all(|e| e.triangles.len() == 2));
        assert!(mesh.are_neighbors(0, 1));
        assert!(mesh.are_neighbors(1, 0));
    }
    Ok(())
}

#[test]
fn test_perturbed_vertex_breaks_shared_edge() -> Result<()> {
    let (mesh, defects) = validate(&perturbed_cube(), &ShipConfig::default())?;

    assert!(!mesh.are_neighbors(0, 1));
    assert!(!mesh.is_watertight());

    // Edge 4-6 now only borders facet 1
    let v4 = Point3::new(0.0, 0.0, 1.0);
    let v6 = Point3::new(1.0, 1.0, 1.0);
    assert_eq!(mesh.edge_triangles(&v4, &v6), Some(&[1usize][..]));

    assert!(defects.count(DefectKind::BoundaryEdge) > 0);
    assert!(defects.iter().any(|d| matches!(
        d,
        Defect::BoundaryEdge { triangle: 1, endpoints }
            if endpoints.contains(&v4) && endpoints.contains(&v6)
    )));
    assert_eq!(defects.count(DefectKind::MalformedTriangle), 0);
    Ok(())
}

#[test]
fn test_perturbation_within_epsilon_is_welded() -> Result<()> {
    let mut model = primitives::cube(1.0);
    model.facets_mut()[0].vertices[0].z += 1e-7;

    let (mesh, defects) = validate(&model, &ShipConfig::default())?;
    assert!(defects.is_empty());
    assert!(mesh.are_neighbors(0, 1));
    assert_eq!(mesh.vertex_count(), 8);
    Ok(())
}

#[test]
fn test_validate_is_idempotent() -> Result<()> {
    let model = perturbed_cube();
    let config = ShipConfig::default();

    let (first_mesh, first_defects) = validate(&model, &config)?;
    let (second_mesh, second_defects) = validate(&model, &config)?;

    assert_eq!(first_mesh.adjacency(), second_mesh.adjacency());
    assert_eq!(first_defects, second_defects);
    Ok(())
}

#[test]
fn test_single_triangle() -> Result<()> {
    let model = RawModel::new(
        "tri",
        vec![RawFacet::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])],
    );

    let result = ModelShipper::new(ShipConfig::default()).run(&model)?;
    assert_eq!(result.defects().len(), 3);
    assert_eq!(result.defects().count(DefectKind::BoundaryEdge), 3);
    assert!(!result.is_closed());
    assert!(result.output_metadata_text().contains("Triangles: 1"));
    assert!(result.output_metadata_text().contains("Defects: 3"));
    Ok(())
}

#[test]
fn test_empty_model_produces_no_artifacts() -> Result<()> {
    let dir = tempdir()?;
    let mut config = ShipConfig::default();
    config.output_dir = Some(dir.path().to_path_buf());

    let err = ModelShipper::new(config)
        .run(&RawModel::new("empty", Vec::new()))
        .unwrap_err();

    assert!(matches!(err, ShipError::EmptyModel));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_getters_report_unavailable_until_shipped() -> Result<()> {
    let mut shipper = ModelShipper::new(ShipConfig::default());
    assert!(matches!(
        shipper.output_data_text(),
        Err(ShipError::NotYetAvailable { .. })
    ));

    shipper.load(&primitives::cube(1.0))?;
    shipper.validate()?;
    shipper.convert()?;
    assert!(shipper.output_model().is_ok());
    assert!(matches!(
        shipper.output_metadata_text(),
        Err(ShipError::NotYetAvailable {
            stage: Stage::Converted,
            ..
        })
    ));

    shipper.ship()?;
    assert!(shipper.output_data_text()?.starts_with("# meshship indexed model"));
    assert!(matches!(
        shipper.ship(),
        Err(ShipError::InvalidTransition {
            from: Stage::Shipped,
            to: Stage::Shipped
        })
    ));
    Ok(())
}

#[test]
fn test_artifacts_written_to_output_dir() -> Result<()> {
    let dir = tempdir()?;
    let mut config = ShipConfig::default();
    config.output_dir = Some(dir.path().join("out"));

    let result = ModelShipper::new(config).run(&primitives::cube(2.0))?;

    let data = std::fs::read_to_string(dir.path().join("out/cube.data.txt"))?;
    let metadata = std::fs::read_to_string(dir.path().join("out/cube.meta.txt"))?;
    assert_eq!(data, result.output_data_text());
    assert_eq!(metadata, result.output_metadata_text());
    assert!(metadata.contains("Status: closed"));
    assert_eq!(
        result.artifacts().map(|a| a.data.clone()),
        Some(dir.path().join("out/cube.data.txt"))
    );
    Ok(())
}

#[test]
fn test_run_reports_unwritten_artifacts() -> Result<()> {
    let dir = tempdir()?;
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, "not a directory")?;

    let mut config = ShipConfig::default();
    config.output_dir = Some(blocked);
    let sink = Arc::new(MemorySink::new());
    let result = ModelShipper::with_sink(config, sink.clone()).run(&primitives::cube(1.0))?;

    assert!(result.artifacts().is_none());
    assert!(result.is_closed());
    assert_eq!(sink.at_level(LogLevel::Warning).len(), 1);

    let unconfigured = ModelShipper::new(ShipConfig::default()).run(&primitives::cube(1.0))?;
    assert!(unconfigured.artifacts().is_none());
    Ok(())
}

#[test]
fn test_same_name_in_subdirectories_writes_separate_artifacts() -> Result<()> {
    let dir = tempdir()?;
    let models = dir.path().join("models");
    let out = dir.path().join("reports");

    let mut paths = Vec::new();
    for (sub, size) in [("a", 1.0), ("b", 2.0)] {
        let input = models.join(sub).join("part.stl");
        let mut config = ShipConfig::default();
        config.output_dir = Some(meshship::io::mirrored_dir(&out, &models, &input));
        let model = RawModel::new("part", primitives::cube(size).facets().to_vec());
        let result = ModelShipper::new(config).run(&model)?;
        paths.push(result.artifacts().map(|a| a.data.clone()));
    }

    assert_eq!(paths[0], Some(out.join("a/part.data.txt")));
    assert_eq!(paths[1], Some(out.join("b/part.data.txt")));
    let a = std::fs::read_to_string(out.join("a/part.data.txt"))?;
    let b = std::fs::read_to_string(out.join("b/part.data.txt"))?;
    assert_ne!(a, b);
    Ok(())
}

#[test]
fn test_write_failure_is_a_warning() -> Result<()> {
    let dir = tempdir()?;
    // A regular file where the output directory should be
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, "not a directory")?;

    let sink = Arc::new(MemorySink::new());
    let mut shipper = ModelShipper::with_sink(ShipConfig::default(), sink.clone());
    shipper.load(&primitives::cube(1.0))?;
    shipper.validate()?;
    shipper.convert()?;
    shipper.ship()?;

    let written = shipper.write_artifacts(Some(&blocked))?;
    assert!(written.is_none());
    assert_eq!(sink.at_level(LogLevel::Warning).len(), 1);
    assert!(sink.contains("Could not write artifacts for 'cube'"));
    assert!(shipper.output_model().is_ok());
    Ok(())
}

#[test]
fn test_json_data_format() -> Result<()> {
    let mut config = ShipConfig::default();
    config.data_format = meshship::DataFormat::Json;

    let result = ModelShipper::new(config).run(&primitives::cube(1.0))?;
    let parsed: serde_json::Value = serde_json::from_str(result.output_data_text())?;
    assert_eq!(parsed["faces"].as_array().map(|f| f.len()), Some(12));
    assert_eq!(parsed["vertices"].as_array().map(|v| v.len()), Some(8));
    Ok(())
}
