// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Model shipper: load, validate, convert and ship one model
//!
//! The shipper moves strictly forward through
//! `EMPTY -> LOADED -> VALIDATED -> CONVERTED -> SHIPPED`. Every transition
//! is reported to the injected [`LogSink`]. Results of earlier stages stay
//! readable through getters, which return [`ShipError::NotYetAvailable`]
//! until the producing stage has run.

use std::fmt;
use std::path::Path;

use crate::config::ShipConfig;
use crate::error::{Result, ShipError};
use crate::geometry::{DefectList, Mesh, MeshBuilder};
use crate::io::{self, ArtifactPaths, ModelSource, RawModel};
use crate::logging::{LogSink, NullSink};
use crate::pipeline::{convert, OutputModel};
use crate::report::{self, ModelMetadata, Reports};

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Empty,
    Loaded,
    Validated,
    Converted,
    Shipped,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Empty => "EMPTY",
            Stage::Loaded => "LOADED",
            Stage::Validated => "VALIDATED",
            Stage::Converted => "CONVERTED",
            Stage::Shipped => "SHIPPED",
        }
    }

    /// The only stage reachable from this one
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Empty => Some(Stage::Loaded),
            Stage::Loaded => Some(Stage::Validated),
            Stage::Validated => Some(Stage::Converted),
            Stage::Converted => Some(Stage::Shipped),
            Stage::Shipped => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the mesh and defect list for `model`.
///
/// Defects are returned as data; only an empty model is an error.
pub fn validate(model: &RawModel, config: &ShipConfig) -> Result<(Mesh, DefectList)> {
    if model.is_empty() {
        return Err(ShipError::EmptyModel);
    }
    let builder = MeshBuilder::from_config(config)?;
    Ok(builder.build(model.facets()))
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct ConversionResult {
    name: String,
    input_model: RawModel,
    mesh: Mesh,
    defects: DefectList,
    output_model: OutputModel,
    reports: Reports,
    artifacts: Option<ArtifactPaths>,
}

impl ConversionResult {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_model(&self) -> &RawModel {
        &self.input_model
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn defects(&self) -> &DefectList {
        &self.defects
    }

    pub fn output_model(&self) -> &OutputModel {
        &self.output_model
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.reports.metadata
    }

    pub fn output_data_text(&self) -> &str {
        &self.reports.data_text
    }

    pub fn output_metadata_text(&self) -> &str {
        &self.reports.metadata_text
    }

    pub fn is_closed(&self) -> bool {
        self.reports.metadata.closed
    }

    /// Where `run` wrote the artifacts; `None` if no output directory was
    /// configured or writing failed
    pub fn artifacts(&self) -> Option<&ArtifactPaths> {
        self.artifacts.as_ref()
    }
}

/// Drives one model through the pipeline
pub struct ModelShipper<S: LogSink = NullSink> {
    config: ShipConfig,
    sink: S,
    stage: Stage,
    input_model: Option<RawModel>,
    mesh: Option<Mesh>,
    defects: Option<DefectList>,
    output_model: Option<OutputModel>,
    reports: Option<Reports>,
}

impl ModelShipper<NullSink> {
    /// Shipper that discards its log events
    pub fn new(config: ShipConfig) -> Self {
        Self::with_sink(config, NullSink)
    }
}

impl<S: LogSink> ModelShipper<S> {
    pub fn with_sink(config: ShipConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            stage: Stage::Empty,
            input_model: None,
            mesh: None,
            defects: None,
            output_model: None,
            reports: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &ShipConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn enter(&self, to: Stage) -> Result<()> {
        if self.stage.next() == Some(to) {
            Ok(())
        } else {
            Err(ShipError::InvalidTransition {
                from: self.stage,
                to,
            })
        }
    }

    fn not_yet(&self, artifact: &'static str) -> ShipError {
        ShipError::NotYetAvailable {
            artifact,
            stage: self.stage,
        }
    }

    /// Read the raw model from `source`. Load failures are final.
    pub fn load(&mut self, source: &dyn ModelSource) -> Result<&RawModel> {
        self.enter(Stage::Loaded)?;

        let name = source.name();
        self.sink.info(&format!("Loading model '{}'", name));

        let model = match source.load() {
            Ok(model) => model,
            Err(err) => {
                self.sink.error(&err.to_string());
                return Err(err);
            }
        };

        self.sink.info(&format!(
            "Loaded model '{}' with {} facets",
            model.name(),
            model.len()
        ));
        self.stage = Stage::Loaded;
        Ok(&*self.input_model.insert(model))
    }

    /// Reconstruct connectivity and collect defects
    pub fn validate(&mut self) -> Result<&DefectList> {
        self.enter(Stage::Validated)?;
        let model = self
            .input_model
            .as_ref()
            .ok_or_else(|| self.not_yet("input model"))?;

        self.sink.debug(&format!(
            "Validating '{}' with epsilon {:e}",
            model.name(),
            self.config.epsilon
        ));

        let (mesh, defects) = match validate(model, &self.config) {
            Ok(result) => result,
            Err(err) => {
                self.sink.error(&err.to_string());
                return Err(err);
            }
        };

        self.sink.info(&format!(
            "Validated '{}': {} triangles, {} vertices, {} edges ({} adjacency)",
            model.name(),
            mesh.triangle_count(),
            mesh.vertex_count(),
            mesh.edges().len(),
            mesh.strategy().as_str()
        ));
        if defects.is_empty() {
            self.sink.info("Model is closed");
        } else {
            self.sink
                .warning(&format!("Validation found {} defects", defects.len()));
            for defect in defects.iter() {
                self.sink.debug(&defect.to_string());
            }
        }

        self.mesh = Some(mesh);
        self.stage = Stage::Validated;
        Ok(&*self.defects.insert(defects))
    }

    /// Re-express the validated mesh as an output model
    pub fn convert(&mut self) -> Result<&OutputModel> {
        self.enter(Stage::Converted)?;
        let mesh = self.mesh.as_ref().ok_or_else(|| self.not_yet("mesh"))?;

        let output = convert(mesh);
        self.sink.info(&format!(
            "Converted to {} faces over {} shared vertices",
            output.face_count(),
            output.vertex_count()
        ));

        self.stage = Stage::Converted;
        Ok(&*self.output_model.insert(output))
    }

    /// Render the data and metadata texts
    pub fn ship(&mut self) -> Result<(&str, &str)> {
        self.enter(Stage::Shipped)?;
        let name = self.name()?.to_string();
        let output = self
            .output_model
            .as_ref()
            .ok_or_else(|| self.not_yet("output model"))?;
        let defects = self
            .defects
            .as_ref()
            .ok_or_else(|| self.not_yet("defect list"))?;

        let reports = report::render(&name, output, defects, self.config.data_format)?;
        self.sink.info(&format!(
            "Shipped '{}' ({}, {} defects)",
            name,
            reports.metadata.status(),
            reports.metadata.defect_count
        ));

        self.stage = Stage::Shipped;
        let reports = self.reports.insert(reports);
        Ok((reports.data_text.as_str(), reports.metadata_text.as_str()))
    }

    /// Write both artifacts into `dir`, or the configured output directory.
    ///
    /// I/O failures are logged as warnings and give `Ok(None)`; the in-memory
    /// results stay available.
    pub fn write_artifacts(&self, dir: Option<&Path>) -> Result<Option<ArtifactPaths>> {
        let reports = self
            .reports
            .as_ref()
            .ok_or_else(|| self.not_yet("output data text"))?;
        let dir = dir
            .or(self.config.output_dir.as_deref())
            .ok_or_else(|| ShipError::Config {
                reason: "no output directory configured".into(),
            })?;
        let name = self.name()?;

        match io::write_artifacts(dir, name, &reports.data_text, &reports.metadata_text) {
            Ok(paths) => {
                self.sink.info(&format!(
                    "Wrote {} and {}",
                    paths.data.display(),
                    paths.metadata.display()
                ));
                Ok(Some(paths))
            }
            Err(err) => {
                self.sink.warning(&format!(
                    "Could not write artifacts for '{}' to {}: {}",
                    name,
                    dir.display(),
                    err
                ));
                Ok(None)
            }
        }
    }

    /// Run every stage on `source`, writing artifacts when an output
    /// directory is configured
    pub fn run(mut self, source: &dyn ModelSource) -> Result<ConversionResult> {
        self.load(source)?;
        self.validate()?;
        self.convert()?;
        self.ship()?;
        let artifacts = if self.config.output_dir.is_some() {
            self.write_artifacts(None)?
        } else {
            None
        };
        let mut result = self.into_result()?;
        result.artifacts = artifacts;
        Ok(result)
    }

    /// Consume a shipped pipeline
    pub fn into_result(self) -> Result<ConversionResult> {
        if self.stage != Stage::Shipped {
            return Err(self.not_yet("conversion result"));
        }
        let stage = self.stage;
        let missing = |artifact| ShipError::NotYetAvailable { artifact, stage };

        let input_model = self.input_model.ok_or_else(|| missing("input model"))?;
        Ok(ConversionResult {
            name: input_model.name().to_string(),
            mesh: self.mesh.ok_or_else(|| missing("mesh"))?,
            defects: self.defects.ok_or_else(|| missing("defect list"))?,
            output_model: self.output_model.ok_or_else(|| missing("output model"))?,
            reports: self.reports.ok_or_else(|| missing("reports"))?,
            input_model,
            artifacts: None,
        })
    }

    /// Name of the loaded model
    pub fn name(&self) -> Result<&str> {
        self.input_model
            .as_ref()
            .map(|m| m.name())
            .ok_or_else(|| self.not_yet("model name"))
    }

    pub fn input_model(&self) -> Result<&RawModel> {
        self.input_model
            .as_ref()
            .ok_or_else(|| self.not_yet("input model"))
    }

    pub fn mesh(&self) -> Result<&Mesh> {
        self.mesh.as_ref().ok_or_else(|| self.not_yet("mesh"))
    }

    pub fn defects(&self) -> Result<&DefectList> {
        self.defects
            .as_ref()
            .ok_or_else(|| self.not_yet("defect list"))
    }

    pub fn output_model(&self) -> Result<&OutputModel> {
        self.output_model
            .as_ref()
            .ok_or_else(|| self.not_yet("output model"))
    }

    pub fn metadata(&self) -> Result<&ModelMetadata> {
        self.reports
            .as_ref()
            .map(|r| &r.metadata)
            .ok_or_else(|| self.not_yet("metadata"))
    }

    pub fn output_data_text(&self) -> Result<&str> {
        self.reports
            .as_ref()
            .map(|r| r.data_text.as_str())
            .ok_or_else(|| self.not_yet("output data text"))
    }

    pub fn output_metadata_text(&self) -> Result<&str> {
        self.reports
            .as_ref()
            .map(|r| r.metadata_text.as_str())
            .ok_or_else(|| self.not_yet("output metadata text"))
    }
}
