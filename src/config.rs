// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pipeline configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShipError};
use crate::geometry::{AdjacencyStrategy, Tolerance};
use crate::report::DataFormat;

/// Default vertex-equality tolerance.
///
/// STL stores single precision coordinates, so anything tighter than this
/// tends to split vertices that were written from the same point.
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Configuration shared by every stage of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Vertex equality tolerance used by every predicate
    pub epsilon: f64,
    /// How triangle adjacency is computed
    pub strategy: AdjacencyStrategy,
    /// Largest triangle count for which `Auto` picks pairwise comparison
    pub pairwise_limit: usize,
    /// Compute edge keys on the rayon pool
    pub parallel: bool,
    /// Rendering of the data artifact
    pub data_format: DataFormat,
    /// Where `write_artifacts` puts its files when no directory is given
    pub output_dir: Option<PathBuf>,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            strategy: AdjacencyStrategy::Auto,
            pairwise_limit: 64,
            parallel: false,
            data_format: DataFormat::Indexed,
            output_dir: None,
        }
    }
}

impl ShipConfig {
    /// Configuration with a specific tolerance and defaults elsewhere
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    /// Builder-style strategy override
    pub fn strategy(mut self, strategy: AdjacencyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder-style parallelism override
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The validated tolerance for this configuration
    pub fn tolerance(&self) -> Result<Tolerance> {
        Tolerance::new(self.epsilon)
    }

    /// Reject values that would make the predicates meaningless
    pub fn validate(&self) -> Result<()> {
        self.tolerance()?;
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ShipConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `meshship.toml` from the working directory if present, then apply
    /// environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let mut config = if PathBuf::from("meshship.toml").exists() {
            Self::from_file("meshship.toml")?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `MESHSHIP_*` overrides looked up through `var`
    pub fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(epsilon) = var("MESHSHIP_EPSILON") {
            self.epsilon = epsilon
                .parse()
                .with_context(|| format!("MESHSHIP_EPSILON is not a number: {}", epsilon))?;
        }

        if let Some(strategy) = var("MESHSHIP_STRATEGY") {
            self.strategy = AdjacencyStrategy::from_str(&strategy).ok_or_else(|| {
                ShipError::Config {
                    reason: format!("unknown adjacency strategy '{}'", strategy),
                }
            })?;
        }

        if let Some(parallel) = var("MESHSHIP_PARALLEL") {
            self.parallel = parallel
                .parse()
                .with_context(|| format!("MESHSHIP_PARALLEL is not a boolean: {}", parallel))?;
        }

        if let Some(output_dir) = var("MESHSHIP_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(output_dir));
        }

        self.validate()?;
        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
