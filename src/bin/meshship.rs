// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshship CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use meshship::cli::{ConsoleSink, Reporter};
use meshship::io;
use meshship::{
    AdjacencyStrategy, DataFormat, ModelShipper, NullSink, ShipConfig, ShipError, StlFile,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "meshship")]
#[command(about = "Reconstruct STL connectivity and ship data/metadata reports", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./meshship.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Vertex equality tolerance
    #[arg(long, global = true)]
    epsilon: Option<f64>,

    /// Adjacency strategy (auto, pairwise, edge-index)
    #[arg(long, global = true)]
    strategy: Option<String>,

    /// Data text format (indexed, json)
    #[arg(long, global = true)]
    format: Option<String>,

    /// Compute edge keys in parallel
    #[arg(long, global = true)]
    parallel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ship one STL file and write its data and metadata texts
    Ship {
        /// Input STL file
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate one STL file and print its defects
    Check {
        /// Input STL file
        input: PathBuf,
    },

    /// Ship every STL file under a directory
    Batch {
        /// Directory to search
        dir: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match &cli.command {
        Commands::Ship { input, output } => {
            ship_command(input, output.as_deref(), config, cli.verbose)
        }
        Commands::Check { input } => check_command(input, config, cli.verbose),
        Commands::Batch { dir, output } => {
            batch_command(dir, output.as_deref(), config, cli.verbose)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ShipConfig> {
    let mut config = match &cli.config {
        Some(path) => ShipConfig::from_file(path)?,
        None => ShipConfig::load()?,
    };

    if let Some(epsilon) = cli.epsilon {
        config.epsilon = epsilon;
    }
    if let Some(strategy) = &cli.strategy {
        config.strategy = AdjacencyStrategy::from_str(strategy)
            .with_context(|| format!("Unknown strategy: {}", strategy))?;
    }
    if let Some(format) = &cli.format {
        config.data_format = DataFormat::from_str(format)
            .with_context(|| format!("Unknown data format: {}", format))?;
    }
    if cli.parallel {
        config.parallel = true;
    }

    config.validate()?;
    Ok(config)
}

fn ship_command(
    input: &Path,
    output: Option<&Path>,
    mut config: ShipConfig,
    verbose: bool,
) -> Result<()> {
    if let Some(dir) = output {
        config.output_dir = Some(dir.to_path_buf());
    }
    if config.output_dir.is_none() {
        config.output_dir = Some(PathBuf::from("."));
    }

    let start = Instant::now();
    let source = StlFile::new(input);
    let result = ModelShipper::with_sink(config, ConsoleSink::new(verbose))
        .run(&source)
        .with_context(|| format!("Failed to ship {}", input.display()))?;

    Reporter::report_result(&result, start.elapsed());
    Ok(())
}

fn check_command(input: &Path, config: ShipConfig, verbose: bool) -> Result<()> {
    let start = Instant::now();
    let source = StlFile::new(input);
    let mut shipper = ModelShipper::with_sink(config, ConsoleSink::new(verbose));

    shipper.load(&source)?;
    let defects = shipper.validate()?.clone();

    if defects.is_empty() {
        println!("{} {}", "✅".green(), "Closed surface".green().bold());
    } else {
        for defect in defects.iter() {
            println!("  {}", defect);
        }
        println!(
            "\n{} {} defects",
            "❌".red(),
            defects.len().to_string().red().bold()
        );
    }
    println!(
        "  {} {}",
        "Time:".bright_black(),
        Reporter::format_duration(start.elapsed()).yellow()
    );

    if !defects.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn discover_stl_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"))
        })
        .collect();

    // Sort for consistent ordering
    files.sort();
    files
}

struct BatchOutcome {
    name: String,
    result: std::result::Result<(bool, usize), ShipError>,
    /// Artifacts were requested but could not be written
    unwritten: bool,
    duration: std::time::Duration,
}

fn batch_command(
    dir: &Path,
    output: Option<&Path>,
    mut config: ShipConfig,
    verbose: bool,
) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }
    if let Some(out) = output {
        config.output_dir = Some(out.to_path_buf());
    }
    let out_root = config.output_dir.clone();

    let files = discover_stl_files(dir);
    if files.is_empty() {
        eprintln!("{}", "No .stl files found".red());
        std::process::exit(1);
    }
    if verbose {
        println!("Found {} STL files", files.len());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let outcomes: Vec<BatchOutcome> = files
        .par_iter()
        .map(|path| {
            let started = Instant::now();
            let source = StlFile::new(path);
            let mut config = config.clone();
            config.output_dir = out_root
                .as_deref()
                .map(|out| io::mirrored_dir(out, dir, path));

            let shipped = ModelShipper::with_sink(config, NullSink).run(&source);
            let unwritten = out_root.is_some()
                && shipped.as_ref().is_ok_and(|r| r.artifacts().is_none());
            pb.inc(1);
            BatchOutcome {
                name: path
                    .strip_prefix(dir)
                    .unwrap_or(path)
                    .display()
                    .to_string(),
                result: shipped.map(|r| (r.is_closed(), r.defects().len())),
                unwritten,
                duration: started.elapsed(),
            }
        })
        .collect();
    pb.finish_and_clear();

    let mut closed = 0;
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(_) if outcome.unwritten => {
                failed += 1;
                Reporter::report_error(&format!("{}: could not write artifacts", outcome.name));
            }
            Ok((is_closed, defects)) => {
                if *is_closed {
                    closed += 1;
                }
                Reporter::report_line(&outcome.name, *is_closed, *defects, outcome.duration);
            }
            Err(e) => {
                failed += 1;
                Reporter::report_error(&format!("{}: {}", outcome.name, e));
            }
        }
    }

    Reporter::report_batch(outcomes.len(), closed, failed, start.elapsed());
    Ok(())
}
