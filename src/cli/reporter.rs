// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Terminal output with colored formatting

use colored::*;
use std::time::Duration;

use crate::geometry::DefectKind;
use crate::logging::{LogLevel, LogMessage, LogSink};
use crate::pipeline::ConversionResult;

/// Log sink printing colored lines to the terminal.
///
/// Debug messages are only shown when `verbose` is set. Errors and warnings
/// go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn format(message: &LogMessage) -> String {
        let level = match message.level {
            LogLevel::Debug => message.level.as_str().bright_black(),
            LogLevel::Info => message.level.as_str().bright_blue(),
            LogLevel::Warning => message.level.as_str().yellow().bold(),
            LogLevel::Error => message.level.as_str().red().bold(),
        };
        format!(
            "{} {}: {}",
            format!("[{}]", message.formatted_timestamp()).bright_black(),
            level,
            message.message
        )
    }
}

impl LogSink for ConsoleSink {
    fn log(&self, message: LogMessage) {
        match message.level {
            LogLevel::Debug if !self.verbose => {}
            LogLevel::Warning | LogLevel::Error => eprintln!("{}", Self::format(&message)),
            _ => println!("{}", Self::format(&message)),
        }
    }
}

/// Summaries printed by the binary
pub struct Reporter;

impl Reporter {
    /// Report a finished run
    pub fn report_result(result: &ConversionResult, duration: Duration) {
        let metadata = result.metadata();

        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Model:".bold(), result.name().cyan());
        println!("{}", "━".repeat(80).bright_black());

        if metadata.closed {
            println!("{} {}", "✅".green(), "Closed surface".green().bold());
        } else {
            println!(
                "{} {}",
                "❌".red(),
                format!("Open surface, {} defects", metadata.defect_count)
                    .red()
                    .bold()
            );
        }

        println!("\n{}", "Structure:".bold());
        Self::print_count("Triangles", metadata.triangle_count);
        Self::print_count("Vertices", metadata.vertex_count);
        Self::print_count("Edges", metadata.edge_count);

        if !metadata.defect_counts.is_empty() {
            println!("\n{}", "Defects:".bold());
            for (kind, count) in &metadata.defect_counts {
                Self::print_defect_count(*kind, *count);
            }
        }

        println!(
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// One line per model, for batch runs
    pub fn report_line(name: &str, closed: bool, defects: usize, duration: Duration) {
        let status = if closed {
            "closed".green()
        } else {
            format!("open ({} defects)", defects).red()
        };
        println!(
            "  {:<40} {} {}",
            name.cyan(),
            status,
            Self::format_duration(duration).bright_black()
        );
    }

    /// Totals of a batch run
    pub fn report_batch(total: usize, closed: usize, failed: usize, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!(
            "  {} {}   {} {}   {} {}",
            "Models:".bright_black(),
            total.to_string().cyan(),
            "Closed:".bright_black(),
            closed.to_string().green(),
            "Failed:".bright_black(),
            if failed > 0 {
                failed.to_string().red()
            } else {
                failed.to_string().green()
            }
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    fn print_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().cyan()
        );
    }

    fn print_defect_count(kind: DefectKind, count: usize) {
        let label = format!("{}:", kind.as_str());
        let value = count.to_string();
        let value = match kind {
            DefectKind::MalformedTriangle | DefectKind::NonManifoldEdge => value.red(),
            DefectKind::BoundaryEdge | DefectKind::OverlappingFacets => value.yellow(),
        };
        println!("  {} {}", label.bright_black(), value);
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }

    #[test]
    fn test_console_line_contains_message() {
        colored::control::set_override(false);
        let line = ConsoleSink::format(&LogMessage::new(LogLevel::Warning, "two boundary edges"));
        assert!(line.ends_with("WARNING: two boundary edges"));
        assert!(line.starts_with('['));
    }
}
