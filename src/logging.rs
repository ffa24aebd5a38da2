// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Log sink abstraction
//!
//! The pipeline never writes to a terminal or UI itself. It hands
//! timestamped, leveled messages to whatever [`LogSink`] it was given.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Timestamp layout used when a message is displayed
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %I:%M:%S %p";

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message with its level and creation time
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.formatted_timestamp(),
            self.level,
            self.message
        )
    }
}

/// Receiver of pipeline events.
///
/// Calls are fire-and-forget: a sink must not fail the caller.
pub trait LogSink: Send + Sync {
    fn log(&self, message: LogMessage);

    fn debug(&self, message: &str) {
        self.log(LogMessage::new(LogLevel::Debug, message));
    }

    fn info(&self, message: &str) {
        self.log(LogMessage::new(LogLevel::Info, message));
    }

    fn warning(&self, message: &str) {
        self.log(LogMessage::new(LogLevel::Warning, message));
    }

    fn error(&self, message: &str) {
        self.log(LogMessage::new(LogLevel::Error, message));
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log(&self, message: LogMessage) {
        (**self).log(message);
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn log(&self, message: LogMessage) {
        (**self).log(message);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _message: LogMessage) {}
}

/// Keeps every message in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<LogMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all messages received so far
    pub fn messages(&self) -> Vec<LogMessage> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages at exactly `level`
    pub fn at_level(&self, level: LogLevel) -> Vec<LogMessage> {
        self.messages()
            .into_iter()
            .filter(|m| m.level == level)
            .collect()
    }

    /// True if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.message.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn log(&self, message: LogMessage) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}

/// Forwards messages to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: LogMessage) {
        match message.level {
            LogLevel::Debug => tracing::debug!(target: "meshship", "{}", message.message),
            LogLevel::Info => tracing::info!(target: "meshship", "{}", message.message),
            LogLevel::Warning => tracing::warn!(target: "meshship", "{}", message.message),
            LogLevel::Error => tracing::error!(target: "meshship", "{}", message.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order_and_levels() {
        let sink = MemorySink::new();
        sink.info("loaded");
        sink.warning("3 defects");
        sink.debug("edge index built");

        let messages = sink.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].message, "loaded");
        assert_eq!(messages[1].level, LogLevel::Warning);
        assert_eq!(sink.at_level(LogLevel::Debug).len(), 1);
        assert!(sink.contains("defects"));
    }

    #[test]
    fn test_shared_sink_through_arc() {
        let sink = Arc::new(MemorySink::new());
        let handle: Arc<dyn LogSink> = sink.clone();
        handle.error("boom");
        assert_eq!(sink.at_level(LogLevel::Error).len(), 1);
    }

    #[test]
    fn test_message_display() {
        let message = LogMessage::new(LogLevel::Info, "Validation found 0 defects");
        let text = message.to_string();
        assert!(text.contains("INFO: Validation found 0 defects"));
        assert!(text.starts_with('['));
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let sink = NullSink;
        sink.info("ignored");
        sink.error("ignored");
    }
}
