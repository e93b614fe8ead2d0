// crates/commit-gate-core/src/runtime/diagnostics.rs
// ============================================================================
// Module: Commit Gate Diagnostics
// Description: Structured diagnostic events and best-effort sinks.
// Purpose: Record allow/deny reasoning without influencing gate decisions.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Diagnostic events describe what the gate inspected and why it allowed or
//! denied a path. Sinks serialize events as JSON lines. Every write failure is
//! swallowed: a broken log destination must never abort or allow a commit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use crate::core::RepositoryId;
use crate::core::TransactionId;
use crate::interfaces::DiagnosticSink;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    /// Per-path decision details.
    #[default]
    Debug,
    /// Check outcomes.
    Info,
    /// Rejections and infrastructure faults.
    Warn,
}

/// Diagnostic event payload.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event severity.
    pub level: DiagnosticLevel,
    /// Repository identifier when known.
    pub repository_id: Option<RepositoryId>,
    /// Transaction identifier when known.
    pub transaction: Option<TransactionId>,
    /// Changed path the event refers to.
    pub path: Option<String>,
    /// Human-readable detail.
    pub message: String,
}

/// Inputs required to construct a diagnostic event.
pub struct DiagnosticEventParams {
    /// Event identifier.
    pub event: &'static str,
    /// Event severity.
    pub level: DiagnosticLevel,
    /// Repository identifier when known.
    pub repository_id: Option<RepositoryId>,
    /// Transaction identifier when known.
    pub transaction: Option<TransactionId>,
    /// Changed path the event refers to.
    pub path: Option<String>,
    /// Human-readable detail.
    pub message: String,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with a consistent timestamp.
    #[must_use]
    pub fn new(params: DiagnosticEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: params.event,
            timestamp_ms,
            level: params.level,
            repository_id: params.repository_id,
            transaction: params.transaction,
            path: params.path,
            message: params.message,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink that discards every event.
pub struct NoopDiagnosticSink;

impl DiagnosticSink for NoopDiagnosticSink {
    fn record(&self, _event: &DiagnosticEvent) {}
}

/// Sink that logs JSON lines to stderr.
pub struct StderrDiagnosticSink;

impl DiagnosticSink for StderrDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileDiagnosticSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileDiagnosticSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DiagnosticSink for FileDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that forwards events at or above a minimum level.
pub struct LevelFilterSink<S> {
    /// Lowest level forwarded to the inner sink.
    min_level: DiagnosticLevel,
    /// Destination sink.
    inner: S,
}

impl<S: DiagnosticSink> LevelFilterSink<S> {
    /// Wraps `inner`, dropping events below `min_level`.
    #[must_use]
    pub const fn new(min_level: DiagnosticLevel, inner: S) -> Self {
        Self {
            min_level,
            inner,
        }
    }
}

impl<S: DiagnosticSink> DiagnosticSink for LevelFilterSink<S> {
    fn record(&self, event: &DiagnosticEvent) {
        if event.level >= self.min_level {
            self.inner.record(event);
        }
    }
}

/// Sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryDiagnosticSink {
    /// Recorded events.
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemoryDiagnosticSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl DiagnosticSink for MemoryDiagnosticSink {
    fn record(&self, event: &DiagnosticEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests unwrap temp file fixtures.")]

    use super::*;

    fn event(name: &'static str, level: DiagnosticLevel) -> DiagnosticEvent {
        DiagnosticEvent::new(DiagnosticEventParams {
            event: name,
            level,
            repository_id: RepositoryId::from_raw(3),
            transaction: Some(TransactionId::new("9-x")),
            path: Some("tags/v1/a.txt".to_string()),
            message: "detail".to_string(),
        })
    }

    #[test]
    fn level_filter_drops_lower_levels() {
        let sink = LevelFilterSink::new(DiagnosticLevel::Info, MemoryDiagnosticSink::new());
        sink.record(&event("debug_event", DiagnosticLevel::Debug));
        sink.record(&event("info_event", DiagnosticLevel::Info));
        sink.record(&event("warn_event", DiagnosticLevel::Warn));
        let names: Vec<&str> = sink.inner.events().iter().map(|event| event.event).collect();
        assert_eq!(names, vec!["info_event", "warn_event"]);
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gate.jsonl");
        FileDiagnosticSink::new(&path).unwrap().record(&event("first", DiagnosticLevel::Warn));
        FileDiagnosticSink::new(&path).unwrap().record(&event("second", DiagnosticLevel::Debug));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> =
            content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "first");
        assert_eq!(lines[0]["level"], "warn");
        assert_eq!(lines[0]["repository_id"], 3);
        assert_eq!(lines[0]["transaction"], "9-x");
        assert_eq!(lines[1]["event"], "second");
    }
}
