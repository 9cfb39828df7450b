// crates/cameo-core/src/runtime/audit.rs
// ============================================================================
// Module: Coding Audit Events
// Description: Structured audit events for compositions and table publishes.
// Purpose: Emit JSON-line audit records without a logging framework dependency.
// Dependencies: crate::{core, runtime::composer}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every audited composition emits one [`ComposeAuditEvent`]; every table
//! publish emits one [`TablesPublishedEvent`]. Sinks write one JSON object per
//! line so deployments can route them into any log pipeline. Entity names are
//! recorded as a digest of their normalized form, never verbatim.

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

use serde::Serialize;

use crate::core::date::CodingDate;
use crate::core::descriptor::EntityDescriptor;
use crate::core::hashing::EditionDigest;
use crate::core::hashing::hash_bytes;
use crate::core::scheme::EntityKind;
use crate::core::scheme::Scheme;
use crate::core::tables::TableStats;
use crate::runtime::composer::ComposeError;
use crate::runtime::composer::ComposedCode;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome label of an audited call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// A code was produced.
    Coded,
    /// Composition failed.
    Rejected,
}

/// Audit record for one composition.
#[derive(Debug, Clone, Serialize)]
pub struct ComposeAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Entity kind.
    pub kind: EntityKind,
    /// Scheme of the kind.
    pub scheme: Scheme,
    /// Digest of the normalized entity name.
    pub name_hash: EditionDigest,
    /// Query date.
    pub as_of: Option<CodingDate>,
    /// Call outcome.
    pub outcome: AuditOutcome,
    /// Composed code on success.
    pub code: Option<String>,
    /// Provenance label on success.
    pub provenance: Option<&'static str>,
    /// Error label on failure.
    pub error_kind: Option<&'static str>,
    /// Digest of the table edition used.
    pub tables: EditionDigest,
}

impl ComposeAuditEvent {
    /// Creates an event for a finished composition.
    #[must_use]
    pub fn new(
        descriptor: &EntityDescriptor,
        as_of: Option<CodingDate>,
        result: &Result<ComposedCode, ComposeError>,
        tables: &EditionDigest,
    ) -> Self {
        let (outcome, code, provenance, error_kind) = match result {
            Ok(composed) => (
                AuditOutcome::Coded,
                Some(composed.code.as_str().to_string()),
                Some(composed.provenance.as_str()),
                None,
            ),
            Err(err) => (AuditOutcome::Rejected, None, None, Some(err.kind())),
        };
        Self {
            event: "compose",
            timestamp_ms: now_ms(),
            kind: descriptor.kind,
            scheme: descriptor.scheme(),
            name_hash: hash_bytes(descriptor.normalized_name().as_bytes()),
            as_of,
            outcome,
            code,
            provenance,
            error_kind,
            tables: tables.clone(),
        }
    }
}

/// Audit record for a table publish.
#[derive(Debug, Clone, Serialize)]
pub struct TablesPublishedEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Digest of the new edition.
    pub digest: EditionDigest,
    /// Digest of the replaced edition.
    pub previous: EditionDigest,
    /// Record counts of the new edition.
    pub stats: TableStats,
}

impl TablesPublishedEvent {
    /// Creates a publish event.
    #[must_use]
    pub fn new(digest: EditionDigest, previous: EditionDigest, stats: TableStats) -> Self {
        Self {
            event: "tables_published",
            timestamp_ms: now_ms(),
            digest,
            previous,
            stats,
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records a composition event.
    fn record_compose(&self, event: &ComposeAuditEvent);

    /// Records a table publish event.
    fn record_publish(&self, _event: &TablesPublishedEvent) {}
}

/// Writes one serialized event as a line.
fn write_line<W: Write, E: Serialize>(mut out: W, event: &E) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(out, "{payload}");
        let _ = out.flush();
    }
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_compose(&self, event: &ComposeAuditEvent) {
        write_line(io::stderr().lock(), event);
    }

    fn record_publish(&self, event: &TablesPublishedEvent) {
        write_line(io::stderr().lock(), event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
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

impl AuditSink for FileAuditSink {
    fn record_compose(&self, event: &ComposeAuditEvent) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
        }
    }

    fn record_publish(&self, event: &TablesPublishedEvent) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_compose(&self, _event: &ComposeAuditEvent) {}
}
