//! Port for structured audit logging.
//!
//! Defines the [`AuditLogger`] trait for recording staging events (case
//! loaded, proposals extracted, vote completed, case failed) to a structured
//! log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable trail (JSONL) of what each case produced.

use serde_json::Value;

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter stamps the time.
pub struct AuditEvent {
    /// Event type identifier (e.g., "proposals_extracted", "vote_completed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// The `log` method is synchronous and non-fallible so that a broken log
/// never aborts staging; adapters swallow their own write errors.
pub trait AuditLogger: Send + Sync {
    /// Record an audit event.
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when audit logging is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
