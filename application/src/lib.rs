//! Application layer for tnm-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BatchParams, StagingConfig};
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    case_loader::{CaseLoader, CaseLoaderError},
};
pub use use_cases::stage_batch::{BatchReport, CaseFailure, CaseOutcome, StageBatchUseCase};
pub use use_cases::stage_case::{CaseRecord, StageCaseError, StageCaseInput, StageCaseUseCase};
