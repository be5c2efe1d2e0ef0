//! Infrastructure layer for tnm-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: case file loading, configuration file
//! loading and the JSONL audit trail.

pub mod case;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use case::JsonCaseLoader;
pub use config::{
    ConfigLoader, ConfigValidationError, FileBatchConfig, FileConfig, FileOutputConfig,
};
pub use logging::JsonlAuditLogger;
