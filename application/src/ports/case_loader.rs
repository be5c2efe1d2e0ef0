//! Case loader port
//!
//! Defines how the batch use case obtains case inputs.

use crate::use_cases::stage_case::StageCaseInput;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while loading a case
#[derive(Error, Debug)]
pub enum CaseLoaderError {
    #[error("Failed to read {source_name}: {message}")]
    Io {
        source_name: String,
        message: String,
    },

    #[error("Failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
}

/// Loader for staging cases
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CaseLoader: Send + Sync {
    /// Load the case identified by `source` (e.g. a file path).
    async fn load(&self, source: &str) -> Result<StageCaseInput, CaseLoaderError>;
}
