//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tnm_application::{BatchParams, StagingConfig};
use tnm_domain::{DomainError, EvidenceLexicon, OutputFormat, WeightPolicy};

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("[voting] {0}")]
    InvalidVoting(DomainError),

    #[error("[evidence] {0}")]
    InvalidEvidence(DomainError),

    #[error("max_concurrent_cases cannot be 0")]
    InvalidConcurrency,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Write a JSONL audit trail to this path
    pub audit_log: Option<String>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            audit_log: None,
        }
    }
}

/// Raw batch configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    /// Maximum number of cases staged at once
    pub max_concurrent_cases: usize,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_cases: BatchParams::default().max_concurrent_cases,
        }
    }
}

/// Complete file configuration
///
/// ```toml
/// [voting]
/// unlisted = "by_role"
/// supervisor_weight = 1.5
///
/// [voting.agents]
/// Pathologist = 2.0
///
/// [evidence]
/// size_units = ["cm", "mm"]
///
/// [output]
/// format = "full"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Base weights for voting
    pub voting: WeightPolicy,
    /// Keyword sets for evidence scoring
    pub evidence: EvidenceLexicon,
    /// Output settings
    pub output: FileOutputConfig,
    /// Batch settings
    pub batch: FileBatchConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.voting
            .validate()
            .map_err(ConfigValidationError::InvalidVoting)?;
        self.evidence
            .validate()
            .map_err(ConfigValidationError::InvalidEvidence)?;
        if self.batch.max_concurrent_cases == 0 {
            return Err(ConfigValidationError::InvalidConcurrency);
        }
        Ok(())
    }

    /// Staging configuration for the application layer.
    pub fn staging_config(&self) -> StagingConfig {
        StagingConfig::new(self.voting.clone(), self.evidence.clone())
    }

    pub fn batch_params(&self) -> BatchParams {
        BatchParams::default().with_max_concurrent_cases(self.batch.max_concurrent_cases)
    }

    /// Render the effective configuration as TOML (for `--show-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
