//! Domain error types

use crate::staging::factor::Factor;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error(
        "Invalid value {value} for factor {factor} (legal range 0..={max})",
        max = .factor.max_value()
    )]
    InvalidFactorValue { factor: Factor, value: i64 },

    #[error("Invalid weight {weight} for {subject}: weights must be positive and finite")]
    InvalidWeight { subject: String, weight: f64 },

    #[error("Invalid evidence lexicon: {0}")]
    InvalidLexicon(String),
}

impl DomainError {
    /// Check if this error comes from an out-of-domain factor value
    pub fn is_factor_value(&self) -> bool {
        matches!(self, DomainError::InvalidFactorValue { .. })
    }
}
