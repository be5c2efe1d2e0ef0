//! Categorical confidence levels and their vote multipliers.

use super::factor::PerFactor;
use serde::{Deserialize, Serialize};

/// Confidence in a single factor of a proposal.
///
/// Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Confidence level for each factor.
pub type FactorLevels = PerFactor<ConfidenceLevel>;

impl ConfidenceLevel {
    /// Largest multiplier in the table; the consensus ceiling is derived from it.
    pub const MAX_MULTIPLIER: f64 = 1.5;

    /// Vote weight multiplier: low 0.5, medium 1.0, high 1.5
    pub fn multiplier(&self) -> f64 {
        match self {
            ConfidenceLevel::Low => 0.5,
            ConfidenceLevel::Medium => 1.0,
            ConfidenceLevel::High => Self::MAX_MULTIPLIER,
        }
    }

    /// Conservative fusion of two signals.
    ///
    /// Both high gives high, any low gives low, everything else is medium.
    ///
    /// ```
    /// use tnm_domain::ConfidenceLevel::{High, Low, Medium};
    ///
    /// assert_eq!(High.combine(High), High);
    /// assert_eq!(High.combine(Low), Low);
    /// assert_eq!(High.combine(Medium), Medium);
    /// ```
    pub fn combine(self, other: ConfidenceLevel) -> ConfidenceLevel {
        match (self, other) {
            (ConfidenceLevel::High, ConfidenceLevel::High) => ConfidenceLevel::High,
            (ConfidenceLevel::Low, _) | (_, ConfidenceLevel::Low) => ConfidenceLevel::Low,
            _ => ConfidenceLevel::Medium,
        }
    }

    /// Map an agreement rate (0.0 to 1.0) to a level.
    pub fn from_agreement_rate(rate: f64) -> ConfidenceLevel {
        if rate >= 0.8 {
            ConfidenceLevel::High
        } else if rate >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ConfidenceLevel::Low),
            "medium" | "moderate" => Ok(ConfidenceLevel::Medium),
            "high" => Ok(ConfidenceLevel::High),
            other => Err(format!(
                "Unknown confidence level: {}. Valid: low, medium, high",
                other
            )),
        }
    }
}

impl FactorLevels {
    /// Every factor at the same level.
    pub fn uniform(level: ConfidenceLevel) -> Self {
        PerFactor::from_fn(|_| level)
    }

    /// Number of factors rated `level`.
    pub fn count(&self, level: ConfidenceLevel) -> usize {
        self.iter().filter(|(_, l)| **l == level).count()
    }
}
