//! Proposal entity: one agent's staging claim.

use super::confidence::{ConfidenceLevel, FactorLevels};
use super::factor::{Factor, PerFactor, Stage};
use super::transcript::AgentRole;
use serde::{Deserialize, Serialize};

/// How the stage triple of a proposal was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalSource {
    /// Decoded from an explicit structured payload
    Structured,
    /// Guessed by pattern matching over free text
    Inferred,
}

/// One agent's stated classification for a case.
///
/// Confidence maps start empty and are filled by
/// [`annotate`](crate::confidence::annotate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub agent: String,
    pub role: AgentRole,
    pub factors: Stage,
    /// Canonical label, always derived from `factors`
    pub label: String,
    pub rationale: String,
    /// Confidence the agent reported itself, kept for audit only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stated_confidence: Option<FactorLevels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_confidence: Option<FactorLevels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_reasons: Option<PerFactor<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_confidence: Option<FactorLevels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_confidence: Option<FactorLevels>,
    pub message_index: usize,
    pub source: ProposalSource,
    /// Payload strategy that decoded a structured proposal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl Proposal {
    pub fn new(
        agent: impl Into<String>,
        factors: Stage,
        rationale: impl Into<String>,
        message_index: usize,
        source: ProposalSource,
    ) -> Self {
        Self {
            agent: agent.into(),
            role: AgentRole::Member,
            label: factors.label(),
            factors,
            rationale: rationale.into(),
            stated_confidence: None,
            evidence_confidence: None,
            evidence_reasons: None,
            agreement_confidence: None,
            combined_confidence: None,
            message_index,
            source,
            strategy: None,
        }
    }

    pub fn with_role(mut self, role: AgentRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn with_stated_confidence(mut self, levels: FactorLevels) -> Self {
        self.stated_confidence = Some(levels);
        self
    }

    /// Set the combined confidence directly (bypassing the estimator).
    pub fn with_combined_confidence(mut self, levels: FactorLevels) -> Self {
        self.combined_confidence = Some(levels);
        self
    }

    pub fn value(&self, factor: Factor) -> u8 {
        self.factors.value(factor)
    }

    /// Combined confidence for one factor; unscored proposals count as medium.
    pub fn combined(&self, factor: Factor) -> ConfidenceLevel {
        self.combined_confidence
            .as_ref()
            .map(|levels| *levels.get(factor))
            .unwrap_or_default()
    }

    /// Number of factors with high combined confidence.
    pub fn high_factor_count(&self) -> usize {
        self.combined_confidence
            .as_ref()
            .map(|levels| levels.count(ConfidenceLevel::High))
            .unwrap_or(0)
    }
}
