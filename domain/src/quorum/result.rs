//! The fused decision for one case.

use crate::staging::{Factor, FactorLevels, PerFactor, Proposal, Stage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry used in `disagreements` when no factor is contested.
pub const NO_DISAGREEMENT: &str = "None";

/// Result of weighted voting over a case's proposals.
///
/// Always complete and internally consistent; the engine never returns a
/// partial result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingResult {
    /// Winning value per factor
    pub decision: Stage,
    /// Canonical rendering of `decision`
    pub label: String,
    /// Mean of the per-factor consensus scores (0.0 to 1.0)
    pub consensus_score: f64,
    /// Winning weight relative to the theoretical maximum, per factor
    pub factor_consensus: PerFactor<f64>,
    /// Population-level confidence per factor
    pub aggregated_confidence: FactorLevels,
    /// Contested factors, or `["None"]`
    pub disagreements: Vec<String>,
    /// Accumulated weight per candidate value, per factor
    pub vote_distribution: PerFactor<BTreeMap<u8, f64>>,
    /// Number of proposals voted on
    pub num_proposals: usize,
    /// The annotated input proposals
    pub proposals: Vec<Proposal>,
}

impl VotingResult {
    /// Whether any factor fell below the consensus threshold.
    pub fn has_disagreement(&self) -> bool {
        self.disagreements.iter().any(|d| d != NO_DISAGREEMENT)
    }

    /// Whether every proposal agrees with the decision on every factor.
    pub fn is_unanimous(&self) -> bool {
        self.proposals.iter().all(|p| p.factors == self.decision)
    }

    /// Winning value for one factor.
    pub fn value(&self, factor: Factor) -> u8 {
        self.decision.value(factor)
    }

    /// The proposal with the most high-confidence factors.
    ///
    /// The earliest proposal wins ties.
    pub fn lead_proposal(&self) -> Option<&Proposal> {
        self.proposals.iter().fold(None, |best: Option<&Proposal>, p| match best {
            Some(b) if p.high_factor_count() <= b.high_factor_count() => Some(b),
            _ => Some(p),
        })
    }

    /// Disagreements joined into a single line.
    pub fn areas_of_disagreement(&self) -> String {
        self.disagreements.join(", ")
    }
}
