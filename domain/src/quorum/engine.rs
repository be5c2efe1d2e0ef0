//! Weighted majority voting over confidence-annotated proposals.

use super::result::{NO_DISAGREEMENT, VotingResult};
use super::tally::Tally;
use super::weight::WeightPolicy;
use crate::staging::{ConfidenceLevel, Factor, FactorLevels, PerFactor, Proposal, Stage};
use thiserror::Error;

/// A factor is flagged as contested below this consensus score.
pub const DISAGREEMENT_THRESHOLD: f64 = 0.7;

/// Errors from the voting engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VotingError {
    /// Called with no proposals: a wiring error, not an extraction gap
    #[error("nothing to vote on")]
    NothingToVote,
}

/// Outcome of voting on a single factor.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorOutcome {
    pub factor: Factor,
    pub winner: u8,
    pub consensus: f64,
    pub tally: Tally,
    /// Number of proposals holding a value other than the winner
    pub dissenters: usize,
}

impl FactorOutcome {
    pub fn is_contested(&self) -> bool {
        self.consensus < DISAGREEMENT_THRESHOLD
    }

    /// Disagreement note, e.g. `N: 1/3 agents disagree`.
    pub fn disagreement(&self, total: usize) -> String {
        format!("{}: {}/{} agents disagree", self.factor, self.dissenters, total)
    }
}

/// Fuses proposals into one [`VotingResult`].
///
/// For each factor, a proposal's vote weighs
/// `base_weight(agent) × multiplier(combined confidence)`. The value with the
/// highest accumulated weight wins; ties go to the value introduced first.
/// Consensus is the winning weight over the theoretical maximum
/// (`Σ base weights × 1.5`).
///
/// # Example
///
/// ```
/// use tnm_domain::{ConfidenceLevel, FactorLevels, Proposal, ProposalSource, Stage, VotingEngine};
///
/// let high = FactorLevels::uniform(ConfidenceLevel::High);
/// let proposals = vec![
///     Proposal::new("a", Stage::new(2, 1, 0).unwrap(), "", 0, ProposalSource::Structured)
///         .with_combined_confidence(high),
///     Proposal::new("b", Stage::new(2, 1, 0).unwrap(), "", 1, ProposalSource::Structured)
///         .with_combined_confidence(high),
/// ];
///
/// let result = VotingEngine::default().vote(proposals).unwrap();
/// assert_eq!(result.label, "T2,N1,M0");
/// assert_eq!(result.consensus_score, 1.0);
/// assert_eq!(result.disagreements, vec!["None"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VotingEngine {
    policy: WeightPolicy,
}

impl VotingEngine {
    pub fn new(policy: WeightPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &WeightPolicy {
        &self.policy
    }

    /// Vote on annotated proposals.
    ///
    /// Proposals without combined confidence count as medium.
    pub fn vote(&self, proposals: Vec<Proposal>) -> Result<VotingResult, VotingError> {
        if proposals.is_empty() {
            return Err(VotingError::NothingToVote);
        }

        let base_weights: Vec<f64> = proposals
            .iter()
            .map(|p| self.policy.base_weight(&p.agent, p.role))
            .collect();
        let ceiling = base_weights.iter().sum::<f64>() * ConfidenceLevel::MAX_MULTIPLIER;

        let outcomes = PerFactor::from_fn(|factor| {
            Self::vote_factor(factor, &proposals, &base_weights, ceiling)
        });

        let total = proposals.len();
        let mut disagreements: Vec<String> = outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_contested())
            .map(|(_, outcome)| outcome.disagreement(total))
            .collect();
        if disagreements.is_empty() {
            disagreements.push(NO_DISAGREEMENT.to_string());
        }

        let factor_consensus = outcomes.map(|_, o| o.consensus);
        let consensus_score =
            (factor_consensus.t + factor_consensus.n + factor_consensus.m) / 3.0;

        // Winners are values of already-validated proposals.
        let decision = Stage::from_valid(outcomes.t.winner, outcomes.n.winner, outcomes.m.winner);

        Ok(VotingResult {
            label: decision.label(),
            decision,
            consensus_score,
            factor_consensus,
            aggregated_confidence: aggregate_confidence(&proposals),
            disagreements,
            vote_distribution: outcomes.map(|_, o| o.tally.distribution()),
            num_proposals: total,
            proposals,
        })
    }

    fn vote_factor(
        factor: Factor,
        proposals: &[Proposal],
        base_weights: &[f64],
        ceiling: f64,
    ) -> FactorOutcome {
        let mut tally = Tally::new();
        for (proposal, base) in proposals.iter().zip(base_weights) {
            tally.add(
                proposal.value(factor),
                base * proposal.combined(factor).multiplier(),
            );
        }

        // Non-empty input guarantees a winner.
        let (winner, winning_weight) = tally.winner().unwrap_or((0, 0.0));
        let consensus = if ceiling > 0.0 {
            winning_weight / ceiling
        } else {
            0.0
        };
        let dissenters = proposals
            .iter()
            .filter(|p| p.value(factor) != winner)
            .count();

        FactorOutcome {
            factor,
            winner,
            consensus,
            tally,
            dissenters,
        }
    }
}

/// Population-level confidence per factor.
///
/// Low if at least half the proposals rate the factor low, else high if at
/// least 70% rate it high, else medium.
pub fn aggregate_confidence(proposals: &[Proposal]) -> FactorLevels {
    let total = proposals.len() as f64;
    PerFactor::from_fn(|factor| {
        let count = |level: ConfidenceLevel| {
            proposals.iter().filter(|p| p.combined(factor) == level).count() as f64
        };
        let low = count(ConfidenceLevel::Low);
        let high = count(ConfidenceLevel::High);
        if low > 0.0 && low >= total * 0.5 {
            ConfidenceLevel::Low
        } else if high > 0.0 && high >= total * 0.7 {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::weight::UnlistedAgentWeight;
    use crate::staging::{AgentRole, ProposalSource};

    fn proposal(agent: &str, t: i64, n: i64, m: i64, level: ConfidenceLevel) -> Proposal {
        Proposal::new(agent, Stage::new(t, n, m).unwrap(), "", 0, ProposalSource::Structured)
            .with_combined_confidence(FactorLevels::uniform(level))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_is_nothing_to_vote() {
        let err = VotingEngine::default().vote(vec![]).unwrap_err();
        assert_eq!(err, VotingError::NothingToVote);
        assert_eq!(err.to_string(), "nothing to vote on");
    }

    #[test]
    fn test_unanimous_medium_is_two_thirds() {
        let proposals = vec![
            proposal("a", 1, 0, 0, ConfidenceLevel::Medium),
            proposal("b", 1, 0, 0, ConfidenceLevel::Medium),
            proposal("c", 1, 0, 0, ConfidenceLevel::Medium),
        ];
        let result = VotingEngine::default().vote(proposals).unwrap();
        assert!(approx(result.factor_consensus.t, 1.0 / 1.5));
        assert!(approx(result.consensus_score, 1.0 / 1.5));
        // 0.667 < 0.7, so even a unanimous medium vote is flagged.
        assert_eq!(result.disagreements.len(), 3);
        assert_eq!(result.disagreements[0], "T: 0/3 agents disagree");
        assert!(result.is_unanimous());
    }

    #[test]
    fn test_unanimous_high_is_one() {
        let proposals = vec![
            proposal("a", 3, 2, 1, ConfidenceLevel::High),
            proposal("b", 3, 2, 1, ConfidenceLevel::High),
        ];
        let result = VotingEngine::default().vote(proposals).unwrap();
        assert_eq!(result.factor_consensus.n, 1.0);
        assert_eq!(result.consensus_score, 1.0);
        assert_eq!(result.disagreements, vec![NO_DISAGREEMENT]);
        assert!(!result.has_disagreement());
        assert_eq!(result.aggregated_confidence, FactorLevels::uniform(ConfidenceLevel::High));
    }

    #[test]
    fn test_single_proposal_is_trivially_unanimous() {
        let result = VotingEngine::default()
            .vote(vec![proposal("a", 2, 0, 0, ConfidenceLevel::High)])
            .unwrap();
        assert_eq!(result.label, "T2,N0,M0");
        assert_eq!(result.num_proposals, 1);
        assert_eq!(result.consensus_score, 1.0);
    }

    #[test]
    fn test_tie_break_is_first_introduced() {
        let proposals = vec![
            proposal("a", 3, 0, 0, ConfidenceLevel::Medium),
            proposal("b", 1, 0, 0, ConfidenceLevel::Medium),
        ];
        for _ in 0..5 {
            let result = VotingEngine::default().vote(proposals.clone()).unwrap();
            assert_eq!(result.value(Factor::T), 3);
        }

        let reversed: Vec<_> = proposals.iter().rev().cloned().collect();
        let result = VotingEngine::default().vote(reversed).unwrap();
        assert_eq!(result.value(Factor::T), 1);
    }

    #[test]
    fn test_confidence_outweighs_head_count() {
        // Two low-confidence votes (0.5 each) lose to one high (1.5).
        let proposals = vec![
            proposal("a", 1, 0, 0, ConfidenceLevel::Low),
            proposal("b", 1, 0, 0, ConfidenceLevel::Low),
            proposal("c", 2, 0, 0, ConfidenceLevel::High),
        ];
        let result = VotingEngine::default().vote(proposals).unwrap();
        assert_eq!(result.value(Factor::T), 2);
        assert_eq!(result.vote_distribution.t.get(&1), Some(&1.0));
        assert_eq!(result.vote_distribution.t.get(&2), Some(&1.5));
        assert!(result.disagreements.contains(&"T: 2/3 agents disagree".to_string()));
    }

    #[test]
    fn test_supervisor_weight_by_role() {
        let proposals = vec![
            proposal("Radiologist", 1, 0, 0, ConfidenceLevel::Medium),
            proposal("Chair", 2, 0, 0, ConfidenceLevel::Medium).with_role(AgentRole::Supervisor),
        ];

        let uniform = VotingEngine::default().vote(proposals.clone()).unwrap();
        assert_eq!(uniform.value(Factor::T), 1);

        let policy = WeightPolicy::default().with_unlisted(UnlistedAgentWeight::ByRole);
        let by_role = VotingEngine::new(policy).vote(proposals).unwrap();
        assert_eq!(by_role.value(Factor::T), 2);
        // 1.5 / ((1.0 + 1.5) * 1.5)
        assert!(approx(by_role.factor_consensus.t, 1.5 / 3.75));
    }

    #[test]
    fn test_repeated_agent_counts_each_proposal() {
        let proposals = vec![
            proposal("a", 1, 0, 0, ConfidenceLevel::High),
            proposal("a", 1, 0, 0, ConfidenceLevel::High),
        ];
        let result = VotingEngine::default().vote(proposals).unwrap();
        assert!(result.consensus_score <= 1.0);
        assert_eq!(result.consensus_score, 1.0);
    }

    #[test]
    fn test_aggregate_confidence_thresholds() {
        use ConfidenceLevel::*;
        let make = |levels: &[ConfidenceLevel]| -> Vec<Proposal> {
            levels.iter().map(|l| proposal("x", 1, 0, 0, *l)).collect()
        };

        assert_eq!(aggregate_confidence(&make(&[Low, High])).t, Low);
        assert_eq!(aggregate_confidence(&make(&[Low, High, High])).t, Medium);
        assert_eq!(aggregate_confidence(&make(&[High, High, High, Medium])).t, High);
        assert_eq!(aggregate_confidence(&make(&[High, High, Medium, Medium])).t, Medium);
    }

    #[test]
    fn test_unscored_proposals_count_as_medium() {
        let stage = Stage::new(1, 1, 0).unwrap();
        let bare = Proposal::new("a", stage, "", 0, ProposalSource::Inferred);
        let result = VotingEngine::default().vote(vec![bare]).unwrap();
        assert!(approx(result.factor_consensus.m, 1.0 / 1.5));
        assert_eq!(result.aggregated_confidence, FactorLevels::uniform(ConfidenceLevel::Medium));
    }

    #[test]
    fn test_lead_proposal_prefers_most_high_factors() {
        let stage = Stage::new(1, 0, 0).unwrap();
        let mixed = Proposal::new("a", stage, "first", 0, ProposalSource::Structured)
            .with_combined_confidence(FactorLevels {
                t: ConfidenceLevel::High,
                n: ConfidenceLevel::Medium,
                m: ConfidenceLevel::Medium,
            });
        let strong = proposal("b", 1, 0, 0, ConfidenceLevel::High);
        let also_strong = proposal("c", 1, 0, 0, ConfidenceLevel::High);

        let result = VotingEngine::default().vote(vec![mixed, strong, also_strong]).unwrap();
        assert_eq!(result.lead_proposal().map(|p| p.agent.as_str()), Some("b"));
    }
}
