//! Three-stage staging pipeline: extract → score → vote.

use crate::confidence::{EvidenceScorer, annotate};
use crate::extraction::ProposalExtractor;
use crate::quorum::{VotingEngine, VotingError, VotingResult, WeightPolicy};
use crate::staging::{Proposal, TranscriptMessage};

/// Bundles the three core stages for one configuration.
///
/// Stateless between calls: the same inputs always give the same result.
#[derive(Default)]
pub struct StagingPipeline {
    extractor: ProposalExtractor,
    scorer: EvidenceScorer,
    engine: VotingEngine,
}

impl StagingPipeline {
    pub fn new(extractor: ProposalExtractor, scorer: EvidenceScorer, engine: VotingEngine) -> Self {
        Self {
            extractor,
            scorer,
            engine,
        }
    }

    /// Pipeline with default extraction and scoring and the given weights.
    pub fn with_policy(policy: WeightPolicy) -> Self {
        Self {
            engine: VotingEngine::new(policy),
            ..Self::default()
        }
    }

    pub fn extractor(&self) -> &ProposalExtractor {
        &self.extractor
    }

    /// Stage 1: transcript → proposals.
    pub fn extract(&self, transcript: &[TranscriptMessage]) -> Vec<Proposal> {
        self.extractor.extract(transcript)
    }

    /// Stages 2 and 3: score and vote on already-extracted proposals.
    pub fn vote(
        &self,
        proposals: Vec<Proposal>,
        case_text: Option<&str>,
    ) -> Result<VotingResult, VotingError> {
        if proposals.is_empty() {
            return Err(VotingError::NothingToVote);
        }
        let annotated = annotate(proposals, case_text, &self.scorer);
        self.engine.vote(annotated)
    }

    /// Run all three stages.
    pub fn run(
        &self,
        transcript: &[TranscriptMessage],
        case_text: Option<&str>,
    ) -> Result<VotingResult, VotingError> {
        self.vote(self.extract(transcript), case_text)
    }
}
