//! Staging configuration container.
//!
//! [`StagingConfig`] groups the configuration slices the staging use cases
//! need: base weights for voting and the evidence lexicon for confidence
//! scoring. Both are validated when the pipeline is built.

use tnm_domain::{DomainError, EvidenceLexicon, EvidenceScorer, ProposalExtractor};
use tnm_domain::{StagingPipeline, VotingEngine, WeightPolicy};

/// Configuration for building a [`StagingPipeline`].
#[derive(Debug, Clone, Default)]
pub struct StagingConfig {
    weights: WeightPolicy,
    lexicon: EvidenceLexicon,
}

impl StagingConfig {
    pub fn new(weights: WeightPolicy, lexicon: EvidenceLexicon) -> Self {
        Self { weights, lexicon }
    }

    // ==================== Accessors ====================

    pub fn weights(&self) -> &WeightPolicy {
        &self.weights
    }

    pub fn lexicon(&self) -> &EvidenceLexicon {
        &self.lexicon
    }

    // ==================== Builder Methods ====================

    pub fn with_weights(mut self, weights: WeightPolicy) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_lexicon(mut self, lexicon: EvidenceLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Validate the configuration and build the core pipeline.
    pub fn build_pipeline(&self) -> Result<StagingPipeline, DomainError> {
        self.weights.validate()?;
        let scorer = EvidenceScorer::new(self.lexicon.clone())?;
        Ok(StagingPipeline::new(
            ProposalExtractor::new(),
            scorer,
            VotingEngine::new(self.weights.clone()),
        ))
    }
}
