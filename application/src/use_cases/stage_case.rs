//! Stage Case use case
//!
//! Runs the staging pipeline over one case and assembles the case record.

use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tnm_domain::{Proposal, StagingPipeline, TranscriptMessage, VotingError, VotingResult};
use tracing::{debug, info, warn};

/// Errors that can occur while staging a case
#[derive(Error, Debug)]
pub enum StageCaseError {
    #[error("no classifiable proposals found for case {case_id}")]
    NoProposals { case_id: String },

    #[error("Voting failed: {0}")]
    Voting(#[from] VotingError),
}

/// Input for the StageCase use case
#[derive(Debug, Clone, Default)]
pub struct StageCaseInput {
    /// Case identifier
    pub case_id: String,
    /// Classification scheme of the case (e.g. "TNM")
    pub case_type: String,
    /// Reference name recorded with the case, if any
    pub case_name: Option<String>,
    /// Clinical text used for evidence scoring
    pub case_text: Option<String>,
    /// Ordered discussion transcript
    pub transcript: Vec<TranscriptMessage>,
}

impl StageCaseInput {
    pub fn new(case_id: impl Into<String>, transcript: Vec<TranscriptMessage>) -> Self {
        Self {
            case_id: case_id.into(),
            case_type: "TNM".to_string(),
            transcript,
            ..Self::default()
        }
    }

    pub fn with_case_type(mut self, case_type: impl Into<String>) -> Self {
        self.case_type = case_type.into();
        self
    }

    pub fn with_case_name(mut self, name: impl Into<String>) -> Self {
        self.case_name = Some(name.into());
        self
    }

    /// Set the case text. Blank text counts as no text.
    pub fn with_case_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.case_text = (!text.trim().is_empty()).then_some(text);
        self
    }
}

/// Per-case output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: String,
    pub case_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,
    pub result: VotingResult,
    /// Rationale of the lead proposal
    pub rationale: String,
    /// Disagreement entries joined with ", "
    pub areas_of_disagreement: String,
}

impl CaseRecord {
    pub fn from_result(input: &StageCaseInput, result: VotingResult) -> Self {
        let rationale = result
            .lead_proposal()
            .map(|p| p.rationale.clone())
            .unwrap_or_default();
        let areas_of_disagreement = result.areas_of_disagreement();
        Self {
            case_id: input.case_id.clone(),
            case_type: input.case_type.clone(),
            case_name: input.case_name.clone(),
            result,
            rationale,
            areas_of_disagreement,
        }
    }

    pub fn label(&self) -> &str {
        &self.result.label
    }
}

/// Transcript positions that produced no proposal, in order.
pub fn skipped_messages(message_count: usize, proposals: &[Proposal]) -> Vec<usize> {
    let mut produced = proposals.iter().map(|p| p.message_index).peekable();
    (0..message_count)
        .filter(|index| {
            while produced.next_if(|i| i < index).is_some() {}
            produced.next_if_eq(index).is_none()
        })
        .collect()
}

/// Use case for staging a single case
pub struct StageCaseUseCase {
    pipeline: Arc<StagingPipeline>,
    audit: Arc<dyn AuditLogger>,
}

impl StageCaseUseCase {
    pub fn new(pipeline: Arc<StagingPipeline>) -> Self {
        Self {
            pipeline,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn audit_logger(&self) -> &Arc<dyn AuditLogger> {
        &self.audit
    }

    /// Execute the use case
    pub fn execute(&self, input: &StageCaseInput) -> Result<CaseRecord, StageCaseError> {
        info!(
            "Staging case {} ({} messages)",
            input.case_id,
            input.transcript.len()
        );

        let proposals = self.pipeline.extract(&input.transcript);
        for proposal in &proposals {
            debug!(
                "Case {}: message {} ({}) proposed {} via {}",
                input.case_id,
                proposal.message_index,
                proposal.agent,
                proposal.label,
                proposal.strategy.as_deref().unwrap_or("pattern")
            );
        }
        let skipped = skipped_messages(input.transcript.len(), &proposals);
        for &index in &skipped {
            debug!(
                "Case {}: message {} ({}) yielded no proposal",
                input.case_id, index, input.transcript[index].name
            );
        }
        debug!(
            "Case {}: {} proposals from {} messages",
            input.case_id,
            proposals.len(),
            input.transcript.len()
        );
        self.audit.log(AuditEvent::new(
            "proposals_extracted",
            json!({
                "case_id": input.case_id,
                "messages": input.transcript.len(),
                "proposals": proposals.len(),
                "labels": proposals.iter().map(|p| p.label.as_str()).collect::<Vec<_>>(),
                "skipped_messages": skipped,
            }),
        ));

        if proposals.is_empty() {
            let err = StageCaseError::NoProposals {
                case_id: input.case_id.clone(),
            };
            self.log_failure(&input.case_id, &err);
            return Err(err);
        }

        let result = match self.pipeline.vote(proposals, input.case_text.as_deref()) {
            Ok(result) => result,
            Err(e) => {
                let err = StageCaseError::from(e);
                self.log_failure(&input.case_id, &err);
                return Err(err);
            }
        };

        info!(
            "Case {} staged as {} (consensus {:.3})",
            input.case_id, result.label, result.consensus_score
        );
        self.audit.log(AuditEvent::new(
            "vote_completed",
            json!({
                "case_id": input.case_id,
                "label": result.label,
                "consensus_score": result.consensus_score,
                "disagreements": result.disagreements,
                "num_proposals": result.num_proposals,
            }),
        ));

        Ok(CaseRecord::from_result(input, result))
    }

    fn log_failure(&self, case_id: &str, err: &StageCaseError) {
        warn!("Case {} failed: {}", case_id, err);
        self.audit.log(AuditEvent::new(
            "case_failed",
            json!({ "case_id": case_id, "error": err.to_string() }),
        ));
    }
}
