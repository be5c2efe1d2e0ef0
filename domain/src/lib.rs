//! Domain layer for tnm-quorum
//!
//! This crate contains the core staging logic: turning agent transcripts into
//! typed proposals and fusing them into one decision. It performs no I/O and
//! holds no state between calls.
//!
//! # Core Concepts
//!
//! ## Proposal
//!
//! One agent's claim for a case: a validated [`Stage`] triple plus
//! rationale, provenance and progressively filled confidence maps.
//!
//! ## Confidence
//!
//! Two signals per factor, evidence from the case text and agreement
//! among peers, fused pessimistically into a [`ConfidenceLevel`].
//!
//! ## Quorum Voting
//!
//! Per-factor weighted majority with first-seen tie-breaking, normalized
//! consensus scores and disagreement flags, packed into a [`VotingResult`].

pub mod confidence;
pub mod core;
pub mod extraction;
pub mod pipeline;
pub mod quorum;
pub mod staging;
pub mod util;

// Re-export commonly used types
pub use confidence::{EvidenceAssessment, EvidenceLexicon, EvidenceScorer, annotate};
pub use core::{error::DomainError, output_format::OutputFormat};
pub use extraction::{PayloadStrategy, ProposalExtractor};
pub use pipeline::StagingPipeline;
pub use quorum::{
    NO_DISAGREEMENT, UnlistedAgentWeight, VotingEngine, VotingError, VotingResult, WeightPolicy,
};
pub use staging::{
    AgentRole, ConfidenceLevel, Factor, FactorLevels, PerFactor, Proposal, ProposalSource, Stage,
    TranscriptMessage,
};
