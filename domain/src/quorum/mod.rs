//! Quorum voting domain
//!
//! Weighted majority voting that fuses many agents' proposals into one
//! staging decision.
//!
//! # Pipeline
//!
//! ```text
//! extraction (proposals)
//!   -> confidence (evidence x agreement)
//!   -> VotingEngine (weight x multiplier, per-factor tally,
//!                    consensus and disagreement)
//! ```
//!
//! # Weights
//!
//! | combined confidence | multiplier |
//! |---------------------|------------|
//! | low                 | 0.5        |
//! | medium              | 1.0        |
//! | high                | 1.5        |
//!
//! Consensus per factor is the winning weight divided by
//! `Σ base weights × 1.5`, the weight every agent would contribute voting
//! for the winner with high confidence.

pub mod engine;
pub mod result;
pub mod tally;
pub mod weight;

pub use engine::{
    DISAGREEMENT_THRESHOLD, FactorOutcome, VotingEngine, VotingError, aggregate_confidence,
};
pub use result::{NO_DISAGREEMENT, VotingResult};
pub use tally::Tally;
pub use weight::{UnlistedAgentWeight, WeightPolicy};
