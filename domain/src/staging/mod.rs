//! Staging vocabulary shared by extraction, confidence and voting.
//!
//! - [`Factor`] / [`Stage`]: the three TNM dimensions and a validated triple
//! - [`ConfidenceLevel`]: categorical confidence with vote multipliers
//! - [`Proposal`]: one agent's claim, annotated progressively
//! - [`TranscriptMessage`]: input record from the conversation layer

pub mod confidence;
pub mod factor;
pub mod proposal;
pub mod transcript;

pub use confidence::{ConfidenceLevel, FactorLevels};
pub use factor::{Factor, PerFactor, Stage};
pub use proposal::{Proposal, ProposalSource};
pub use transcript::{AgentRole, TranscriptMessage};
