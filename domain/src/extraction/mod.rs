//! Proposal extraction from agent transcripts.
//!
//! Pure text processing without I/O. Each message is handled independently and
//! failures degrade message by message.

pub mod extractor;
pub mod pattern;
pub mod payload;
pub mod strategy;

pub use extractor::{INFERRED_RATIONALE_CHARS, ProposalExtractor};
pub use payload::StructuredVerdict;
pub use strategy::{
    BareObjectStrategy, FencedBlockStrategy, PayloadStrategy, PythonBlockStrategy,
    WholeTextStrategy, default_strategies,
};
