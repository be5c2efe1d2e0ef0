//! Agreement-based confidence: how many peers back each factor value.

use crate::staging::{ConfidenceLevel, Factor, FactorLevels, PerFactor, Proposal};

/// Fraction of the other proposals sharing the scored proposal's value.
///
/// `index` is the scored proposal's position in `all`; every other position
/// counts as a peer, including earlier or later statements by the same agent.
/// Returns `None` when there are no peers.
pub fn agreement_rates(index: usize, all: &[Proposal]) -> Option<PerFactor<f64>> {
    let subject = all.get(index)?;
    let peers = all.len().checked_sub(1).filter(|&n| n > 0)?;

    Some(PerFactor::from_fn(|factor| {
        let agreeing = all
            .iter()
            .enumerate()
            .filter(|(i, other)| *i != index && other.value(factor) == subject.value(factor))
            .count();
        agreeing as f64 / peers as f64
    }))
}

/// Agreement-based levels: `≥0.8` high, `≥0.5` medium, else low.
///
/// With fewer than two proposals there is no agreement signal and every
/// factor is medium.
pub fn agreement_confidence(index: usize, all: &[Proposal]) -> FactorLevels {
    match agreement_rates(index, all) {
        Some(rates) => rates.map(|_, rate| ConfidenceLevel::from_agreement_rate(*rate)),
        None => FactorLevels::uniform(ConfidenceLevel::Medium),
    }
}

/// Agreement level of one factor, for callers that only need a single value.
pub fn factor_agreement(index: usize, all: &[Proposal], factor: Factor) -> ConfidenceLevel {
    *agreement_confidence(index, all).get(factor)
}
