//! Confidence estimation for proposals.
//!
//! Two independent signals per factor, fused conservatively:
//!
//! ```text
//!  case text ──▶ EvidenceScorer ──┐
//!                                 ├──▶ combine (both high → high, any low → low)
//!  proposals ──▶ agreement ───────┘
//! ```

pub mod agreement;
pub mod evidence;

pub use agreement::{agreement_confidence, agreement_rates};
pub use evidence::{EvidenceAssessment, EvidenceLexicon, EvidenceScorer};

use crate::staging::{FactorLevels, PerFactor, Proposal};

/// Per-factor conservative fusion of evidence and agreement levels.
pub fn combine(evidence: &FactorLevels, agreement: &FactorLevels) -> FactorLevels {
    PerFactor::from_fn(|factor| evidence.get(factor).combine(*agreement.get(factor)))
}

/// Fill the evidence, agreement and combined confidence of every proposal.
///
/// Agreement is computed against the original population, so the result
/// does not depend on annotation order. Without `case_text` every evidence
/// level is medium.
pub fn annotate(
    proposals: Vec<Proposal>,
    case_text: Option<&str>,
    scorer: &EvidenceScorer,
) -> Vec<Proposal> {
    let agreement: Vec<FactorLevels> = (0..proposals.len())
        .map(|index| agreement_confidence(index, &proposals))
        .collect();

    proposals
        .into_iter()
        .zip(agreement)
        .map(|(mut proposal, agreement)| {
            let evidence = match case_text {
                Some(text) => scorer.score(&proposal, text),
                None => EvidenceAssessment::inconclusive(),
            };
            proposal.combined_confidence = Some(combine(&evidence.levels, &agreement));
            proposal.evidence_confidence = Some(evidence.levels);
            proposal.evidence_reasons = Some(evidence.reasons);
            proposal.agreement_confidence = Some(agreement);
            proposal
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::{ConfidenceLevel, ProposalSource, Stage};

    const CLEAR_CASE: &str =
        "A 3.2 cm mass with ipsilateral hilar lymph node enlargement. No distant metastasis.";

    fn proposal(agent: &str, t: i64, n: i64, m: i64) -> Proposal {
        Proposal::new(agent, Stage::new(t, n, m).unwrap(), "", 0, ProposalSource::Structured)
    }

    #[test]
    fn test_annotate_fills_all_maps() {
        let proposals = vec![proposal("a", 2, 1, 0), proposal("b", 2, 1, 0)];
        let annotated = annotate(proposals, Some(CLEAR_CASE), &EvidenceScorer::default());

        for p in &annotated {
            assert_eq!(p.evidence_confidence, Some(FactorLevels::uniform(ConfidenceLevel::High)));
            assert_eq!(p.agreement_confidence, Some(FactorLevels::uniform(ConfidenceLevel::High)));
            assert_eq!(p.combined_confidence, Some(FactorLevels::uniform(ConfidenceLevel::High)));
            assert!(p.evidence_reasons.is_some());
        }
    }

    #[test]
    fn test_annotate_without_case_text_caps_at_medium() {
        let proposals = vec![proposal("a", 2, 1, 0), proposal("b", 2, 1, 0)];
        let annotated = annotate(proposals, None, &EvidenceScorer::default());
        assert_eq!(
            annotated[0].combined_confidence,
            Some(FactorLevels::uniform(ConfidenceLevel::Medium))
        );
    }

    #[test]
    fn test_weak_evidence_cannot_be_masked_by_agreement() {
        let proposals = vec![proposal("a", 2, 1, 0), proposal("b", 2, 1, 0)];
        let annotated = annotate(proposals, Some("Cough."), &EvidenceScorer::default());
        let combined = annotated[0].combined_confidence.unwrap();
        assert_eq!(combined.t, ConfidenceLevel::Low);
        assert_eq!(combined.n, ConfidenceLevel::Low);
        assert_eq!(combined.m, ConfidenceLevel::Medium);
    }
}
