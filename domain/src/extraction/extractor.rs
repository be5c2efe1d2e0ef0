//! Transcript → proposals.

use super::pattern::infer_stage;
use super::payload::StructuredVerdict;
use super::strategy::{PayloadStrategy, default_strategies};
use crate::staging::{Proposal, ProposalSource, TranscriptMessage};
use crate::util::truncate_chars;

/// Characters of message text kept as rationale for inferred proposals.
pub const INFERRED_RATIONALE_CHARS: usize = 300;

/// Turns a transcript into proposals, one per classifiable message.
///
/// Structured strategies are tried in order, each over all of its
/// candidates; the first payload carrying a complete in-range triple wins.
/// Otherwise the free-text pattern fallback runs. Messages that yield
/// nothing are skipped; extraction never fails.
///
/// # Example
///
/// ```
/// use tnm_domain::{ProposalExtractor, ProposalSource, TranscriptMessage};
///
/// let transcript = vec![
///     TranscriptMessage::new(
///         "Radiologist",
///         r#"Final: {"T": 2, "N": 1, "M": 0, "Rationale": "3.5 cm mass"}"#,
///     ),
///     TranscriptMessage::new("Admin", "Let's begin."),
///     TranscriptMessage::new("Oncologist", "I'd say T2 N0 M0."),
/// ];
///
/// let proposals = ProposalExtractor::new().extract(&transcript);
/// assert_eq!(proposals.len(), 2);
/// assert_eq!(proposals[0].source, ProposalSource::Structured);
/// assert_eq!(proposals[1].label, "T2,N0,M0");
/// assert_eq!(proposals[1].message_index, 2);
/// ```
pub struct ProposalExtractor {
    strategies: Vec<Box<dyn PayloadStrategy>>,
}

impl Default for ProposalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalExtractor {
    /// Extractor with the built-in strategy list.
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }

    /// Extractor with a custom strategy list (tried in the given order).
    pub fn with_strategies(strategies: Vec<Box<dyn PayloadStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a strategy after the existing ones.
    pub fn push_strategy(mut self, strategy: Box<dyn PayloadStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extract proposals, preserving transcript order.
    pub fn extract(&self, transcript: &[TranscriptMessage]) -> Vec<Proposal> {
        transcript
            .iter()
            .enumerate()
            .filter_map(|(index, message)| self.extract_message(index, message))
            .collect()
    }

    /// Extract a proposal from a single message, if it carries one.
    pub fn extract_message(
        &self,
        index: usize,
        message: &TranscriptMessage,
    ) -> Option<Proposal> {
        if let Some((strategy, verdict)) = self.structured_verdict(&message.content) {
            let mut proposal = Proposal::new(
                &message.name,
                verdict.stage,
                verdict.rationale,
                index,
                ProposalSource::Structured,
            )
            .with_role(message.agent_role)
            .with_strategy(strategy);
            proposal.stated_confidence = verdict.stated_confidence;
            return Some(proposal);
        }

        let stage = infer_stage(&message.content)?;
        Some(
            Proposal::new(
                &message.name,
                stage,
                truncate_chars(&message.content, INFERRED_RATIONALE_CHARS),
                index,
                ProposalSource::Inferred,
            )
            .with_role(message.agent_role),
        )
    }

    fn structured_verdict(&self, text: &str) -> Option<(&'static str, StructuredVerdict)> {
        self.strategies.iter().find_map(|strategy| {
            strategy
                .candidates(text)
                .iter()
                .find_map(StructuredVerdict::from_json)
                .map(|verdict| (strategy.name(), verdict))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::AgentRole;
    use serde_json::Value;

    fn msg(name: &str, content: &str) -> TranscriptMessage {
        TranscriptMessage::new(name, content)
    }

    #[test]
    fn test_structured_preferred_over_pattern() {
        // Prose mentions T1 N0 M0, payload says T3 N2 M1.
        let text = "Earlier I thought T1 N0 M0.\n```json\n{\"T\": 3, \"N\": 2, \"M\": 1}\n```";
        let proposal = ProposalExtractor::new().extract_message(0, &msg("a", text)).unwrap();
        assert_eq!(proposal.source, ProposalSource::Structured);
        assert_eq!(proposal.label, "T3,N2,M1");
    }

    #[test]
    fn test_payload_without_triple_falls_through_to_pattern() {
        let text = "```json\n{\"top_k_specialists\": [\"Radiologist\"]}\n```\nStaging: T2, N0, M0";
        let proposal = ProposalExtractor::new().extract_message(4, &msg("a", text)).unwrap();
        assert_eq!(proposal.source, ProposalSource::Inferred);
        assert_eq!(proposal.label, "T2,N0,M0");
        assert_eq!(proposal.message_index, 4);
    }

    #[test]
    fn test_out_of_range_payload_falls_through() {
        let text = "{\"T\": 7, \"N\": 0, \"M\": 0}";
        assert!(ProposalExtractor::new().extract_message(0, &msg("a", text)).is_none());
    }

    #[test]
    fn test_inferred_rationale_truncated() {
        let text = format!("T1 N0 M0 {}", "x".repeat(500));
        let proposal = ProposalExtractor::new().extract_message(0, &msg("a", &text)).unwrap();
        assert_eq!(proposal.rationale.chars().count(), INFERRED_RATIONALE_CHARS);
    }

    #[test]
    fn test_role_carried_over() {
        let message = TranscriptMessage::supervisor("Lead", "{\"T\": 1, \"N\": 0, \"M\": 0}");
        let proposal = ProposalExtractor::new().extract_message(0, &message).unwrap();
        assert_eq!(proposal.role, AgentRole::Supervisor);
    }

    #[test]
    fn test_never_more_proposals_than_messages() {
        let transcript = vec![
            msg("a", "T1 N0 M0"),
            msg("b", "nothing here"),
            msg("c", "```json\n{broken\n```"),
            msg("a", "revised: T2 N0 M0"),
        ];
        let proposals = ProposalExtractor::new().extract(&transcript);
        assert!(proposals.len() <= transcript.len());
        assert_eq!(proposals.len(), 2);
        assert!(proposals.windows(2).all(|w| w[0].message_index <= w[1].message_index));
    }

    #[test]
    fn test_custom_strategy_appended() {
        struct KeyValueStrategy;
        impl PayloadStrategy for KeyValueStrategy {
            fn name(&self) -> &'static str {
                "key_value"
            }
            fn candidates(&self, text: &str) -> Vec<Value> {
                let Some(pairs) = text.strip_prefix("STAGE ") else {
                    return vec![];
                };
                let mut map = serde_json::Map::new();
                for pair in pairs.split(';') {
                    if let Some((k, v)) = pair.split_once('=') {
                        map.insert(k.trim().to_string(), Value::String(v.trim().to_string()));
                    }
                }
                vec![Value::Object(map)]
            }
        }

        let extractor =
            ProposalExtractor::with_strategies(vec![]).push_strategy(Box::new(KeyValueStrategy));
        assert_eq!(extractor.strategy_names(), vec!["key_value"]);
        let proposal = extractor.extract_message(0, &msg("a", "STAGE T=4; N=3; M=1")).unwrap();
        assert_eq!(proposal.source, ProposalSource::Structured);
        assert_eq!(proposal.strategy.as_deref(), Some("key_value"));
        assert_eq!(proposal.label, "T4,N3,M1");
    }

    #[test]
    fn test_later_fenced_block_carries_the_verdict() {
        let text = "```json\n{\"top_k_specialists\": [\"Radiologist\"]}\n```\nFinal:\n\
                    ```json\n{\"T\": 2, \"N\": 1, \"M\": 0}\n```";
        let proposals = ProposalExtractor::new().extract(&[msg("Sup", text)]);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].source, ProposalSource::Structured);
        assert_eq!(proposals[0].strategy.as_deref(), Some("fenced_block"));
        assert_eq!(proposals[0].label, "T2,N1,M0");
    }

    #[test]
    fn test_later_bare_object_carries_the_verdict() {
        let text = r#"Team: {"top_k_specialists": ["Pathologist"]} then {"T": 1, "N": 2, "M": 0}"#;
        let proposal = ProposalExtractor::new().extract_message(0, &msg("a", text)).unwrap();
        assert_eq!(proposal.strategy.as_deref(), Some("bare_object"));
        assert_eq!(proposal.label, "T1,N2,M0");
    }

    #[test]
    fn test_inferred_has_no_strategy() {
        let proposal = ProposalExtractor::new().extract_message(0, &msg("a", "T1 N0 M0")).unwrap();
        assert!(proposal.strategy.is_none());
    }
}
