//! Evidence-based confidence: how clearly the case text documents each factor.
//!
//! The scorer never looks at the proposed values. It only asks whether the
//! source material makes the factor decidable.
//!
//! Negation handling is phrase-list based and therefore incomplete; the
//! phrase sets live in [`EvidenceLexicon`] so they can be tuned per corpus.

use crate::core::error::DomainError;
use crate::staging::{ConfidenceLevel, FactorLevels, PerFactor, Proposal};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Keyword sets used by the evidence scorer.
///
/// Defaults cover English and Japanese radiology phrasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceLexicon {
    /// Units that make a number a tumor magnitude (e.g. `3.2 cm`)
    pub size_units: Vec<String>,
    /// Local extent / invasion keywords (T)
    pub invasion_keywords: Vec<String>,
    /// Lymph node keywords (N)
    pub lymph_keywords: Vec<String>,
    /// Laterality keywords that make nodal location explicit (N)
    pub laterality_keywords: Vec<String>,
    /// Distant involvement keywords (M)
    pub distant_keywords: Vec<String>,
    /// Phrases that explicitly negate distant involvement (M)
    pub distant_negations: Vec<String>,
    /// Generic negation phrases (M, informational only)
    pub generic_negations: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for EvidenceLexicon {
    fn default() -> Self {
        Self {
            size_units: strings(&["cm", "mm", "㎝"]),
            invasion_keywords: strings(&[
                "mediastinum", "trachea", "heart", "chest wall", "invasion",
                "浸潤", "縦隔", "気管", "心臓", "胸壁",
            ]),
            lymph_keywords: strings(&[
                "lymph node", "リンパ節", "hilar", "mediastinal", "scalene",
                "supraclavicular", "肺門", "縦隔", "鎖骨上",
            ]),
            laterality_keywords: strings(&[
                "ipsilateral", "contralateral", "同側", "対側", "同側縦隔", "対側縦隔",
            ]),
            distant_keywords: strings(&[
                "metastasis", "転移", "distant", "bone", "liver", "brain", "adrenal",
                "骨転移", "遠隔転移", "肝転移", "脳転移", "副腎",
            ]),
            distant_negations: strings(&["no distant", "胸水認めません"]),
            generic_negations: strings(&["認めません", "ありません", "ない", "no"]),
        }
    }
}

impl EvidenceLexicon {
    /// Check that every list needed for scoring is usable.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.size_units.iter().all(|u| u.trim().is_empty()) {
            return Err(DomainError::InvalidLexicon(
                "size_units must contain at least one unit".to_string(),
            ));
        }
        Ok(())
    }
}

/// Evidence levels plus the reasons behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceAssessment {
    pub levels: FactorLevels,
    pub reasons: PerFactor<Vec<String>>,
}

impl EvidenceAssessment {
    /// Assessment used when no case text is available.
    pub fn inconclusive() -> Self {
        Self {
            levels: FactorLevels::uniform(ConfidenceLevel::Medium),
            reasons: PerFactor::from_fn(|_| vec!["No case text available".to_string()]),
        }
    }
}

/// Scores textual evidence clarity per factor.
///
/// # Example
///
/// ```
/// use tnm_domain::confidence::EvidenceScorer;
/// use tnm_domain::ConfidenceLevel;
///
/// let scorer = EvidenceScorer::default();
/// let assessment = scorer.assess(
///     "A 2.8 cm nodule with ipsilateral hilar lymph node. No distant metastasis.",
/// );
/// assert_eq!(assessment.levels.t, ConfidenceLevel::High);
/// assert_eq!(assessment.levels.n, ConfidenceLevel::High);
/// assert_eq!(assessment.levels.m, ConfidenceLevel::High);
/// ```
#[derive(Debug, Clone)]
pub struct EvidenceScorer {
    lexicon: EvidenceLexicon,
    magnitude: Regex,
}

impl Default for EvidenceScorer {
    fn default() -> Self {
        Self::new(EvidenceLexicon::default()).expect("default lexicon compiles")
    }
}

impl EvidenceScorer {
    pub fn new(lexicon: EvidenceLexicon) -> Result<Self, DomainError> {
        lexicon.validate()?;

        let units = lexicon
            .size_units
            .iter()
            .filter(|u| !u.trim().is_empty())
            .map(|u| regex::escape(u.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let magnitude = RegexBuilder::new(&format!(r"(\d+(?:\.\d+)?)\s*(?:{})", units))
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::InvalidLexicon(e.to_string()))?;

        Ok(Self { lexicon, magnitude })
    }

    pub fn lexicon(&self) -> &EvidenceLexicon {
        &self.lexicon
    }

    /// Score `case_text` for a proposal.
    ///
    /// The proposal is accepted for a uniform per-proposal call shape but is
    /// not inspected.
    pub fn score(&self, _proposal: &Proposal, case_text: &str) -> EvidenceAssessment {
        self.assess(case_text)
    }

    /// Score the clarity of `case_text` for each factor.
    pub fn assess(&self, case_text: &str) -> EvidenceAssessment {
        let lowered = case_text.to_lowercase();
        let (t, t_reasons) = self.assess_t(case_text, &lowered);
        let (n, n_reasons) = self.assess_n(&lowered);
        let (m, m_reasons) = self.assess_m(case_text, &lowered);

        EvidenceAssessment {
            levels: FactorLevels { t, n, m },
            reasons: PerFactor {
                t: t_reasons,
                n: n_reasons,
                m: m_reasons,
            },
        }
    }

    fn assess_t(&self, text: &str, lowered: &str) -> (ConfidenceLevel, Vec<String>) {
        let mut reasons = Vec::new();
        let mut level = if self.magnitude.is_match(text) {
            reasons.push("Tumor size explicitly mentioned".to_string());
            ConfidenceLevel::High
        } else {
            reasons.push("Tumor size not mentioned".to_string());
            ConfidenceLevel::Low
        };

        if contains_any(lowered, &self.lexicon.invasion_keywords) {
            level = level.max(ConfidenceLevel::Medium);
            reasons.push("Invasion mentioned".to_string());
        }

        (level, reasons)
    }

    fn assess_n(&self, lowered: &str) -> (ConfidenceLevel, Vec<String>) {
        if !contains_any(lowered, &self.lexicon.lymph_keywords) {
            return (
                ConfidenceLevel::Low,
                vec!["No clear lymph node information".to_string()],
            );
        }

        if contains_any(lowered, &self.lexicon.laterality_keywords) {
            (
                ConfidenceLevel::High,
                vec!["Lymph node location clearly specified".to_string()],
            )
        } else {
            (
                ConfidenceLevel::Medium,
                vec!["Lymph nodes mentioned but location ambiguous".to_string()],
            )
        }
    }

    fn assess_m(&self, text: &str, lowered: &str) -> (ConfidenceLevel, Vec<String>) {
        if contains_any(lowered, &self.lexicon.distant_keywords) {
            return (
                ConfidenceLevel::High,
                vec!["Distant metastasis explicitly mentioned".to_string()],
            );
        }
        if contains_any(lowered, &self.lexicon.distant_negations) {
            return (
                ConfidenceLevel::High,
                vec!["Explicitly stated no distant metastasis".to_string()],
            );
        }

        // Silence is inconclusive, never negative evidence.
        let reason = if self.lexicon.generic_negations.iter().any(|kw| text.contains(kw.as_str())) {
            "Negative statement about metastasis"
        } else {
            "No explicit mention of distant metastasis"
        };
        (ConfidenceLevel::Medium, vec![reason.to_string()])
    }
}

fn contains_any(lowered: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .filter(|kw| !kw.is_empty())
        .any(|kw| lowered.contains(&kw.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess(text: &str) -> EvidenceAssessment {
        EvidenceScorer::default().assess(text)
    }

    #[test]
    fn test_t_magnitude_is_high() {
        assert_eq!(assess("mass measuring 35 mm").levels.t, ConfidenceLevel::High);
        assert_eq!(assess("腫瘤径 2.5㎝").levels.t, ConfidenceLevel::High);
        assert_eq!(assess("A 3.1 CM lesion").levels.t, ConfidenceLevel::High);
    }

    #[test]
    fn test_t_invasion_without_magnitude_is_medium() {
        let a = assess("Tumor with chest wall invasion");
        assert_eq!(a.levels.t, ConfidenceLevel::Medium);
        assert_eq!(a.reasons.t.len(), 2);
    }

    #[test]
    fn test_t_nothing_is_low() {
        assert_eq!(assess("A lesion in the right upper lobe").levels.t, ConfidenceLevel::Low);
    }

    #[test]
    fn test_n_levels() {
        assert_eq!(assess("No adenopathy").levels.n, ConfidenceLevel::Low);
        assert_eq!(assess("Enlarged hilar lymph node").levels.n, ConfidenceLevel::Medium);
        assert_eq!(
            assess("Contralateral mediastinal lymph node").levels.n,
            ConfidenceLevel::High
        );
        assert_eq!(assess("同側肺門リンパ節腫大").levels.n, ConfidenceLevel::High);
    }

    #[test]
    fn test_m_is_never_low() {
        assert_eq!(assess("Liver lesions present").levels.m, ConfidenceLevel::High);
        assert_eq!(assess("There is NO DISTANT spread").levels.m, ConfidenceLevel::High);
        assert_eq!(assess("胸水認めません").levels.m, ConfidenceLevel::High);

        let negated = assess("明らかな病変は認めません");
        assert_eq!(negated.levels.m, ConfidenceLevel::Medium);
        assert_eq!(negated.reasons.m, vec!["Negative statement about metastasis"]);

        let silent = assess("Cough for three weeks");
        assert_eq!(silent.levels.m, ConfidenceLevel::Medium);
        assert_eq!(silent.reasons.m, vec!["No explicit mention of distant metastasis"]);
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = EvidenceLexicon {
            distant_negations: vec!["m0 confirmed".to_string()],
            distant_keywords: vec![],
            ..EvidenceLexicon::default()
        };
        let scorer = EvidenceScorer::new(lexicon).unwrap();
        assert_eq!(scorer.assess("M0 confirmed on PET").levels.m, ConfidenceLevel::High);
    }

    #[test]
    fn test_empty_units_rejected() {
        let lexicon = EvidenceLexicon {
            size_units: vec![" ".to_string()],
            ..EvidenceLexicon::default()
        };
        assert!(EvidenceScorer::new(lexicon).is_err());
    }

    #[test]
    fn test_inconclusive_is_all_medium() {
        let a = EvidenceAssessment::inconclusive();
        assert_eq!(a.levels, FactorLevels::uniform(ConfidenceLevel::Medium));
    }
}
