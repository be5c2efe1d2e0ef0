//! Free-text fallback: find `T`, `N` and `M` tokens anywhere in a message.

use crate::staging::{Factor, Stage};
use regex::Regex;
use std::sync::LazyLock;

static T_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bT[:\s]*([0-4])").unwrap());
static N_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bN[:\s]*([0-3])").unwrap());
static M_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bM[:\s]*([01])").unwrap());

fn pattern(factor: Factor) -> &'static Regex {
    match factor {
        Factor::T => &T_PATTERN,
        Factor::N => &N_PATTERN,
        Factor::M => &M_PATTERN,
    }
}

/// First in-range value for `factor` in `text`.
pub fn find_factor(text: &str, factor: Factor) -> Option<i64> {
    pattern(factor)
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Infer a full stage from free text.
///
/// All three factors must match; a partial match yields `None`.
///
/// ```
/// use tnm_domain::extraction::pattern::infer_stage;
///
/// assert_eq!(infer_stage("I would stage this T2 N1 M0.").unwrap().label(), "T2,N1,M0");
/// assert!(infer_stage("T2 and N1, metastasis unclear").is_none());
/// ```
pub fn infer_stage(text: &str) -> Option<Stage> {
    let t = find_factor(text, Factor::T)?;
    let n = find_factor(text, Factor::N)?;
    let m = find_factor(text, Factor::M)?;
    Stage::new(t, n, m).ok()
}
