//! Interpretation of a decoded payload as a staging verdict.

use crate::staging::{ConfidenceLevel, Factor, FactorLevels, Stage};
use serde_json::Value;

/// A verdict read from a structured payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredVerdict {
    pub stage: Stage,
    pub rationale: String,
    pub stated_confidence: Option<FactorLevels>,
}

impl StructuredVerdict {
    /// Read a verdict from a JSON object.
    ///
    /// Expected shape (extra keys are ignored):
    /// ```json
    /// {"T": 2, "N": "N1", "M": 0, "Rationale": "...", "Confidence": {"T": "high", ...}}
    /// ```
    ///
    /// Returns `None` unless all three factors are present and in range.
    pub fn from_json(json: &Value) -> Option<Self> {
        let t = factor_value(json, Factor::T)?;
        let n = factor_value(json, Factor::N)?;
        let m = factor_value(json, Factor::M)?;
        let stage = Stage::new(t, n, m).ok()?;

        let rationale = lookup(json, "Rationale")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let stated_confidence = lookup(json, "Confidence").and_then(stated_levels);

        Some(Self {
            stage,
            rationale,
            stated_confidence,
        })
    }
}

/// Look up `key`, falling back to its lowercase form.
fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    json.get(key).or_else(|| json.get(key.to_lowercase()))
}

fn factor_value(json: &Value, factor: Factor) -> Option<i64> {
    let raw = lookup(json, factor.as_str())?;
    let value = decode_factor_value(factor, raw)?;
    factor.accepts(value).then_some(value)
}

/// Decode a factor value from a JSON number or a string such as `"2"`,
/// `"T2"` or `"t1a"` (sub-classification letters are dropped).
pub fn decode_factor_value(factor: Factor, raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            let s = s
                .strip_prefix(factor.letter())
                .or_else(|| s.strip_prefix(factor.letter().to_ascii_lowercase()))
                .unwrap_or(s);
            let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn stated_levels(json: &Value) -> Option<FactorLevels> {
    let level = |factor: Factor| {
        lookup(json, factor.as_str())?
            .as_str()?
            .parse::<ConfidenceLevel>()
            .ok()
    };
    Some(FactorLevels {
        t: level(Factor::T)?,
        n: level(Factor::N)?,
        m: level(Factor::M)?,
    })
}
