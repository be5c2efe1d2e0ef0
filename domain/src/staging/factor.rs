//! Staging factors and validated stage triples.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One of the three independent TNM decision dimensions.
///
/// Ordering follows the canonical label order (`T`, `N`, `M`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Factor {
    /// Primary tumor size / extent
    T,
    /// Regional lymph node involvement
    N,
    /// Distant metastasis
    M,
}

impl Factor {
    /// All factors in canonical order.
    pub const ALL: [Factor; 3] = [Factor::T, Factor::N, Factor::M];

    /// Highest legal value for this factor (inclusive).
    pub const fn max_value(&self) -> u8 {
        match self {
            Factor::T => 4,
            Factor::N => 3,
            Factor::M => 1,
        }
    }

    /// Check whether `value` lies in this factor's domain.
    pub fn accepts(&self, value: i64) -> bool {
        (0..=self.max_value() as i64).contains(&value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::T => "T",
            Factor::N => "N",
            Factor::M => "M",
        }
    }

    /// The factor's letter as a `char` (used when stripping `"T2"`-style prefixes).
    pub fn letter(&self) -> char {
        match self {
            Factor::T => 'T',
            Factor::N => 'N',
            Factor::M => 'M',
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Factor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "T" => Ok(Factor::T),
            "N" => Ok(Factor::N),
            "M" => Ok(Factor::M),
            other => Err(format!("Unknown factor: {}. Valid: T, N, M", other)),
        }
    }
}

/// A value for each of the three factors.
///
/// Serialized as an object keyed `T`, `N`, `M`, which keeps output
/// stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerFactor<V> {
    #[serde(rename = "T")]
    pub t: V,
    #[serde(rename = "N")]
    pub n: V,
    #[serde(rename = "M")]
    pub m: V,
}

impl<V> PerFactor<V> {
    /// Build a value for every factor from a closure.
    pub fn from_fn(mut f: impl FnMut(Factor) -> V) -> Self {
        Self {
            t: f(Factor::T),
            n: f(Factor::N),
            m: f(Factor::M),
        }
    }

    pub fn get(&self, factor: Factor) -> &V {
        match factor {
            Factor::T => &self.t,
            Factor::N => &self.n,
            Factor::M => &self.m,
        }
    }

    pub fn get_mut(&mut self, factor: Factor) -> &mut V {
        match factor {
            Factor::T => &mut self.t,
            Factor::N => &mut self.n,
            Factor::M => &mut self.m,
        }
    }

    /// Iterate `(factor, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, &V)> {
        Factor::ALL.into_iter().map(move |factor| (factor, self.get(factor)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Factor, &V) -> U) -> PerFactor<U> {
        PerFactor::from_fn(|factor| f(factor, self.get(factor)))
    }
}

/// A validated TNM triple.
///
/// Every value is guaranteed to be inside its factor's legal domain.
///
/// # Example
///
/// ```
/// use tnm_domain::Stage;
///
/// let stage = Stage::new(2, 1, 0).unwrap();
/// assert_eq!(stage.label(), "T2,N1,M0");
/// assert!(Stage::new(5, 0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PerFactor<i64>", into = "PerFactor<u8>")]
pub struct Stage {
    t: u8,
    n: u8,
    m: u8,
}

impl Stage {
    pub fn new(t: i64, n: i64, m: i64) -> Result<Self, DomainError> {
        Ok(Self {
            t: Self::check(Factor::T, t)?,
            n: Self::check(Factor::N, n)?,
            m: Self::check(Factor::M, m)?,
        })
    }

    /// Build from values already known to be in range.
    pub(crate) fn from_valid(t: u8, n: u8, m: u8) -> Self {
        debug_assert!(
            Factor::T.accepts(t as i64)
                && Factor::N.accepts(n as i64)
                && Factor::M.accepts(m as i64)
        );
        Self { t, n, m }
    }

    fn check(factor: Factor, value: i64) -> Result<u8, DomainError> {
        if factor.accepts(value) {
            Ok(value as u8)
        } else {
            Err(DomainError::InvalidFactorValue { factor, value })
        }
    }

    pub fn value(&self, factor: Factor) -> u8 {
        match factor {
            Factor::T => self.t,
            Factor::N => self.n,
            Factor::M => self.m,
        }
    }

    /// Canonical rendering, e.g. `T2,N1,M0`.
    pub fn label(&self) -> String {
        format!("T{},N{},M{}", self.t, self.n, self.m)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<PerFactor<i64>> for Stage {
    type Error = DomainError;

    fn try_from(values: PerFactor<i64>) -> Result<Self, Self::Error> {
        Stage::new(values.t, values.n, values.m)
    }
}

impl From<Stage> for PerFactor<u8> {
    fn from(stage: Stage) -> Self {
        PerFactor::from_fn(|factor| stage.value(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_domains() {
        assert!(Factor::T.accepts(4));
        assert!(!Factor::T.accepts(5));
        assert!(Factor::N.accepts(3));
        assert!(!Factor::N.accepts(4));
        assert!(Factor::M.accepts(1));
        assert!(!Factor::M.accepts(2));
        assert!(!Factor::M.accepts(-1));
    }

    #[test]
    fn test_stage_label() {
        let stage = Stage::new(3, 2, 1).unwrap();
        assert_eq!(stage.label(), "T3,N2,M1");
        assert_eq!(stage.to_string(), "T3,N2,M1");
        assert_eq!(stage.value(Factor::N), 2);
    }

    #[test]
    fn test_stage_rejects_out_of_domain() {
        let err = Stage::new(1, 4, 0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 4 for factor N (legal range 0..=3)");
    }

    #[test]
    fn test_stage_serde() {
        let stage = Stage::new(2, 1, 0).unwrap();
        let json = serde_json::to_string(&stage).unwrap();
        assert_eq!(json, r#"{"T":2,"N":1,"M":0}"#);

        let back: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stage);

        assert!(serde_json::from_str::<Stage>(r#"{"T":9,"N":1,"M":0}"#).is_err());
    }

    #[test]
    fn test_factor_from_str() {
        assert_eq!("t".parse::<Factor>().ok(), Some(Factor::T));
        assert_eq!(" M ".parse::<Factor>().ok(), Some(Factor::M));
        assert!("X".parse::<Factor>().is_err());
    }

    #[test]
    fn test_per_factor_iter_order() {
        let values = PerFactor::from_fn(|f| f.max_value());
        let collected: Vec<_> = values.iter().map(|(f, v)| (f, *v)).collect();
        assert_eq!(
            collected,
            vec![(Factor::T, 4), (Factor::N, 3), (Factor::M, 1)]
        );
    }
}
