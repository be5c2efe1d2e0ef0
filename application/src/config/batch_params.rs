//! Concurrency control for multi-case runs.
//!
//! These are application-layer concerns, not staging policy.

use serde::{Deserialize, Serialize};

/// Controls how many cases a batch run processes at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchParams {
    /// Maximum number of cases loaded and staged concurrently.
    pub max_concurrent_cases: usize,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            max_concurrent_cases: 8,
        }
    }
}

impl BatchParams {
    pub fn with_max_concurrent_cases(mut self, max: usize) -> Self {
        self.max_concurrent_cases = max.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(BatchParams::default().max_concurrent_cases, 8);
    }

    #[test]
    fn test_zero_is_clamped() {
        assert_eq!(BatchParams::default().with_max_concurrent_cases(0).max_concurrent_cases, 1);
    }
}
