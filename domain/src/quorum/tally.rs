//! Per-factor weighted vote tally with first-seen tie-breaking.

use std::collections::BTreeMap;

/// Accumulated weight per candidate value, in the order values first appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    entries: Vec<(u8, f64)>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to `value`, registering the value on first sight.
    pub fn add(&mut self, value: u8, weight: f64) {
        match self.entries.iter_mut().find(|(v, _)| *v == value) {
            Some((_, total)) => *total += weight,
            None => self.entries.push((value, weight)),
        }
    }

    /// The value with the highest weight and its weight.
    ///
    /// On a tie the value that was added first wins.
    pub fn winner(&self) -> Option<(u8, f64)> {
        self.entries.iter().fold(None, |best, &(value, weight)| match best {
            Some((_, best_weight)) if weight <= best_weight => best,
            _ => Some((value, weight)),
        })
    }

    pub fn weight_of(&self, value: u8) -> f64 {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot ordered by value, for stable serialization.
    pub fn distribution(&self) -> BTreeMap<u8, f64> {
        self.entries.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates() {
        let mut tally = Tally::new();
        tally.add(2, 1.0);
        tally.add(3, 0.5);
        tally.add(2, 1.5);
        assert_eq!(tally.weight_of(2), 2.5);
        assert_eq!(tally.weight_of(1), 0.0);
        assert_eq!(tally.winner(), Some((2, 2.5)));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let mut tally = Tally::new();
        tally.add(3, 1.0);
        tally.add(1, 1.0);
        assert_eq!(tally.winner(), Some((3, 1.0)));

        let mut reversed = Tally::new();
        reversed.add(1, 1.0);
        reversed.add(3, 1.0);
        assert_eq!(reversed.winner(), Some((1, 1.0)));
    }

    #[test]
    fn test_empty_has_no_winner() {
        assert!(Tally::new().winner().is_none());
        assert!(Tally::new().is_empty());
    }

    #[test]
    fn test_distribution_sorted_by_value() {
        let mut tally = Tally::new();
        tally.add(3, 1.0);
        tally.add(0, 0.5);
        let keys: Vec<_> = tally.distribution().into_keys().collect();
        assert_eq!(keys, vec![0, 3]);
    }
}
