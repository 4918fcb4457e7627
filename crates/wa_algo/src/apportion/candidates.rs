//! Candidate set: deviation score → first allocation discovered with that score.
//!
//! Policy: insert-if-absent on the exact score, lowest score wins. Scores are
//! non-negative finite floats, whose IEEE-754 bit patterns sort in the same
//! order as their values, so the map is keyed by `to_bits()`.

use std::collections::btree_map::{BTreeMap, Entry};

#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    by_score: BTreeMap<u64, Vec<u32>>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `counts` unless some earlier candidate already holds exactly `score`.
    /// Returns whether the candidate was kept.
    pub fn offer(&mut self, score: f64, counts: &[u32]) -> bool {
        debug_assert!(score.is_finite() && score >= 0.0, "score must be finite and >= 0");
        // -0.0 and 0.0 compare equal; fold both onto the +0.0 key.
        let key = if score == 0.0 { 0 } else { score.to_bits() };
        match self.by_score.entry(key) {
            Entry::Vacant(v) => {
                v.insert(counts.to_vec());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Lowest-score candidate.
    pub fn best(&self) -> Option<(f64, &[u32])> {
        self.by_score
            .iter()
            .next()
            .map(|(&bits, counts)| (f64::from_bits(bits), counts.as_slice()))
    }

    pub fn into_best(self) -> Option<(f64, Vec<u32>)> {
        self.by_score
            .into_iter()
            .next()
            .map(|(bits, counts)| (f64::from_bits(bits), counts))
    }

    pub fn len(&self) -> usize {
        self.by_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_score.is_empty()
    }
}
