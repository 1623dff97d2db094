//! Historical number frequency analysis.
//!
//! Counts how often each of the 45 numbers appeared among winning
//! numbers across a bounded historical window (bonus numbers are
//! excluded), and orders the universe coldest-first. The generator
//! partitions that ordering into its high/low candidate pools.

use crate::types::{Draw, HIGH_PIVOT, MAX_NUMBER};

/// Per-number occurrence counts over a draw history window.
///
/// Recomputed fresh on every generation run, never persisted.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u32; MAX_NUMBER as usize],
}

impl FrequencyTable {
    /// Tally winning-number occurrences across `history`.
    pub fn from_draws(history: &[Draw]) -> Self {
        let mut counts = [0u32; MAX_NUMBER as usize];
        for draw in history {
            for &n in draw.numbers.as_slice() {
                counts[(n - 1) as usize] += 1;
            }
        }
        Self { counts }
    }

    /// Occurrence count for a number (1..=45).
    pub fn count(&self, number: u8) -> u32 {
        self.counts[(number - 1) as usize]
    }

    /// All 45 `(number, count)` pairs sorted ascending by count, ties
    /// broken by numeric value ascending (stable sort over the natural
    /// 1..=45 enumeration). Numbers absent from history sort first.
    pub fn coldest_first(&self) -> Vec<(u8, u32)> {
        let mut pairs: Vec<(u8, u32)> = (1..=MAX_NUMBER)
            .map(|n| (n, self.count(n)))
            .collect();
        pairs.sort_by_key(|&(_, count)| count);
        pairs
    }

    /// The coldest high numbers (≥32), ascending-count order, at most
    /// `limit` of them.
    pub fn cold_high(&self, limit: usize) -> Vec<u8> {
        self.coldest_first()
            .into_iter()
            .filter(|&(n, _)| n >= HIGH_PIVOT)
            .take(limit)
            .map(|(n, _)| n)
            .collect()
    }

    /// The coldest low numbers (<32), ascending-count order, at most
    /// `limit` of them.
    pub fn cold_low(&self, limit: usize) -> Vec<u8> {
        self.coldest_first()
            .into_iter()
            .filter(|&(n, _)| n < HIGH_PIVOT)
            .take(limit)
            .map(|(n, _)| n)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
