//! Prize tier calculation.
//!
//! Ranks a candidate set against an official draw. Pure and total:
//! every candidate/draw pair maps to exactly one tier.

use crate::types::{Draw, NumberSet, PrizeTier};

/// Rank a candidate set against a draw.
///
/// Let `m` be the number of winning numbers the candidate matched:
/// - 6 matches → first prize
/// - 5 matches and the bonus number is in the candidate → second prize
/// - 5 matches → third prize
/// - 4 matches → fourth prize
/// - 3 matches → fifth prize
/// - anything else → no prize
pub fn rank(candidate: &NumberSet, draw: &Draw) -> PrizeTier {
    let matched = candidate.match_count(&draw.numbers);
    match matched {
        6 => PrizeTier::First,
        5 if candidate.contains(draw.bonus) => PrizeTier::Second,
        5 => PrizeTier::Third,
        4 => PrizeTier::Fourth,
        3 => PrizeTier::Fifth,
        _ => PrizeTier::Miss,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
