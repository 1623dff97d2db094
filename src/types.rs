//! Shared types for the LOTTO45 agent.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that source, analysis,
//! engine, and storage modules can depend on them without
//! circular references.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Size of one ticket: six numbers per set.
pub const SET_SIZE: usize = 6;

/// The draw universe: numbers run 1..=45.
pub const MAX_NUMBER: u8 = 45;

/// Numbers at or above this value count as "high" for pool
/// partitioning and the high-number quota filter.
pub const HIGH_PIVOT: u8 = 32;

// ---------------------------------------------------------------------------
// NumberSet
// ---------------------------------------------------------------------------

/// One candidate ticket: six distinct numbers in 1..=45, stored sorted
/// ascending. Equality is array equality, which under the sort invariant
/// is exactly set equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct NumberSet([u8; SET_SIZE]);

impl NumberSet {
    /// Build a set from six numbers. Sorts them ascending and rejects
    /// out-of-range or duplicate members.
    pub fn new(mut numbers: [u8; SET_SIZE]) -> Result<Self, LottoError> {
        numbers.sort_unstable();
        for pair in numbers.windows(2) {
            if pair[0] == pair[1] {
                return Err(LottoError::InvalidNumberSet(format!(
                    "duplicate number {}",
                    pair[0]
                )));
            }
        }
        for &n in &numbers {
            if n < 1 || n > MAX_NUMBER {
                return Err(LottoError::InvalidNumberSet(format!(
                    "number {n} outside 1..={MAX_NUMBER}"
                )));
            }
        }
        Ok(Self(numbers))
    }

    /// Build a set from a slice of arbitrary length (must be exactly six).
    pub fn from_slice(numbers: &[u8]) -> Result<Self, LottoError> {
        let arr: [u8; SET_SIZE] = numbers.try_into().map_err(|_| {
            LottoError::InvalidNumberSet(format!(
                "expected {SET_SIZE} numbers, got {}",
                numbers.len()
            ))
        })?;
        Self::new(arr)
    }

    /// The members, sorted ascending.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Whether `n` is a member.
    pub fn contains(&self, n: u8) -> bool {
        self.0.contains(&n)
    }

    /// How many members this set shares with `other`.
    pub fn match_count(&self, other: &NumberSet) -> usize {
        self.0.iter().filter(|n| other.contains(**n)).count()
    }

    /// Count of members at or above the high pivot (32).
    pub fn high_count(&self) -> usize {
        self.0.iter().filter(|n| **n >= HIGH_PIVOT).count()
    }

    /// Sum of the six members (used for commentary annotation).
    pub fn sum(&self) -> u32 {
        self.0.iter().map(|n| *n as u32).sum()
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| n.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

impl TryFrom<Vec<u8>> for NumberSet {
    type Error = LottoError;

    fn try_from(v: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_slice(&v)
    }
}

impl From<NumberSet> for Vec<u8> {
    fn from(set: NumberSet) -> Self {
        set.0.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Draw
// ---------------------------------------------------------------------------

/// The official outcome of one round: six winning numbers plus a bonus
/// number disjoint from them. Immutable once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub round: u32,
    pub numbers: NumberSet,
    pub bonus: u8,
}

impl Draw {
    /// Validate and build a draw. The bonus must be in range and must not
    /// repeat a winning number.
    pub fn new(round: u32, numbers: NumberSet, bonus: u8) -> Result<Self, LottoError> {
        if round == 0 {
            return Err(LottoError::InvalidDraw("round must be positive".into()));
        }
        if bonus < 1 || bonus > MAX_NUMBER {
            return Err(LottoError::InvalidDraw(format!(
                "bonus {bonus} outside 1..={MAX_NUMBER}"
            )));
        }
        if numbers.contains(bonus) {
            return Err(LottoError::InvalidDraw(format!(
                "bonus {bonus} repeats a winning number"
            )));
        }
        Ok(Self {
            round,
            numbers,
            bonus,
        })
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} {} + {}", self.round, self.numbers, self.bonus)
    }
}

// ---------------------------------------------------------------------------
// Prize tiers
// ---------------------------------------------------------------------------

/// Prize tier awarded to a number set against a draw.
///
/// Declaration order doubles as ranking: `First` is best and `Miss` is
/// worst, so `Ord`/`min` pick the better tier directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PrizeTier {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Miss,
}

impl PrizeTier {
    /// All tiers, best first (useful for iteration).
    pub const ALL: &'static [PrizeTier] = &[
        PrizeTier::First,
        PrizeTier::Second,
        PrizeTier::Third,
        PrizeTier::Fourth,
        PrizeTier::Fifth,
        PrizeTier::Miss,
    ];

    /// Whether this tier pays out at all.
    pub fn is_prize(&self) -> bool {
        !matches!(self, PrizeTier::Miss)
    }

    /// Numeric rank 1..=5 for prize tiers, None for a miss.
    pub fn rank_number(&self) -> Option<u8> {
        match self {
            PrizeTier::First => Some(1),
            PrizeTier::Second => Some(2),
            PrizeTier::Third => Some(3),
            PrizeTier::Fourth => Some(4),
            PrizeTier::Fifth => Some(5),
            PrizeTier::Miss => None,
        }
    }

    /// Short human label, persisted in the per-set breakdown.
    pub fn label(&self) -> &'static str {
        match self {
            PrizeTier::First => "1st prize",
            PrizeTier::Second => "2nd prize",
            PrizeTier::Third => "3rd prize",
            PrizeTier::Fourth => "4th prize",
            PrizeTier::Fifth => "5th prize",
            PrizeTier::Miss => "no prize",
        }
    }
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Prediction records
// ---------------------------------------------------------------------------

/// Lifecycle of a prediction record. Transitions Pending → Won/Lost
/// exactly once; resolved records are never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionStatus {
    Pending,
    Won,
    Lost,
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionStatus::Pending => write!(f, "pending"),
            PredictionStatus::Won => write!(f, "won"),
            PredictionStatus::Lost => write!(f, "lost"),
        }
    }
}

/// Outcome of one candidate set against the resolved draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOutcome {
    /// 1-based position within the record's candidate sets.
    pub index: usize,
    pub numbers: NumberSet,
    pub tier: PrizeTier,
    pub label: String,
}

/// The patch applied to a pending record when its round resolves.
/// Persisted atomically as a single update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub draw: Draw,
    /// Best tier among the candidate sets, None when every set missed.
    pub best_tier: Option<PrizeTier>,
    pub outcomes: Vec<SetOutcome>,
    pub resolved_at: DateTime<Utc>,
}

impl Resolution {
    /// The status this resolution settles the record into.
    pub fn status(&self) -> PredictionStatus {
        if self.best_tier.is_some() {
            PredictionStatus::Won
        } else {
            PredictionStatus::Lost
        }
    }
}

/// One stored prediction: a batch of candidate sets for a future round,
/// created pending and settled exactly once after the draw publishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub round: u32,
    /// The full candidate batch; `sets[0]` is the primary recommendation.
    pub sets: Vec<NumberSet>,
    pub comment: String,
    pub draw_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub status: PredictionStatus,
    pub best_tier: Option<PrizeTier>,
    pub winning_draw: Option<Draw>,
    pub set_outcomes: Option<Vec<SetOutcome>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl PredictionRecord {
    /// Create a fresh pending record for a round that has not drawn yet.
    pub fn new_pending(
        round: u32,
        sets: Vec<NumberSet>,
        comment: String,
        draw_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            sets,
            comment,
            draw_date,
            created_at: Utc::now(),
            status: PredictionStatus::Pending,
            best_tier: None,
            winning_draw: None,
            set_outcomes: None,
            resolved_at: None,
        }
    }

    /// The primary (first) recommendation, if any sets exist.
    pub fn primary(&self) -> Option<&NumberSet> {
        self.sets.first()
    }

    pub fn is_pending(&self) -> bool {
        self.status == PredictionStatus::Pending
    }

    /// Apply a resolution in place. The caller (store) guards that this
    /// only ever runs against a pending record.
    pub fn apply(&mut self, resolution: Resolution) {
        self.status = resolution.status();
        self.best_tier = resolution.best_tier;
        self.winning_draw = Some(resolution.draw);
        self.set_outcomes = Some(resolution.outcomes);
        self.resolved_at = Some(resolution.resolved_at);
    }
}

impl fmt::Display for PredictionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {} | {} sets | {} | best: {}",
            self.round,
            self.sets.len(),
            self.status,
            self.best_tier
                .map(|t| t.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Summary of one reconcile→generate batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub pending_checked: usize,
    pub resolved_won: usize,
    pub resolved_lost: usize,
    pub skipped_unavailable: usize,
    /// Round a new record was inserted for, if generation ran.
    pub generated_round: Option<u32>,
    /// True when generation was skipped because the round already existed.
    pub duplicate_skip: bool,
    /// True when the generator ran without enough history and fell back
    /// to uniform sampling.
    pub uniform_fallback: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checked={} won={} lost={} skipped={} generated={} duplicate_skip={}",
            self.pending_checked,
            self.resolved_won,
            self.resolved_lost,
            self.skipped_unavailable,
            self.generated_round
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.duplicate_skip,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for LOTTO45.
#[derive(Debug, thiserror::Error)]
pub enum LottoError {
    #[error("Invalid number set: {0}")]
    InvalidNumberSet(String),

    #[error("Invalid draw: {0}")]
    InvalidDraw(String),

    #[error("A prediction for round {0} already exists")]
    DuplicateRound(u32),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
