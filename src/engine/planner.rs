//! Next-round planning — calendar round derivation, history gathering,
//! and insertion of one new prediction record.
//!
//! The current round is derived from the first-draw epoch (round 1 drew
//! 2002-12-07 20:45 KST, weekly thereafter). Recent history is gathered
//! by walking backward through the source over a configurable window;
//! whatever the provider cannot supply is simply missing from the
//! window, and a too-thin window degrades to uniform generation inside
//! the generator rather than blocking the run.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use tracing::{info, warn};

use crate::analysis::RecommendationGenerator;
use crate::source::DrawSource;
use crate::storage::PredictionStore;
use crate::types::{Draw, LottoError, NumberSet, PredictionRecord};

// ---------------------------------------------------------------------------
// Round calendar
// ---------------------------------------------------------------------------

/// First draw: 2002-12-07 20:45 KST (11:45 UTC). Rounds advance weekly.
fn first_draw_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2002, 12, 7, 11, 45, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The round whose weekly window `now` falls in (clamped to 1 for
/// instants before the epoch).
pub fn round_for(now: DateTime<Utc>) -> u32 {
    let elapsed = now.signed_duration_since(first_draw_instant());
    if elapsed < chrono::Duration::zero() {
        return 1;
    }
    (elapsed.num_days() / 7 + 1) as u32
}

/// The next Saturday on or after `today` — the date the planned round
/// will draw.
pub fn next_saturday(today: NaiveDate) -> NaiveDate {
    let days_ahead = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
    today + chrono::Duration::days(days_ahead as i64)
}

/// Deterministic commentary attached to a new record. Cosmetic only.
fn annotate(primary: &NumberSet) -> String {
    format!(
        "Frequency analysis favours this combination (sum {}) for the coming draw.",
        primary.sum()
    )
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Outcome of one planning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanSummary {
    /// Round a new record was inserted for, if one was.
    pub generated_round: Option<u32>,
    /// True when the target round already had a record.
    pub duplicate_skip: bool,
    /// True when generation ran on the uniform fallback path.
    pub uniform_fallback: bool,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Builds and stores the prediction record for the next round.
pub struct Planner<'a> {
    source: &'a dyn DrawSource,
    store: &'a dyn PredictionStore,
    /// How many rounds to walk backward for frequency history.
    history_window: u32,
}

impl<'a> Planner<'a> {
    pub fn new(
        source: &'a dyn DrawSource,
        store: &'a dyn PredictionStore,
        history_window: u32,
    ) -> Self {
        Self {
            source,
            store,
            history_window: history_window.max(1),
        }
    }

    /// Run one planning pass: gather history, generate a batch, insert
    /// a pending record for `round_for(now) + 1` unless it exists.
    pub async fn run(
        &self,
        generator: &mut RecommendationGenerator,
        now: DateTime<Utc>,
    ) -> Result<PlanSummary> {
        let current = round_for(now);
        let next_round = current + 1;

        // Checked again at insert time; this early exit just saves the
        // provider round-trips for an already-planned week.
        if self.store.exists_for_round(next_round)? {
            info!(round = next_round, "Prediction already exists — skipping generation");
            return Ok(PlanSummary {
                duplicate_skip: true,
                ..PlanSummary::default()
            });
        }

        let history = self.gather_history(current).await;
        let batch = generator.generate(&history)?;

        let comment = batch.sets.first().map(annotate).unwrap_or_default();
        let record = PredictionRecord::new_pending(
            next_round,
            batch.sets,
            comment,
            next_saturday(now.date_naive()),
        );

        match self.store.insert(record) {
            Ok(()) => {
                info!(round = next_round, "New prediction record planned");
                Ok(PlanSummary {
                    generated_round: Some(next_round),
                    duplicate_skip: false,
                    uniform_fallback: batch.uniform_fallback,
                })
            }
            Err(e) => match e.downcast_ref::<LottoError>() {
                // Lost the race to another writer — a skip, not a failure.
                Some(LottoError::DuplicateRound(r)) => {
                    warn!(round = *r, "Round planned concurrently — skipping");
                    Ok(PlanSummary {
                        duplicate_skip: true,
                        uniform_fallback: batch.uniform_fallback,
                        ..PlanSummary::default()
                    })
                }
                _ => Err(e),
            },
        }
    }

    /// Walk backward from `current` collecting whatever draws the
    /// source can supply, most recent first. Absences shrink the
    /// window silently.
    async fn gather_history(&self, current: u32) -> Vec<Draw> {
        let mut history = Vec::new();
        let oldest = current.saturating_sub(self.history_window - 1).max(1);

        for round in (oldest..=current).rev() {
            if let Some(draw) = self.source.fetch_draw(round).await {
                history.push(draw);
            }
        }

        info!(
            current,
            window = self.history_window,
            collected = history.len(),
            "History gathered"
        );
        history
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
