//! Reconciliation — settling pending predictions against published draws.
//!
//! For each pending record: fetch the official draw for its round, rank
//! every candidate set, derive the aggregate outcome, and persist the
//! whole resolution as one update. Unavailable rounds are skipped and
//! retried on a later run; resolved records are never touched again.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use crate::analysis::rank;
use crate::source::DrawSource;
use crate::storage::PredictionStore;
use crate::types::{Draw, PredictionRecord, Resolution, SetOutcome};

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileSummary {
    pub checked: usize,
    pub won: usize,
    pub lost: usize,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Settles pending prediction records against the draw source.
pub struct Reconciler<'a> {
    source: &'a dyn DrawSource,
    store: &'a dyn PredictionStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(source: &'a dyn DrawSource, store: &'a dyn PredictionStore) -> Self {
        Self { source, store }
    }

    /// Run one reconciliation pass over every pending record.
    pub async fn run(&self) -> Result<ReconcileSummary> {
        let pending = self.store.find_pending()?;
        info!(pending = pending.len(), "Reconciliation pass starting");

        let mut summary = ReconcileSummary::default();

        // The store already filters, but a record that slipped through
        // resolved must never be re-evaluated.
        for record in pending.iter().filter(|r| r.is_pending()) {
            summary.checked += 1;

            let Some(draw) = self.source.fetch_draw(record.round).await else {
                debug!(round = record.round, "Draw unavailable — leaving pending");
                summary.skipped += 1;
                continue;
            };

            let resolution = Self::settle(record, &draw);
            let won = resolution.best_tier.is_some();

            if self.store.resolve(record.round, resolution)? {
                if won {
                    summary.won += 1;
                } else {
                    summary.lost += 1;
                }
            }
        }

        info!(
            checked = summary.checked,
            won = summary.won,
            lost = summary.lost,
            skipped = summary.skipped,
            "Reconciliation pass complete"
        );
        Ok(summary)
    }

    /// Rank every candidate set against the draw and derive the
    /// aggregate outcome. Pure — the store applies the result.
    fn settle(record: &PredictionRecord, draw: &Draw) -> Resolution {
        let outcomes: Vec<SetOutcome> = record
            .sets
            .iter()
            .enumerate()
            .map(|(i, set)| {
                let tier = rank(set, draw);
                SetOutcome {
                    index: i + 1,
                    numbers: *set,
                    tier,
                    label: tier.label().to_string(),
                }
            })
            .collect();

        let best_tier = outcomes
            .iter()
            .map(|o| o.tier)
            .filter(|t| t.is_prize())
            .min();

        Resolution {
            draw: *draw,
            best_tier,
            outcomes,
            resolved_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
