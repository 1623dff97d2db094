//! End-to-end batch simulation.
//!
//! Drives the reconcile→plan pipeline against the in-memory mocks:
//! settlement of wins and losses, skip-and-retry for unavailable
//! rounds, idempotent re-runs, round-unique generation, and the
//! uniform fallback when the provider is dark.

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};

use lotto45::analysis::{filters, GeneratorConfig, RecommendationGenerator};
use lotto45::engine::{Planner, Reconciler};
use lotto45::storage::PredictionStore;
use lotto45::types::{NumberSet, PredictionRecord, PredictionStatus, PrizeTier};

use crate::mock_source::{draw, MockDrawSource};
use crate::mock_store::MockStore;

fn set(numbers: [u8; 6]) -> NumberSet {
    NumberSet::new(numbers).unwrap()
}

fn pending_record(round: u32, sets: Vec<NumberSet>) -> PredictionRecord {
    PredictionRecord::new_pending(
        round,
        sets,
        "simulated".to_string(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
    )
}

fn generator(seed: u64) -> RecommendationGenerator {
    RecommendationGenerator::new(GeneratorConfig::default(), Some(seed)).unwrap()
}

/// 2024-01-06 13:00 UTC — round 1101's draw day.
fn saturday_1101() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 6, 13, 0, 0).single().unwrap()
}

fn recent_history() -> Vec<lotto45::types::Draw> {
    vec![
        draw(1099, [1, 9, 17, 25, 33, 41], 5),
        draw(1100, [2, 10, 18, 26, 34, 42], 6),
        draw(1101, [3, 11, 19, 27, 35, 43], 7),
    ]
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_reconcile_settles_wins_and_losses() {
    let source = MockDrawSource::new(vec![
        draw(100, [1, 2, 3, 4, 5, 6], 7),
        draw(101, [40, 41, 42, 43, 44, 45], 39),
    ]);
    let store = MockStore::new();

    // Round 100: one fourth-prize set among misses. Round 101: all misses.
    store
        .insert(pending_record(
            100,
            vec![set([1, 2, 3, 4, 10, 11]), set([20, 21, 22, 23, 24, 25])],
        ))
        .unwrap();
    store
        .insert(pending_record(101, vec![set([1, 2, 3, 4, 5, 6])]))
        .unwrap();

    let summary = Reconciler::new(&source, &store).run().await.unwrap();
    assert_eq!(summary.checked, 2);
    assert_eq!(summary.won, 1);
    assert_eq!(summary.lost, 1);
    assert_eq!(summary.skipped, 0);

    let won = store.record_for(100).unwrap();
    assert_eq!(won.status, PredictionStatus::Won);
    assert_eq!(won.best_tier, Some(PrizeTier::Fourth));
    assert_eq!(won.winning_draw.unwrap().round, 100);
    let outcomes = won.set_outcomes.unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].tier, PrizeTier::Fourth);
    assert_eq!(outcomes[1].tier, PrizeTier::Miss);

    let lost = store.record_for(101).unwrap();
    assert_eq!(lost.status, PredictionStatus::Lost);
    assert!(lost.best_tier.is_none());
    assert!(lost.resolved_at.is_some());
}

#[tokio::test]
async fn test_reconcile_skips_unavailable_then_retries_later() {
    let source = MockDrawSource::new(vec![draw(100, [1, 2, 3, 4, 5, 6], 7)]);
    let store = MockStore::new();
    store
        .insert(pending_record(100, vec![set([10, 11, 12, 13, 14, 15])]))
        .unwrap();

    source.set_offline(true);
    let summary = Reconciler::new(&source, &store).run().await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.won + summary.lost, 0);
    assert!(store.record_for(100).unwrap().is_pending());

    // Provider comes back: the same record settles on the next run.
    source.set_offline(false);
    let summary = Reconciler::new(&source, &store).run().await.unwrap();
    assert_eq!(summary.lost, 1);
    assert_eq!(
        store.record_for(100).unwrap().status,
        PredictionStatus::Lost
    );
}

#[tokio::test]
async fn test_reconcile_rerun_is_idempotent() {
    let source = MockDrawSource::new(vec![draw(100, [1, 2, 3, 4, 5, 6], 7)]);
    let store = MockStore::new();
    store
        .insert(pending_record(100, vec![set([1, 2, 3, 10, 11, 12])]))
        .unwrap();

    Reconciler::new(&source, &store).run().await.unwrap();
    let first = store.record_for(100).unwrap();

    let summary = Reconciler::new(&source, &store).run().await.unwrap();
    assert_eq!(summary.checked, 0);

    let second = store.record_for(100).unwrap();
    assert_eq!(second.status, first.status);
    assert_eq!(second.best_tier, first.best_tier);
    assert_eq!(second.resolved_at, first.resolved_at);
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_planner_inserts_next_round_record() {
    let source = MockDrawSource::new(recent_history());
    let store = MockStore::new();
    let mut generator = generator(42);

    let summary = Planner::new(&source, &store, 3)
        .run(&mut generator, saturday_1101())
        .await
        .unwrap();

    assert_eq!(summary.generated_round, Some(1102));
    assert!(!summary.duplicate_skip);
    assert!(!summary.uniform_fallback);

    // History walked backward from the current round.
    assert_eq!(source.fetched_rounds(), vec![1101, 1100, 1099]);

    let record = store.record_for(1102).unwrap();
    assert!(record.is_pending());
    assert_eq!(record.sets.len(), 5);
    assert!(!record.comment.is_empty());
    assert_eq!(record.draw_date.weekday(), Weekday::Sat);
    for s in &record.sets {
        assert!(filters::has_high_number_quota(s));
        assert!(!filters::has_line_pattern(s));
    }
}

#[tokio::test]
async fn test_planner_skips_existing_round() {
    let source = MockDrawSource::new(recent_history());
    let store = MockStore::new();
    let mut generator = generator(42);
    let planner = Planner::new(&source, &store, 3);

    let first = planner
        .run(&mut generator, saturday_1101())
        .await
        .unwrap();
    assert_eq!(first.generated_round, Some(1102));

    let second = planner
        .run(&mut generator, saturday_1101())
        .await
        .unwrap();
    assert!(second.duplicate_skip);
    assert!(second.generated_round.is_none());

    // Round uniqueness: exactly one stored record for 1102.
    let count = store
        .all_records()
        .iter()
        .filter(|r| r.round == 1102)
        .count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_planner_uniform_fallback_when_provider_dark() {
    let source = MockDrawSource::empty();
    let store = MockStore::new();
    let mut generator = generator(7);

    let summary = Planner::new(&source, &store, 3)
        .run(&mut generator, saturday_1101())
        .await
        .unwrap();

    // Source unavailability must never block generation.
    assert_eq!(summary.generated_round, Some(1102));
    assert!(summary.uniform_fallback);

    let record = store.record_for(1102).unwrap();
    assert_eq!(record.sets.len(), 5);
    for i in 0..record.sets.len() {
        for j in (i + 1)..record.sets.len() {
            assert_ne!(record.sets[i], record.sets[j]);
        }
    }
}

// ---------------------------------------------------------------------------
// Full batch cycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_full_cycle_plan_then_settle_then_plan() {
    // Week 1: plan round 1101 on the evening of round 1100.
    let week1 = Utc.with_ymd_and_hms(2023, 12, 30, 13, 0, 0).single().unwrap();
    let source = MockDrawSource::new(vec![
        draw(1098, [4, 12, 20, 28, 36, 44], 1),
        draw(1099, [1, 9, 17, 25, 33, 41], 5),
        draw(1100, [2, 10, 18, 26, 34, 42], 6),
    ]);
    let store = MockStore::new();
    let mut generator = generator(99);
    let planner = Planner::new(&source, &store, 3);

    let plan = planner.run(&mut generator, week1).await.unwrap();
    assert_eq!(plan.generated_round, Some(1101));

    // Draw night: 1101 publishes, and the next run settles it.
    let source = MockDrawSource::new(vec![
        draw(1099, [1, 9, 17, 25, 33, 41], 5),
        draw(1100, [2, 10, 18, 26, 34, 42], 6),
        draw(1101, [3, 11, 19, 27, 35, 43], 7),
    ]);
    let summary = Reconciler::new(&source, &store).run().await.unwrap();
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.won + summary.lost, 1);
    assert!(!store.record_for(1101).unwrap().is_pending());

    // Week 2: planning continues with the settled record untouched.
    let planner = Planner::new(&source, &store, 3);
    let plan = planner.run(&mut generator, saturday_1101()).await.unwrap();
    assert_eq!(plan.generated_round, Some(1102));
    assert_eq!(store.all_records().len(), 2);
}
