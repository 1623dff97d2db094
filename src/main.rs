//! LOTTO45 — Autonomous Lottery Recommendation Agent
//!
//! Entry point. Loads configuration, initialises structured logging,
//! then performs one reconcile→plan batch pass and exits. Scheduling
//! (cron) and at-most-one-active-run are external concerns.

use anyhow::Result;
use chrono::Utc;
use std::time::Duration;
use tracing::info;

use lotto45::analysis::{GeneratorConfig, RecommendationGenerator};
use lotto45::config;
use lotto45::engine::{Planner, Reconciler};
use lotto45::source::dhlottery::DhLotteryClient;
use lotto45::source::DrawSource;
use lotto45::storage::{JsonStore, PredictionStore};
use lotto45::types::RunReport;

const BANNER: &str = r#"
 _     ___ _____ _____ ___  _  _  ____
| |   / _ \_   _|_   _/ _ \| || || ___|
| |  | | | || |   | || | | | || ||___ \
| |__| |_| || |   | || |_| |__   _|__) |
|_____\___/ |_|   |_| \___/   |_||____/

  Frequency-biased 6/45 Recommendation Agent
  v0.1.0 — Batch Mode
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = config::AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        agent_name = %cfg.agent.name,
        history_window = cfg.agent.history_window,
        batch_size = cfg.generator.batch_size,
        store = %cfg.store.path,
        "LOTTO45 starting up"
    );

    // -- Initialise components -------------------------------------------

    let source = DhLotteryClient::new(
        &cfg.source.base_url,
        Duration::from_secs(cfg.source.min_interval_secs),
        cfg.source.max_attempts,
        Duration::from_secs(cfg.source.retry_delay_secs),
    )?;

    let store = JsonStore::new(&cfg.store.path);

    let mut generator = RecommendationGenerator::new(
        GeneratorConfig {
            batch_size: cfg.generator.batch_size,
            high_pool: cfg.generator.high_pool,
            low_pool: cfg.generator.low_pool,
            min_history: cfg.generator.min_history,
            max_attempts: cfg.generator.max_attempts,
            high_count_weights: cfg.generator.high_count_weights,
        },
        None,
    )?;

    // -- One batch pass ----------------------------------------------------

    let report = run_once(
        &source,
        &store,
        &mut generator,
        cfg.agent.history_window,
    )
    .await?;

    info!(
        pending_checked = report.pending_checked,
        won = report.resolved_won,
        lost = report.resolved_lost,
        skipped = report.skipped_unavailable,
        generated_round = report.generated_round,
        duplicate_skip = report.duplicate_skip,
        uniform_fallback = report.uniform_fallback,
        "Batch run complete"
    );

    Ok(())
}

/// Run a single reconcile→plan pass.
async fn run_once(
    source: &dyn DrawSource,
    store: &dyn PredictionStore,
    generator: &mut RecommendationGenerator,
    history_window: u32,
) -> Result<RunReport> {
    // 1. Settle whatever the provider has published since the last run.
    let reconcile = Reconciler::new(source, store).run().await?;

    // 2. Plan the next round.
    let plan = Planner::new(source, store, history_window)
        .run(generator, Utc::now())
        .await?;

    Ok(RunReport {
        pending_checked: reconcile.checked,
        resolved_won: reconcile.won,
        resolved_lost: reconcile.lost,
        skipped_unavailable: reconcile.skipped,
        generated_round: plan.generated_round,
        duplicate_skip: plan.duplicate_skip,
        uniform_fallback: plan.uniform_fallback,
    })
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lotto45=info"));

    let json_logging = std::env::var("LOTTO45_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
