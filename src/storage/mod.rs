//! Persistence layer.
//!
//! Defines the `PredictionStore` trait and a JSON-file implementation.
//! A database can be swapped in behind the trait later, but a flat
//! file is sufficient for the one-record-per-round prediction log.
//!
//! External requirement: the round-uniqueness and resolve-once checks
//! are serialized in-process only. At most one run may be active at a
//! time across processes — the scheduler enforces that, not this code.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::types::{LottoError, PredictionRecord, Resolution};

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Record store keyed by draw round.
///
/// Records are inserted pending and settled exactly once; they are
/// never deleted.
pub trait PredictionStore: Send + Sync {
    /// All records still awaiting their draw.
    fn find_pending(&self) -> Result<Vec<PredictionRecord>>;

    /// Whether any record (pending or resolved) exists for a round.
    fn exists_for_round(&self, round: u32) -> Result<bool>;

    /// Insert a new record. Fails with `LottoError::DuplicateRound`
    /// when the round is already present at write time.
    fn insert(&self, record: PredictionRecord) -> Result<()>;

    /// Apply a resolution to the pending record for `round` as a single
    /// update. Returns false (and changes nothing) when no pending
    /// record exists for that round — re-running against an already
    /// resolved record is a no-op.
    fn resolve(&self, round: u32, resolution: Resolution) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// File-backed store: the full record list as pretty-printed JSON.
pub struct JsonStore {
    path: PathBuf,
    /// Serializes check-then-write sequences within this process.
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<PredictionRecord>> {
        if !Path::new(&self.path).exists() {
            debug!(path = %self.path.display(), "No store file yet, starting empty");
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file {}", self.path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse store file {}", self.path.display()))
    }

    fn save(&self, records: &[PredictionRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)
            .context("Failed to serialise prediction records")?;

        std::fs::write(&self.path, &json)
            .with_context(|| format!("Failed to write store file {}", self.path.display()))?;

        debug!(
            path = %self.path.display(),
            records = records.len(),
            "Store saved"
        );
        Ok(())
    }
}

impl PredictionStore for JsonStore {
    fn find_pending(&self) -> Result<Vec<PredictionRecord>> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        let records = self.load()?;
        Ok(records.into_iter().filter(|r| r.is_pending()).collect())
    }

    fn exists_for_round(&self, round: u32) -> Result<bool> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        Ok(self.load()?.iter().any(|r| r.round == round))
    }

    fn insert(&self, record: PredictionRecord) -> Result<()> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        let mut records = self.load()?;

        if records.iter().any(|r| r.round == record.round) {
            return Err(LottoError::DuplicateRound(record.round).into());
        }

        info!(round = record.round, sets = record.sets.len(), "Record inserted");
        records.push(record);
        self.save(&records)
    }

    fn resolve(&self, round: u32, resolution: Resolution) -> Result<bool> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        let mut records = self.load()?;

        let Some(record) = records
            .iter_mut()
            .find(|r| r.round == round && r.is_pending())
        else {
            debug!(round, "No pending record to resolve — no-op");
            return Ok(false);
        };

        record.apply(resolution);
        info!(
            round,
            status = %record.status,
            best = record
                .best_tier
                .map(|t| t.label())
                .unwrap_or("-"),
            "Record resolved"
        );

        self.save(&records)?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
