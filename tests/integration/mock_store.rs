//! Mock prediction store for integration testing.
//!
//! In-memory `PredictionStore` with the same conditional-write
//! semantics as the real adapter: round-unique inserts and
//! resolve-once updates.

use anyhow::Result;
use std::sync::Mutex;

use lotto45::storage::PredictionStore;
use lotto45::types::{LottoError, PredictionRecord, Resolution};

#[derive(Default)]
pub struct MockStore {
    records: Mutex<Vec<PredictionRecord>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record, resolved ones included.
    pub fn all_records(&self) -> Vec<PredictionRecord> {
        self.records.lock().unwrap().clone()
    }

    /// The record for a round, if present.
    pub fn record_for(&self, round: u32) -> Option<PredictionRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.round == round)
            .cloned()
    }
}

impl PredictionStore for MockStore {
    fn find_pending(&self) -> Result<Vec<PredictionRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_pending())
            .cloned()
            .collect())
    }

    fn exists_for_round(&self, round: u32) -> Result<bool> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.round == round))
    }

    fn insert(&self, record: PredictionRecord) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.round == record.round) {
            return Err(LottoError::DuplicateRound(record.round).into());
        }
        records.push(record);
        Ok(())
    }

    fn resolve(&self, round: u32, resolution: Resolution) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records
            .iter_mut()
            .find(|r| r.round == round && r.is_pending())
        else {
            return Ok(false);
        };
        record.apply(resolution);
        Ok(true)
    }
}
