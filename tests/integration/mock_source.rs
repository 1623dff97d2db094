//! Mock draw source for integration testing.
//!
//! Deterministic `DrawSource` implementation backed by an in-memory
//! round→draw map. Availability is fully controllable from test code,
//! and every fetch is logged so tests can assert on call patterns.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use lotto45::source::DrawSource;
use lotto45::types::{Draw, NumberSet};

pub struct MockDrawSource {
    draws: HashMap<u32, Draw>,
    /// When set, every fetch returns None regardless of the map.
    offline: Mutex<bool>,
    fetch_log: Mutex<Vec<u32>>,
}

impl MockDrawSource {
    pub fn new(draws: Vec<Draw>) -> Self {
        Self {
            draws: draws.into_iter().map(|d| (d.round, d)).collect(),
            offline: Mutex::new(false),
            fetch_log: Mutex::new(Vec::new()),
        }
    }

    /// A source that knows no rounds at all.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Force every subsequent fetch to come back empty.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// Rounds fetched so far, in order.
    pub fn fetched_rounds(&self) -> Vec<u32> {
        self.fetch_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl DrawSource for MockDrawSource {
    async fn fetch_draw(&self, round: u32) -> Option<Draw> {
        self.fetch_log.lock().unwrap().push(round);
        if *self.offline.lock().unwrap() {
            return None;
        }
        self.draws.get(&round).copied()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Shorthand draw constructor for tests.
pub fn draw(round: u32, numbers: [u8; 6], bonus: u8) -> Draw {
    Draw::new(round, NumberSet::new(numbers).unwrap(), bonus).unwrap()
}
