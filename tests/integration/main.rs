//! Integration test harness.

mod mock_source;
mod mock_store;
mod simulation;
