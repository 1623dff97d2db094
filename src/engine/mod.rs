//! Batch engine — reconciliation of pending predictions and planning
//! of the next round's record.

pub mod planner;
pub mod reconciler;

pub use planner::{PlanSummary, Planner};
pub use reconciler::{ReconcileSummary, Reconciler};
