//! Draw result sources.
//!
//! Defines the `DrawSource` trait and provides the adapter for the
//! official Dhlottery JSON endpoint.

pub mod dhlottery;

use async_trait::async_trait;

use crate::types::Draw;

/// Abstraction over official draw-result providers.
///
/// Absence is a first-class outcome, not an exceptional one:
/// implementors map every failure mode — network error, provider-side
/// block, malformed payload, round not yet drawn — to `None` and never
/// propagate errors across this boundary. Callers decide what to do
/// about a missing round (skip, or try an adjacent one).
#[async_trait]
pub trait DrawSource: Send + Sync {
    /// Fetch the official draw for a round, if it is available.
    async fn fetch_draw(&self, round: u32) -> Option<Draw>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}
