//! Dhlottery (동행복권) official draw-result integration.
//!
//! Read-only JSON endpoint keyed by round number. The provider rate
//! limits aggressively and silently serves HTML error pages when it
//! blocks a client, so the adapter enforces a cooperative minimum
//! delay between calls and treats every malformed payload as absence.
//!
//! Endpoint: `{base}/common.do?method=getLottoNumber&drwNo={round}`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::DrawSource;
use crate::types::{Draw, NumberSet};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const SOURCE_NAME: &str = "dhlottery";

/// The provider inspects these; a bare client gets blocked quickly.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ---------------------------------------------------------------------------
// API response types (Dhlottery JSON → Rust)
// ---------------------------------------------------------------------------

/// Shape returned by `getLottoNumber`. We only deserialize the fields
/// we need; everything is defaulted because failure responses carry a
/// bare `returnValue` and nothing else.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LottoNumberResponse {
    /// "success" when the round has been drawn and published.
    #[serde(default)]
    return_value: String,
    #[serde(default)]
    drw_no: u32,
    #[serde(default)]
    drwt_no1: u8,
    #[serde(default)]
    drwt_no2: u8,
    #[serde(default)]
    drwt_no3: u8,
    #[serde(default)]
    drwt_no4: u8,
    #[serde(default)]
    drwt_no5: u8,
    #[serde(default)]
    drwt_no6: u8,
    #[serde(default)]
    bnus_no: u8,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Dhlottery draw-result client.
pub struct DhLotteryClient {
    http: Client,
    base_url: String,
    /// Cooperative politeness delay between successive calls.
    min_interval: Duration,
    /// Transport-level attempts per fetch before giving up.
    max_attempts: u32,
    /// Delay between transport-level attempts.
    retry_delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl DhLotteryClient {
    pub fn new(
        base_url: &str,
        min_interval: Duration,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for Dhlottery")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            min_interval,
            max_attempts: max_attempts.max(1),
            retry_delay,
            last_call: Mutex::new(None),
        })
    }

    // -- Internal helpers ------------------------------------------------

    /// Wait out the remainder of the politeness interval since the last
    /// call, then stamp this one.
    async fn throttle(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// One transport attempt. `Err` means the transport failed (worth
    /// retrying); `Ok(None)` means the provider answered but the round
    /// is unavailable or the payload was unusable (not worth retrying).
    async fn request(&self, round: u32) -> Result<Option<Draw>> {
        let url = format!(
            "{}/common.do?method=getLottoNumber&drwNo={round}",
            self.base_url
        );
        debug!(url = %url, "Fetching Dhlottery draw");

        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .context("Dhlottery request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Dhlottery returned status {}", resp.status());
        }

        let body = resp
            .text()
            .await
            .context("Failed to read Dhlottery response body")?;

        // Blocked clients receive an HTML page here; treat it exactly
        // like a round that has not been drawn.
        let payload: LottoNumberResponse = match serde_json::from_str(&body) {
            Ok(p) => p,
            Err(e) => {
                warn!(round, error = %e, "Non-JSON Dhlottery response (likely blocked)");
                return Ok(None);
            }
        };

        Ok(Self::to_draw(payload, round))
    }

    /// Convert a payload into a validated `Draw`. Any inconsistency
    /// (failure marker, wrong round, out-of-range numbers) maps to None.
    fn to_draw(payload: LottoNumberResponse, requested: u32) -> Option<Draw> {
        if payload.return_value != "success" {
            debug!(round = requested, "Round not yet drawn");
            return None;
        }
        if payload.drw_no != requested {
            warn!(
                requested,
                received = payload.drw_no,
                "Dhlottery answered for a different round"
            );
            return None;
        }

        let numbers = NumberSet::new([
            payload.drwt_no1,
            payload.drwt_no2,
            payload.drwt_no3,
            payload.drwt_no4,
            payload.drwt_no5,
            payload.drwt_no6,
        ]);
        let numbers = match numbers {
            Ok(n) => n,
            Err(e) => {
                warn!(round = requested, error = %e, "Invalid winning numbers in payload");
                return None;
            }
        };

        match Draw::new(payload.drw_no, numbers, payload.bnus_no) {
            Ok(draw) => Some(draw),
            Err(e) => {
                warn!(round = requested, error = %e, "Invalid draw in payload");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DrawSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl DrawSource for DhLotteryClient {
    /// Fetch one round, retrying transport failures up to the
    /// configured attempt limit. Provider-level absence is returned
    /// immediately without retry.
    async fn fetch_draw(&self, round: u32) -> Option<Draw> {
        for attempt in 1..=self.max_attempts {
            self.throttle().await;

            match self.request(round).await {
                Ok(outcome) => {
                    if let Some(draw) = &outcome {
                        debug!(round, draw = %draw, "Draw fetched");
                    }
                    return outcome;
                }
                Err(e) => {
                    warn!(round, attempt, error = %e, "Dhlottery fetch attempt failed");
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        warn!(round, "Dhlottery unreachable — treating round as unavailable");
        None
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
