use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::http_client::http_client;

pub const SLEEPER_BASE_URL: &str = "https://api.sleeper.app/v1";

const FETCH_ATTEMPTS: u32 = 4;
const RETRY_BASE_MS: u64 = 500;

/// Blocking client for the Sleeper v1 endpoints this tool reads.
///
/// Every call retries with linear backoff, then sleeps the courtesy pause so
/// sequential fetch loops self-throttle.
#[derive(Debug, Clone)]
pub struct SleeperApi {
    base: String,
    league_id: String,
    pause: Duration,
}

impl SleeperApi {
    pub fn new(league_id: impl Into<String>, pause_ms: u64) -> Self {
        Self {
            base: SLEEPER_BASE_URL.to_string(),
            league_id: league_id.into(),
            pause: Duration::from_millis(pause_ms),
        }
    }

    pub fn league_id(&self) -> &str {
        &self.league_id
    }

    pub fn nfl_state(&self) -> Result<Value> {
        self.get_json("/state/nfl")
    }

    pub fn league(&self) -> Result<Value> {
        self.get_json(&format!("/league/{}", self.league_id))
    }

    pub fn users(&self) -> Result<Value> {
        self.get_json(&format!("/league/{}/users", self.league_id))
    }

    pub fn rosters(&self) -> Result<Value> {
        self.get_json(&format!("/league/{}/rosters", self.league_id))
    }

    pub fn matchups(&self, week: u32) -> Result<Value> {
        self.get_json(&format!("/league/{}/matchups/{week}", self.league_id))
    }

    pub fn transactions(&self, week: u32) -> Result<Value> {
        self.get_json(&format!("/league/{}/transactions/{week}", self.league_id))
    }

    pub fn drafts(&self) -> Result<Value> {
        self.get_json(&format!("/league/{}/drafts", self.league_id))
    }

    pub fn draft_picks(&self, draft_id: &str) -> Result<Value> {
        self.get_json(&format!("/draft/{draft_id}/picks"))
    }

    pub fn draft_traded_picks(&self, draft_id: &str) -> Result<Value> {
        self.get_json(&format!("/draft/{draft_id}/traded_picks"))
    }

    pub fn traded_picks(&self) -> Result<Value> {
        self.get_json(&format!("/league/{}/traded_picks", self.league_id))
    }

    pub fn players_catalog(&self) -> Result<Value> {
        self.get_json("/players/nfl")
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{path}", self.base);
        let client = http_client()?;
        let mut last_err: Option<anyhow::Error> = None;
        for attempt in 1..=FETCH_ATTEMPTS {
            let fetched = client
                .get(&url)
                .send()
                .with_context(|| format!("request {url}"))
                .and_then(|res| {
                    res.error_for_status()
                        .with_context(|| format!("status for {url}"))
                })
                .and_then(|res| res.text().with_context(|| format!("read body {url}")))
                .and_then(|body| {
                    serde_json::from_str::<Value>(&body)
                        .with_context(|| format!("invalid json from {url}"))
                });
            match fetched {
                Ok(value) => {
                    if !self.pause.is_zero() {
                        thread::sleep(self.pause);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    last_err = Some(err);
                    if attempt < FETCH_ATTEMPTS {
                        let sleep_ms = RETRY_BASE_MS.saturating_mul(attempt as u64);
                        thread::sleep(Duration::from_millis(sleep_ms));
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow!("request failed for {url}")))
    }
}

/// Season and current week pulled out of `/state/nfl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NflState {
    pub season: String,
    pub week: u32,
}

pub fn parse_nfl_state(raw: &Value) -> NflState {
    let season = match raw.get("season") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "unknown".to_string(),
    };
    let week = raw
        .get("week")
        .and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })
        .map(|w| w.max(1))
        .unwrap_or(1) as u32;
    NflState { season, week }
}
