//! Configuration loader and application settings.

use crate::dashboard::DEFAULT_HISTORY_CAPACITY;
use crate::errors::{AppError, Result};
use crate::stream::StreamConfig;
use crate::stream::binance::DEFAULT_SYMBOL;
use crate::stream::client::DEFAULT_RECONNECT_DELAY_MS;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_RENDER_INTERVAL_MS: u64 = 1000;

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Feed endpoint and reconnect delay.
    pub stream: StreamConfig,
    /// Samples kept for the chart.
    pub history_capacity: usize,
    /// How often the terminal panel is redrawn.
    pub render_interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// * `BTC_WS_URL` — full stream URL; overrides `BTC_SYMBOL`
    /// * `BTC_SYMBOL` — Binance symbol (default `btcusdt`)
    /// * `RECONNECT_DELAY_MS` — default 5000
    /// * `HISTORY_CAPACITY` — default 50
    /// * `RENDER_INTERVAL_MS` — default 1000
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let stream = match lookup("BTC_WS_URL").filter(|s| !s.trim().is_empty()) {
            Some(raw) => StreamConfig::new(Url::parse(raw.trim())?),
            None => {
                let symbol = lookup("BTC_SYMBOL").unwrap_or_else(|| DEFAULT_SYMBOL.into());
                StreamConfig::for_symbol(&symbol)?
            }
        };
        if !matches!(stream.url.scheme(), "ws" | "wss") {
            return Err(AppError::Config(format!(
                "BTC_WS_URL must be a ws:// or wss:// URL, got {}",
                stream.url
            )));
        }

        let reconnect_ms = parse_var(&lookup, "RECONNECT_DELAY_MS", DEFAULT_RECONNECT_DELAY_MS)?;
        let stream = stream.with_reconnect_delay(Duration::from_millis(reconnect_ms));

        let history_capacity = parse_var(&lookup, "HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?;
        if history_capacity == 0 {
            return Err(AppError::Config("HISTORY_CAPACITY must be at least 1".into()));
        }

        let render_ms = parse_var(&lookup, "RENDER_INTERVAL_MS", DEFAULT_RENDER_INTERVAL_MS)?;
        if render_ms == 0 {
            return Err(AppError::Config("RENDER_INTERVAL_MS must be positive".into()));
        }

        Ok(Self {
            stream,
            history_capacity,
            render_interval: Duration::from_millis(render_ms),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}
