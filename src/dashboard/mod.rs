//! Dashboard state fed by the stream client.
//!
//! Keeps the bounded price window, the percent change between consecutive
//! ticks, and the connection/error indicators, and renders them as text.

pub mod history;
pub mod render;

pub use history::{DEFAULT_HISTORY_CAPACITY, PriceHistory};
pub use render::{change_badge, format_percent, format_time, format_usd, sparkline};

use crate::models::{ConnectionState, FeedEvent, PriceSample};
use tracing::debug;

/// Percent change from `previous` to `current`; `None` when `previous` is zero.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    current_price: Option<f64>,
    history: PriceHistory,
    price_change: f64,
    connection: ConnectionState,
    error: Option<String>,
}

impl Dashboard {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: PriceHistory::with_capacity(history_capacity),
            ..Self::default()
        }
    }

    /// Apply one feed event. Prices are stamped with the current time.
    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Price(price) => self.record(PriceSample::now(price)),
            FeedEvent::Error(error) => {
                if let Some(msg) = &error {
                    debug!(error = %msg, "[DASH] error banner set");
                }
                self.error = error;
            }
            FeedEvent::Connected(connected) => self.connection = connected.into(),
        }
    }

    /// Record a tick. The change is measured against the immediately
    /// preceding tick, not against whatever was last rendered.
    pub fn record(&mut self, sample: PriceSample) {
        if let Some(change) = self
            .history
            .last()
            .and_then(|prev| percent_change(prev.price, sample.price))
        {
            self.price_change = change;
        }
        self.current_price = Some(sample.price);
        self.history.push(sample);
    }

    pub fn current_price(&self) -> Option<f64> {
        self.current_price
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn price_change(&self) -> f64 {
        self.price_change
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render(&self) -> String {
        render::render(self)
    }
}
