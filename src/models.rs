//! Shared data structures used throughout the application.

use serde::Serialize;
use std::fmt;

/// One observed price, stamped with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSample {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub price: f64,
}

impl PriceSample {
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Sample stamped with the current wall-clock time.
    pub fn now(price: f64) -> Self {
        Self::new(chrono::Utc::now().timestamp_millis(), price)
    }
}

/// Boolean connectivity of the feed, as shown in the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl From<bool> for ConnectionState {
    fn from(connected: bool) -> Self {
        if connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connected => f.write_str("Connected"),
            ConnectionState::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// A single callback invocation from the feed, reified so it can cross a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Price(f64),
    /// `None` clears the current error.
    Error(Option<String>),
    Connected(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_state_from_bool() {
        assert_eq!(ConnectionState::from(true), ConnectionState::Connected);
        assert_eq!(ConnectionState::from(false), ConnectionState::Disconnected);
        assert!(!ConnectionState::default().is_connected());
        assert_eq!(ConnectionState::Connected.to_string(), "Connected");
    }
}
