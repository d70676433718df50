//! Live Bitcoin price dashboard.
//!
//! The [`stream`] module keeps a reconnecting subscription to the exchange
//! trade feed and reports prices, errors and connectivity to a handler. The
//! [`dashboard`] module turns those reports into a bounded price history,
//! tick-to-tick percent change and a text panel.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod stream;
pub mod utils;
