//! Text rendering of the dashboard panel.

use super::Dashboard;
use chrono::{Local, TimeZone};
use std::fmt::Write;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// US-dollar amount with thousands separators and two decimals, e.g. `$50,000.12`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "---".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Signed percentage with two decimals, e.g. `-0.25%`.
pub fn format_percent(change: f64) -> String {
    format!("{change:.2}%")
}

/// Arrow plus magnitude, e.g. `↑ 0.02%`. Nothing to show for a zero change.
pub fn change_badge(change: f64) -> Option<String> {
    if change == 0.0 || !change.is_finite() {
        return None;
    }
    let arrow = if change >= 0.0 { '↑' } else { '↓' };
    Some(format!("{arrow} {:.2}%", change.abs()))
}

/// Local wall-clock time of an epoch-millis timestamp, `HH:MM:SS`.
pub fn format_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// One block character per price, scaled between `lo` and `hi`.
pub fn sparkline(prices: impl IntoIterator<Item = f64>, lo: f64, hi: f64) -> String {
    let span = hi - lo;
    prices
        .into_iter()
        .map(|p| {
            if span <= 0.0 || !span.is_finite() {
                return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
            }
            let top = (SPARK_LEVELS.len() - 1) as f64;
            let idx = (((p - lo) / span) * top).round().clamp(0.0, top) as usize;
            SPARK_LEVELS[idx]
        })
        .collect()
}

pub(super) fn render(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let status = if dashboard.connection().is_connected() {
        "[●]"
    } else {
        "[○]"
    };

    let _ = writeln!(out, "Bitcoin Price Tracker    {status} {}", dashboard.connection());
    if let Some(error) = dashboard.error() {
        let _ = writeln!(out, "! {error}");
    }
    out.push('\n');

    let price = dashboard
        .current_price()
        .map(format_usd)
        .unwrap_or_else(|| "---".to_string());
    let _ = writeln!(out, "Current Price");
    match change_badge(dashboard.price_change()) {
        Some(badge) => {
            let _ = writeln!(out, "  {price}  {badge}");
        }
        None => {
            let _ = writeln!(out, "  {price}");
        }
    }
    out.push('\n');

    let _ = writeln!(out, "Statistics");
    let _ = writeln!(out, "  Samples       {}", dashboard.history().len());
    let _ = writeln!(
        out,
        "  Price Change  {}",
        format_percent(dashboard.price_change())
    );
    out.push('\n');

    let _ = writeln!(out, "Price History");
    let history = dashboard.history();
    match (history.range(), history.first(), history.last()) {
        (Some((lo, hi)), Some(first), Some(last)) => {
            let line = sparkline(history.iter().map(|s| s.price), lo, hi);
            let _ = writeln!(out, "  high {}", format_usd(hi));
            let _ = writeln!(out, "  {line}");
            let _ = writeln!(out, "  low  {}", format_usd(lo));
            let _ = writeln!(
                out,
                "  {} → {}",
                format_time(first.timestamp),
                format_time(last.timestamp)
            );
        }
        _ => {
            let _ = writeln!(out, "  waiting for price data...");
        }
    }

    out
}
