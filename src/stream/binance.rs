//! Binance `@trade` stream payloads.

use crate::errors::{AppError, Result};
use serde::Deserialize;
use url::Url;

const BINANCE_WS_ENDPOINT: &str = "wss://stream.binance.com:9443/ws";

/// Trading pair streamed when nothing else is configured.
pub const DEFAULT_SYMBOL: &str = "btcusdt";

/// Raw `@trade` payload. Only `p` is required.
#[derive(Debug, Deserialize)]
struct TradeMsg {
    #[serde(rename = "p")]
    price: PriceField,
    #[serde(rename = "s", default)]
    symbol: Option<String>,
    #[serde(rename = "q", default)]
    quantity: Option<String>,
    #[serde(rename = "T", default)]
    trade_time: Option<i64>,
}

/// Binance sends decimals as strings; plain JSON numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceField {
    Text(String),
    Number(f64),
}

impl PriceField {
    fn value(&self) -> Result<f64> {
        let value = match self {
            PriceField::Text(s) => s.trim().parse::<f64>()?,
            PriceField::Number(n) => *n,
        };
        if !value.is_finite() {
            return Err(AppError::MalformedPayload(format!(
                "price is not finite: {value}"
            )));
        }
        Ok(value)
    }
}

/// A decoded trade with a validated price.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub price: f64,
    pub symbol: Option<String>,
    pub quantity: Option<String>,
    /// Exchange trade time, epoch millis.
    pub trade_time: Option<i64>,
}

/// Decode one text frame into a trade.
///
/// Any failure (invalid JSON, missing or non-numeric `p`) is reported as
/// [`AppError::MalformedPayload`].
pub fn parse_trade(raw: &str) -> Result<Trade> {
    let msg: TradeMsg =
        serde_json::from_str(raw).map_err(|e| AppError::MalformedPayload(e.to_string()))?;
    let price = msg.price.value().map_err(|e| match e {
        AppError::MalformedPayload(_) => e,
        other => AppError::MalformedPayload(other.to_string()),
    })?;
    Ok(Trade {
        price,
        symbol: msg.symbol,
        quantity: msg.quantity,
        trade_time: msg.trade_time,
    })
}

/// Trade stream URL for the given Binance symbol, e.g. "btcusdt".
pub fn trade_stream_url(symbol: &str) -> Result<Url> {
    let symbol = symbol.trim();
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Config(format!("invalid trading symbol: {symbol:?}")));
    }
    let stream_path = format!("{}@trade", symbol.to_lowercase());
    Ok(Url::parse(&format!("{}/{}", BINANCE_WS_ENDPOINT, stream_path))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_of(raw: &str) -> Result<f64> {
        parse_trade(raw).map(|t| t.price)
    }

    #[test]
    fn parses_string_price_from_trade_message() {
        let raw = r#"{
            "e": "trade", "E": 1672515782136, "s": "BTCUSDT", "t": 12345,
            "p": "50000.12", "q": "0.00100000", "T": 1672515782136, "m": true, "M": true
        }"#;
        let trade = parse_trade(raw).unwrap();
        assert_eq!(trade.price, 50000.12);
        assert_eq!(trade.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(trade.quantity.as_deref(), Some("0.00100000"));
        assert_eq!(trade.trade_time, Some(1672515782136));
    }

    #[test]
    fn accepts_numeric_price() {
        let trade = parse_trade(r#"{"p":50010.0}"#).unwrap();
        assert_eq!(trade.price, 50010.0);
        assert_eq!(trade.symbol, None);
    }

    #[test]
    fn zero_is_a_valid_price() {
        // Numeric zero is a price like any other, in either encoding.
        assert_eq!(price_of(r#"{"p":0}"#).unwrap(), 0.0);
        assert_eq!(price_of(r#"{"p":"0"}"#).unwrap(), 0.0);
        assert_eq!(price_of(r#"{"p":"0.00000000"}"#).unwrap(), 0.0);
    }

    #[test]
    fn rejects_payloads_without_numeric_price() {
        for raw in [
            r#"{"x":1}"#,
            r#"{"p":null}"#,
            r#"{"p":"abc"}"#,
            r#"{"p":""}"#,
            r#"{"p":"NaN"}"#,
            r#"{"p":"inf"}"#,
            r#"{"p":[1]}"#,
            r#"{"p":false}"#,
            "not json",
            "",
        ] {
            let err = price_of(raw).unwrap_err();
            assert!(
                matches!(err, AppError::MalformedPayload(_)),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn builds_trade_stream_url() {
        let url = trade_stream_url("BTCUSDT").unwrap();
        assert_eq!(url.as_str(), "wss://stream.binance.com:9443/ws/btcusdt@trade");
        assert!(trade_stream_url("").is_err());
        assert!(trade_stream_url("btc/usdt").is_err());
    }
}
