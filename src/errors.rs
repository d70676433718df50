use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Message surfaced to the feed handler when a payload cannot be decoded.
pub const MALFORMED_PAYLOAD_MSG: &str = "Error processing price data";

/// Message surfaced to the feed handler on connection-level failures.
pub const CONNECTION_ERROR_MSG: &str = "Connection error. Please check your internet connection.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Other: {0}")]
    Other(String),
}
