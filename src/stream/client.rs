//! Reconnecting stream client.

use super::FeedHandler;
use super::binance::{self, DEFAULT_SYMBOL};
use super::transport::{Connection, Connector, Frame, WsConnector};
use crate::errors::{CONNECTION_ERROR_MSG, MALFORMED_PAYLOAD_MSG, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use url::Url;

pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5000;

/// Delay between a close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS);

const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Where to connect and how long to wait before reconnecting.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    pub url: Url,
    pub reconnect_delay: Duration,
}

impl StreamConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    /// Binance trade stream for `symbol`, e.g. "btcusdt".
    pub fn for_symbol(symbol: &str) -> Result<Self> {
        Ok(Self::new(binance::trade_stream_url(symbol)?))
    }

    /// The BTC/USDT trade stream.
    pub fn btcusdt() -> Result<Self> {
        Self::for_symbol(DEFAULT_SYMBOL)
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

/// Lifecycle of the underlying connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    Connecting,
    Open,
    Closed,
}

/// Keeps one live subscription to a trade stream and reconnects after every
/// close, with a fixed delay and no retry limit, until [`stop`](Self::stop).
pub struct StreamClient<C: Connector = WsConnector> {
    config: StreamConfig,
    connector: Arc<C>,
    /// State of the most recently started session.
    link: watch::Receiver<LinkState>,
    shutdown_tx: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl StreamClient<WsConnector> {
    pub fn new(config: StreamConfig) -> Self {
        Self::with_connector(config, WsConnector)
    }
}

impl<C: Connector> StreamClient<C> {
    pub fn with_connector(config: StreamConfig, connector: C) -> Self {
        let (_, link) = watch::channel(LinkState::Idle);
        Self {
            config,
            connector: Arc::new(connector),
            link,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Start the connection task. Must be called inside a tokio runtime.
    ///
    /// A client that is already running ignores the call. After a stop, the
    /// new session does not connect until the previous one has finished
    /// closing.
    pub fn start<H: FeedHandler>(&mut self, handler: H) {
        if self.shutdown_tx.is_some() {
            debug!("[WS] start ignored, client already running");
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.shutdown_tx = Some(shutdown_tx);
        let (link, link_rx) = watch::channel(LinkState::Connecting);
        self.link = link_rx;

        let session = Session {
            url: self.config.url.clone(),
            reconnect_delay: self.config.reconnect_delay,
            connector: Arc::clone(&self.connector),
            handler,
            link,
            shutdown: shutdown_rx,
            previous: self.task.take().filter(|task| !task.is_finished()),
        };
        self.task = Some(tokio::spawn(session.run()));
    }

    /// Tear the connection down and cancel any pending reconnect.
    ///
    /// No close callback fires for a deliberate stop. Safe in any state and
    /// idempotent.
    pub fn stop(&mut self) {
        let Some(shutdown_tx) = self.shutdown_tx.take() else {
            return;
        };
        let _ = shutdown_tx.send(true);
        info!("[WS] stop requested");
    }

    /// [`stop`](Self::stop), then wait for the connection task to finish.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "[WS] connection task ended abnormally");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    pub fn state(&self) -> LinkState {
        *self.link.borrow()
    }
}

impl<C: Connector> Drop for StreamClient<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// How a connection's read loop ended.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Closed,
    Stopped,
}

/// State owned by the background task.
struct Session<C, H> {
    url: Url,
    reconnect_delay: Duration,
    connector: Arc<C>,
    handler: H,
    link: watch::Sender<LinkState>,
    shutdown: watch::Receiver<bool>,
    /// Task of a stopped session that may still be closing its connection.
    previous: Option<JoinHandle<()>>,
}

impl<C: Connector, H: FeedHandler> Session<C, H> {
    async fn run(mut self) {
        if let Some(previous) = self.previous.take() {
            debug!("[WS] waiting for previous session to close");
            tokio::select! {
                biased;
                _ = shutdown_requested(&mut self.shutdown) => {
                    self.link.send_replace(LinkState::Closed);
                    return;
                }
                _ = previous => {}
            }
        }

        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            self.link.send_replace(LinkState::Connecting);
            info!(url = %self.url, attempt, "[WS] connecting");

            let connected = tokio::select! {
                biased;
                _ = shutdown_requested(&mut self.shutdown) => break,
                res = self.connector.connect(&self.url) => res,
            };

            match connected {
                Ok(mut conn) => {
                    self.link.send_replace(LinkState::Open);
                    info!("[WS] connection open");
                    self.handler.on_connected(true);
                    self.handler.on_error(None);

                    if self.pump(conn.as_mut()).await == Outcome::Stopped {
                        match tokio::time::timeout(CLOSE_TIMEOUT, conn.close()).await {
                            Ok(Ok(())) => debug!("[WS] connection closed on stop"),
                            Ok(Err(e)) => debug!(error = %e, "[WS] close on stop failed"),
                            Err(_) => debug!("[WS] close on stop timed out"),
                        }
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "[WS] connect failed");
                    self.transport_error();
                }
            }

            self.link.send_replace(LinkState::Closed);
            self.handler.on_connected(false);
            info!(
                delay = ?self.reconnect_delay,
                "[WS] connection closed, reconnect scheduled"
            );

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut self.shutdown) => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
        self.link.send_replace(LinkState::Closed);
        debug!("[WS] connection task finished");
    }

    /// Read frames until the connection closes or a stop is requested.
    async fn pump(&mut self, conn: &mut dyn Connection) -> Outcome {
        loop {
            let frame = tokio::select! {
                biased;
                _ = shutdown_requested(&mut self.shutdown) => return Outcome::Stopped,
                frame = conn.next_frame() => frame,
            };

            match frame {
                Some(Ok(Frame::Text(txt))) => match binance::parse_trade(&txt) {
                    Ok(trade) => {
                        trace!(
                            price = trade.price,
                            symbol = ?trade.symbol,
                            quantity = ?trade.quantity,
                            trade_time = ?trade.trade_time,
                            "[WS] trade"
                        );
                        self.handler.on_price(trade.price);
                    }
                    Err(e) => {
                        warn!(error = %e, "[WS] price payload rejected");
                        self.handler.on_error(Some(MALFORMED_PAYLOAD_MSG));
                    }
                },
                Some(Ok(Frame::Close)) | None => return Outcome::Closed,
                Some(Err(e)) => {
                    warn!(error = %e, "[WS] websocket read error");
                    self.transport_error();
                    return Outcome::Closed;
                }
            }
        }
    }

    fn transport_error(&self) {
        self.handler.on_error(Some(CONNECTION_ERROR_MSG));
        self.handler.on_connected(false);
    }
}

/// Resolves once a stop was requested or the owning client is gone.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
