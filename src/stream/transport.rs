//! Transport seam between the stream client and the network.

use crate::errors::{AppError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Application-relevant frames. Pings, pongs and binary frames never surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Close,
}

/// An open streaming connection.
#[async_trait]
pub trait Connection: Send {
    /// Next frame, or `None` once the peer has gone away.
    /// Must be cancel-safe: the client races it against shutdown.
    async fn next_frame(&mut self) -> Option<Result<Frame>>;

    /// Deliberate close initiated by this side.
    async fn close(&mut self) -> Result<()>;
}

/// Opens connections to a streaming endpoint.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &Url) -> Result<Box<dyn Connection>>;
}

/// WebSocket connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &Url) -> Result<Box<dyn Connection>> {
        let (ws_stream, resp) = connect_async(url.as_str()).await?;
        debug!(status = %resp.status(), "[WS] handshake complete");
        Ok(Box::new(WsConnection { inner: ws_stream }))
    }
}

struct WsConnection {
    inner: WsStream,
}

#[async_trait]
impl Connection for WsConnection {
    async fn next_frame(&mut self) -> Option<Result<Frame>> {
        loop {
            match self.inner.next().await? {
                Ok(Message::Text(txt)) => return Some(Ok(Frame::Text(txt))),
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "[WS] close frame received");
                    return Some(Ok(Frame::Close));
                }
                // tungstenite answers pings on its own
                Ok(_) => continue,
                Err(e) => return Some(Err(AppError::from(e))),
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.close(None).await?;
        Ok(())
    }
}
