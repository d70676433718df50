//! Live trade feed.
//!
//! Responsibilities:
//! • Maintain a single connection to the exchange trade stream.
//! • Decode trade messages and forward prices to a [`FeedHandler`].
//! • Report connectivity and errors, and reconnect after every close.

pub mod binance;
pub mod client;
pub mod transport;

pub use client::{LinkState, StreamClient, StreamConfig};
pub use transport::{Connection, Connector, Frame, WsConnector};

use crate::models::FeedEvent;
use tokio::sync::mpsc;

/// Receiver of everything the stream client reports.
///
/// Callbacks run on the client's task, in the order the transport delivered
/// the underlying frames. Keep them short.
pub trait FeedHandler: Send + Sync + 'static {
    fn on_price(&self, price: f64);
    /// `None` clears any previously reported error.
    fn on_error(&self, message: Option<&str>);
    fn on_connected(&self, connected: bool);
}

/// Adapts three closures to [`FeedHandler`].
pub struct Callbacks<P, E, C> {
    on_price: P,
    on_error: E,
    on_connected: C,
}

impl<P, E, C> Callbacks<P, E, C>
where
    P: Fn(f64) + Send + Sync + 'static,
    E: Fn(Option<&str>) + Send + Sync + 'static,
    C: Fn(bool) + Send + Sync + 'static,
{
    pub fn new(on_price: P, on_error: E, on_connected: C) -> Self {
        Self {
            on_price,
            on_error,
            on_connected,
        }
    }
}

impl<P, E, C> FeedHandler for Callbacks<P, E, C>
where
    P: Fn(f64) + Send + Sync + 'static,
    E: Fn(Option<&str>) + Send + Sync + 'static,
    C: Fn(bool) + Send + Sync + 'static,
{
    fn on_price(&self, price: f64) {
        (self.on_price)(price)
    }

    fn on_error(&self, message: Option<&str>) {
        (self.on_error)(message)
    }

    fn on_connected(&self, connected: bool) {
        (self.on_connected)(connected)
    }
}

/// Forwards callbacks as [`FeedEvent`]s. A closed receiver is ignored.
impl FeedHandler for mpsc::UnboundedSender<FeedEvent> {
    fn on_price(&self, price: f64) {
        let _ = self.send(FeedEvent::Price(price));
    }

    fn on_error(&self, message: Option<&str>) {
        let _ = self.send(FeedEvent::Error(message.map(str::to_owned)));
    }

    fn on_connected(&self, connected: bool) {
        let _ = self.send(FeedEvent::Connected(connected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn callbacks_dispatch_to_closures() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (p, e, c) = (seen.clone(), seen.clone(), seen.clone());
        let handler = Callbacks::new(
            move |price| p.lock().unwrap().push(FeedEvent::Price(price)),
            move |msg: Option<&str>| e.lock().unwrap().push(FeedEvent::Error(msg.map(Into::into))),
            move |up| c.lock().unwrap().push(FeedEvent::Connected(up)),
        );

        handler.on_connected(true);
        handler.on_error(None);
        handler.on_price(1.5);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                FeedEvent::Connected(true),
                FeedEvent::Error(None),
                FeedEvent::Price(1.5)
            ]
        );
    }

    #[test]
    fn channel_handler_survives_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.on_error(Some("boom"));
        drop(rx);
        tx.on_price(2.0);
    }
}
