//! Live check against the public Binance trade stream.
//!
//! Ignored by default because it needs network access. Run with:
//! ```bash
//! cargo test --test live_feed -- --ignored
//! ```

use std::time::Duration;

use btc_price_tracker::models::FeedEvent;
use btc_price_tracker::stream::{LinkState, StreamClient, StreamConfig};
use tokio::sync::mpsc;
use tokio::time::timeout;

const TEST_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::test]
#[ignore]
async fn receives_btcusdt_prices() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut client = StreamClient::new(StreamConfig::btcusdt().expect("default config"));
    client.start(tx);

    let first = timeout(TEST_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for Connected")
        .expect("event channel closed");
    assert_eq!(first, FeedEvent::Connected(true));
    assert_eq!(client.state(), LinkState::Open);

    let price = timeout(TEST_TIMEOUT, async {
        while let Some(ev) = rx.recv().await {
            if let FeedEvent::Price(p) = ev {
                return p;
            }
        }
        panic!("event channel closed before a price arrived");
    })
    .await
    .expect("timed out waiting for a price");
    assert!(price > 0.0);

    client.shutdown().await;
    assert_eq!(client.state(), LinkState::Closed);
}
