use anyhow::Result;
use btc_price_tracker::{
    config::AppConfig,
    dashboard::Dashboard,
    models::FeedEvent,
    stream::StreamClient,
    utils,
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::from_env()?;
    tracing::info!(
        url = %config.stream.url,
        reconnect_delay = ?config.stream.reconnect_delay,
        history_capacity = config.history_capacity,
        "[INIT] btc-price-tracker starting"
    );

    // Feed -> dashboard channel
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<FeedEvent>();
    let mut client = StreamClient::new(config.stream.clone());
    client.start(event_tx);

    let mut dashboard = Dashboard::new(config.history_capacity);
    let mut stdout = std::io::stdout();
    let mut ticker = tokio::time::interval(config.render_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "[INIT] ctrl-c handler failed");
                }
                tracing::info!("[INIT] shutdown requested");
                break;
            }
            Some(event) = event_rx.recv() => dashboard.apply(event),
            _ = ticker.tick() => utils::redraw(&mut stdout, &dashboard.render())?,
        }
    }

    client.shutdown().await;
    Ok(())
}
