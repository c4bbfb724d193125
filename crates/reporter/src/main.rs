//! blendprice - volume-weighted crypto reference prices
//!
//! Fetches every configured asset from every configured exchange once and prints
//! the snapshot as JSON on stdout.

use std::sync::Arc;

use tracing::{error, info};

use blend_core::{LogFormat, PriceFeedConfig};
use blend_price_feed::{PriceEngine, ReqwestTransport};
use blend_reporter::{init_logging, render_json};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = PriceFeedConfig::load();
    init_logging(
        config
            .as_ref()
            .map(|c| c.log_format)
            .unwrap_or(LogFormat::Text),
    );

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    info!("Starting blendprice v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Assets: {:?}, exchanges: {:?}, timeout: {:?}",
        config.assets,
        config.exchanges,
        config.fetch_timeout()
    );

    let transport = Arc::new(ReqwestTransport::new(&config.user_agent)?);
    let engine = PriceEngine::from_config(&config, transport);

    let snapshot = engine.snapshot(&config.assets).await;
    let blended = snapshot.reports.iter().filter(|r| r.blended.is_ok()).count();
    info!("Snapshot complete: {}/{} assets blended", blended, snapshot.reports.len());

    println!("{}", render_json(&snapshot)?);
    Ok(())
}
