//! Blended price engine - fans out to the feeds, then weights the results

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, warn};

use blend_core::{
    AggregatedPrice, AggregationResult, AssetSymbol, ExchangeId, PriceFeedConfig,
};

use crate::aggregator::PriceAggregator;
use crate::coordinator::{AggregationCoordinator, CollectedQuotes, CoordinatorConfig};
use crate::feeds::{build_feeds, ExchangeAdapter};
use crate::transport::HttpTransport;

/// Per-asset result of one snapshot
#[derive(Debug, Clone)]
pub struct AssetReport {
    pub collected: CollectedQuotes,
    pub blended: AggregationResult<AggregatedPrice>,
}

impl AssetReport {
    pub fn asset(&self) -> AssetSymbol {
        self.collected.asset
    }
}

/// Every configured asset across every configured exchange
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub taken_at: DateTime<Utc>,
    pub exchanges: Vec<ExchangeId>,
    pub reports: Vec<AssetReport>,
}

impl MarketSnapshot {
    pub fn report(&self, asset: AssetSymbol) -> Option<&AssetReport> {
        self.reports.iter().find(|r| r.asset() == asset)
    }
}

/// Main price engine
pub struct PriceEngine {
    feeds: Vec<Arc<dyn ExchangeAdapter>>,
    coordinator: AggregationCoordinator,
    aggregator: PriceAggregator,
}

impl PriceEngine {
    pub fn new(feeds: Vec<Arc<dyn ExchangeAdapter>>, coordinator: AggregationCoordinator) -> Self {
        Self {
            feeds,
            coordinator,
            aggregator: PriceAggregator::new(),
        }
    }

    pub fn from_config(config: &PriceFeedConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let coordinator = AggregationCoordinator::new(CoordinatorConfig {
            fetch_timeout: config.fetch_timeout(),
        });
        Self::new(build_feeds(config, transport), coordinator)
    }

    pub fn exchanges(&self) -> Vec<ExchangeId> {
        self.feeds.iter().map(|f| f.exchange()).collect()
    }

    /// Fetch one asset from every feed without blending
    pub async fn collect(&self, asset: AssetSymbol) -> CollectedQuotes {
        self.coordinator.aggregate(asset, &self.feeds).await
    }

    /// Volume-weighted price for one asset
    pub async fn aggregated_price(&self, asset: AssetSymbol) -> AggregationResult<AggregatedPrice> {
        self.report(asset).await.blended
    }

    /// Report on several assets, processed concurrently
    pub async fn snapshot(&self, assets: &[AssetSymbol]) -> MarketSnapshot {
        let taken_at = Utc::now();
        let reports = join_all(assets.iter().map(|asset| self.report(*asset))).await;

        MarketSnapshot {
            taken_at,
            exchanges: self.exchanges(),
            reports,
        }
    }

    async fn report(&self, asset: AssetSymbol) -> AssetReport {
        let collected = self.collect(asset).await;
        let quotes: Vec<_> = collected.quotes().cloned().collect();
        let blended = self.aggregator.aggregate(asset, &quotes);

        match &blended {
            Ok(price) => info!(
                "{} blended price {} from {}/{} exchanges",
                asset,
                price.price,
                price.contributor_count(),
                collected.outcomes.len()
            ),
            Err(e) => warn!("{}: {}", asset, e),
        }

        AssetReport { collected, blended }
    }
}
