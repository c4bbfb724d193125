//! Fan-out/fan-in over the configured feeds
//!
//! Every feed runs in its own spawned task and hands its result back through its
//! `JoinHandle`, so each exchange owns exactly one result slot. Nothing is read
//! until every task has finished.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use blend_core::{AdapterError, AdapterResult, AssetSymbol, ExchangeId, Quote};

use crate::feeds::ExchangeAdapter;

/// Coordinator configuration
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    /// Upper bound on a single feed's fetch, `None` waits indefinitely
    pub fetch_timeout: Option<Duration>,
}

/// Result slot for one feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOutcome {
    pub exchange: ExchangeId,
    pub result: AdapterResult<Quote>,
}

/// Everything one fan-out produced, one outcome per requested feed
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedQuotes {
    pub asset: AssetSymbol,
    pub outcomes: Vec<FeedOutcome>,
}

impl CollectedQuotes {
    pub fn quotes(&self) -> impl Iterator<Item = &Quote> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (ExchangeId, &AdapterError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.exchange, e)))
    }

    pub fn outcome(&self, exchange: ExchangeId) -> Option<&FeedOutcome> {
        self.outcomes.iter().find(|o| o.exchange == exchange)
    }

    pub fn success_count(&self) -> usize {
        self.quotes().count()
    }

    pub fn into_quotes(self) -> Vec<Quote> {
        self.outcomes.into_iter().filter_map(|o| o.result.ok()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregationCoordinator {
    config: CoordinatorConfig,
}

impl AggregationCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    /// Fetch `asset` from every feed concurrently and wait for all of them.
    ///
    /// Failures are logged and recorded; they never cut the others short. Feeds
    /// that do not list `asset` are recorded as unsupported without a fetch.
    pub async fn aggregate(
        &self,
        asset: AssetSymbol,
        feeds: &[Arc<dyn ExchangeAdapter>],
    ) -> CollectedQuotes {
        let tasks = feeds.iter().map(|feed| {
            let feed = Arc::clone(feed);
            let exchange = feed.exchange();
            let timeout = self.config.fetch_timeout;

            let handle = feed.supports(asset).then(|| {
                tokio::spawn(async move { fetch(feed.as_ref(), asset, timeout).await })
            });

            async move {
                let result = match handle {
                    Some(handle) => match handle.await {
                        Ok(result) => result,
                        Err(e) => Err(AdapterError::TaskFailed(e.to_string())),
                    },
                    None => Err(AdapterError::UnsupportedAsset { exchange, asset }),
                };
                FeedOutcome { exchange, result }
            }
        });

        let outcomes = join_all(tasks).await;

        for outcome in &outcomes {
            match &outcome.result {
                Ok(quote) => debug!(
                    "{} {}: price={} volume={}",
                    outcome.exchange, asset, quote.price, quote.volume
                ),
                Err(e) => warn!(
                    exchange = %outcome.exchange,
                    asset = %asset,
                    kind = e.kind(),
                    "Fetch failed: {}",
                    e
                ),
            }
        }

        CollectedQuotes { asset, outcomes }
    }
}

async fn fetch(
    feed: &dyn ExchangeAdapter,
    asset: AssetSymbol,
    timeout: Option<Duration>,
) -> AdapterResult<Quote> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, feed.fetch_quote(asset))
            .await
            .map_err(|_| AdapterError::Transport(format!("timed out after {limit:?}")))?,
        None => feed.fetch_quote(asset).await,
    }
}
