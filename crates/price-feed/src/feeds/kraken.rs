//! Kraken: nested per-pair ticker result

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use blend_core::{AdapterError, AdapterResult, AssetSymbol, ExchangeId, Quote};

use super::{decode_json, endpoint, parse_decimal, unsupported, ExchangeAdapter};
use crate::transport::HttpTransport;

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: HashMap<String, PairTicker>,
}

#[derive(Debug, Deserialize)]
struct PairTicker {
    /// Last trade closed: `[price, lot volume]`
    c: Vec<String>,
    /// Volume: `[today, last 24 hours]`
    v: Vec<String>,
}

/// Kraken pair naming: `(request pair, result key)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KrakenPair {
    pub request: &'static str,
    pub result_key: &'static str,
}

const PAIRS: &[(AssetSymbol, KrakenPair)] = &[
    (AssetSymbol::Btc, KrakenPair { request: "XBTUSD", result_key: "XXBTZUSD" }),
    (AssetSymbol::Eth, KrakenPair { request: "ETHUSD", result_key: "XETHZUSD" }),
    (AssetSymbol::Xrp, KrakenPair { request: "XRPUSD", result_key: "XXRPZUSD" }),
    (AssetSymbol::Ltc, KrakenPair { request: "LTCUSD", result_key: "XLTCZUSD" }),
    (AssetSymbol::Link, KrakenPair { request: "LINKUSD", result_key: "LINKUSD" }),
    (AssetSymbol::Ada, KrakenPair { request: "ADAUSD", result_key: "ADAUSD" }),
];

pub struct KrakenFeed {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl KrakenFeed {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn pair(asset: AssetSymbol) -> AdapterResult<KrakenPair> {
        PAIRS
            .iter()
            .find(|(a, _)| *a == asset)
            .map(|(_, pair)| *pair)
            .ok_or_else(|| unsupported(ExchangeId::Kraken, asset))
    }

    pub fn ticker_url(&self, asset: AssetSymbol) -> AdapterResult<String> {
        let pair = Self::pair(asset)?;
        Ok(endpoint(
            &self.base_url,
            &format!("/0/public/Ticker?pair={}", pair.request),
        ))
    }

    /// Returns `(last close price, 24h volume)`
    pub fn parse_ticker(asset: AssetSymbol, body: &[u8]) -> AdapterResult<(Decimal, Decimal)> {
        let pair = Self::pair(asset)?;
        let response: TickerResponse = decode_json(ExchangeId::Kraken, body)?;

        if !response.error.is_empty() {
            return Err(AdapterError::Validation(format!(
                "kraken reported errors: {}",
                response.error.join("; ")
            )));
        }

        let ticker = response.result.get(pair.result_key).ok_or_else(|| {
            AdapterError::Parse(format!("kraken result has no {} entry", pair.result_key))
        })?;

        let price = ticker
            .c
            .first()
            .ok_or_else(|| AdapterError::Parse("kraken close array is empty".into()))?;
        // index 0 is today's partial figure
        let volume = ticker
            .v
            .get(1)
            .ok_or_else(|| AdapterError::Parse("kraken volume array has no 24h entry".into()))?;

        Ok((parse_decimal("price", price)?, parse_decimal("volume", volume)?))
    }
}

#[async_trait::async_trait]
impl ExchangeAdapter for KrakenFeed {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Kraken
    }

    fn supports(&self, asset: AssetSymbol) -> bool {
        Self::pair(asset).is_ok()
    }

    async fn fetch_quote(&self, asset: AssetSymbol) -> AdapterResult<Quote> {
        let url = self.ticker_url(asset)?;
        debug!("Fetching kraken {} from {}", asset, url);

        let body = self.transport.get(&url).await?;
        let (price, volume) = Self::parse_ticker(asset, &body)?;

        Quote::new(ExchangeId::Kraken, asset, price, volume)
    }
}
