//! Binance: separate price and 24h statistics endpoints

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use blend_core::{AdapterError, AdapterResult, AssetSymbol, ExchangeId, Quote};

use super::{decode_json, endpoint, parse_decimal, ExchangeAdapter};
use crate::transport::HttpTransport;

#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    symbol: String,
    price: String,
}

/// Subset of the `ticker/24hr` payload
#[derive(Debug, Deserialize)]
struct DailyStatsResponse {
    symbol: String,
    volume: String,
}

pub struct BinanceFeed {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl BinanceFeed {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// Binance quotes against USDT, e.g. `BTCUSDT`
    pub fn symbol(asset: AssetSymbol) -> String {
        format!("{}USDT", asset.ticker())
    }

    pub fn price_url(&self, asset: AssetSymbol) -> String {
        endpoint(
            &self.base_url,
            &format!("/api/v1/ticker/price?symbol={}", Self::symbol(asset)),
        )
    }

    pub fn volume_url(&self, asset: AssetSymbol) -> String {
        endpoint(
            &self.base_url,
            &format!("/api/v1/ticker/24hr?symbol={}", Self::symbol(asset)),
        )
    }

    pub fn parse_price(asset: AssetSymbol, body: &[u8]) -> AdapterResult<Decimal> {
        let response: TickerPriceResponse = decode_json(ExchangeId::Binance, body)?;
        check_symbol(asset, &response.symbol)?;
        parse_decimal("price", &response.price)
    }

    pub fn parse_volume(asset: AssetSymbol, body: &[u8]) -> AdapterResult<Decimal> {
        let response: DailyStatsResponse = decode_json(ExchangeId::Binance, body)?;
        check_symbol(asset, &response.symbol)?;
        parse_decimal("volume", &response.volume)
    }
}

fn check_symbol(asset: AssetSymbol, returned: &str) -> AdapterResult<()> {
    let expected = BinanceFeed::symbol(asset);
    if returned != expected {
        return Err(AdapterError::Validation(format!(
            "binance returned {returned} for {expected}"
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl ExchangeAdapter for BinanceFeed {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Binance
    }

    fn supports(&self, _asset: AssetSymbol) -> bool {
        true
    }

    async fn fetch_quote(&self, asset: AssetSymbol) -> AdapterResult<Quote> {
        let price_url = self.price_url(asset);
        let volume_url = self.volume_url(asset);
        debug!("Fetching binance {} from {} and {}", asset, price_url, volume_url);

        let (price_body, volume_body) = tokio::try_join!(
            self.transport.get(&price_url),
            self.transport.get(&volume_url)
        )?;

        let price = Self::parse_price(asset, &price_body)?;
        let volume = Self::parse_volume(asset, &volume_body)?;

        Quote::new(ExchangeId::Binance, asset, price, volume)
    }
}
