//! Coinbase: price and volume from one ticker call

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use blend_core::{AdapterResult, AssetSymbol, ExchangeId, Quote};
use rust_decimal::Decimal;

use super::{decode_json, endpoint, parse_decimal, unsupported, ExchangeAdapter};
use crate::transport::HttpTransport;

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
    volume: String,
}

pub struct CoinbaseFeed {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl CoinbaseFeed {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// Product id such as `BTC-USD`; ADA is not listed
    pub fn product_id(asset: AssetSymbol) -> Option<String> {
        match asset {
            AssetSymbol::Ada => None,
            _ => Some(format!("{}-USD", asset.ticker())),
        }
    }

    pub fn ticker_url(&self, asset: AssetSymbol) -> AdapterResult<String> {
        let product = Self::product_id(asset).ok_or_else(|| unsupported(ExchangeId::Coinbase, asset))?;
        Ok(endpoint(&self.base_url, &format!("/products/{product}/ticker")))
    }

    /// Returns `(price, volume)`
    pub fn parse_ticker(body: &[u8]) -> AdapterResult<(Decimal, Decimal)> {
        let response: TickerResponse = decode_json(ExchangeId::Coinbase, body)?;
        let price = parse_decimal("price", &response.price)?;
        let volume = parse_decimal("volume", &response.volume)?;
        Ok((price, volume))
    }
}

#[async_trait::async_trait]
impl ExchangeAdapter for CoinbaseFeed {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Coinbase
    }

    fn supports(&self, asset: AssetSymbol) -> bool {
        Self::product_id(asset).is_some()
    }

    async fn fetch_quote(&self, asset: AssetSymbol) -> AdapterResult<Quote> {
        let url = self.ticker_url(asset)?;
        debug!("Fetching coinbase {} from {}", asset, url);

        let body = self.transport.get(&url).await?;
        let (price, volume) = Self::parse_ticker(&body)?;

        Quote::new(ExchangeId::Coinbase, asset, price, volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::StaticTransport;
    use blend_core::AdapterError;
    use std::str::FromStr;

    const BASE: &str = "http://coinbase.test";

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_ticker_fixture() {
        let body = br#"{"trade_id":86326522,"price":"2999.9995","size":"0.01","bid":"2999.99","ask":"3000.00","volume":"84211.12345","time":"2024-01-01T00:00:00Z"}"#;
        let (price, volume) = CoinbaseFeed::parse_ticker(body).unwrap();
        assert_eq!(price, d("2999.9995"));
        assert_eq!(volume, d("84211.12345"));
    }

    #[test]
    fn test_parse_ticker_errors() {
        let err = CoinbaseFeed::parse_ticker(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));

        let err = CoinbaseFeed::parse_ticker(br#"{"price":"1.0"}"#).unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));

        let err = CoinbaseFeed::parse_ticker(br#"{"price":"1.0","volume":"lots"}"#).unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_quote_rounds_half_away_from_zero() {
        let transport = StaticTransport::new().respond(
            format!("{BASE}/products/ETH-USD/ticker"),
            r#"{"trade_id":1,"price":"2999.9995","volume":"10.0005"}"#,
        );
        let feed = CoinbaseFeed::new(BASE, Arc::new(transport));

        let quote = feed.fetch_quote(AssetSymbol::Eth).await.unwrap();
        assert_eq!(quote.price, d("3000.000"));
        assert_eq!(quote.volume, d("10.001"));
    }

    #[tokio::test]
    async fn test_ada_is_unsupported_without_a_request() {
        let transport = Arc::new(StaticTransport::new());
        let feed = CoinbaseFeed::new(BASE, transport.clone());

        assert!(!feed.supports(AssetSymbol::Ada));
        let err = feed.fetch_quote(AssetSymbol::Ada).await.unwrap_err();
        assert_eq!(
            err,
            AdapterError::UnsupportedAsset {
                exchange: ExchangeId::Coinbase,
                asset: AssetSymbol::Ada,
            }
        );
        assert_eq!(transport.calls(), 0);
    }
}
