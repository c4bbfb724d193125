//! Exchange REST feeds
//!
//! Each feed turns one exchange's ticker payload into a [`Quote`]. Feeds never
//! retry: a failed call surfaces immediately as an [`AdapterError`].

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use blend_core::{
    AdapterError, AdapterResult, AssetSymbol, ExchangeId, PriceFeedConfig, Quote,
};

use crate::transport::HttpTransport;

pub mod binance;
pub mod bitfinex;
pub mod coinbase;
pub mod kraken;

pub use binance::BinanceFeed;
pub use bitfinex::BitfinexFeed;
pub use coinbase::CoinbaseFeed;
pub use kraken::KrakenFeed;

/// One exchange's ticker source
#[async_trait::async_trait]
pub trait ExchangeAdapter: Send + Sync {
    fn exchange(&self) -> ExchangeId;

    /// Whether the exchange lists a USD pair for this asset
    fn supports(&self, asset: AssetSymbol) -> bool;

    async fn fetch_quote(&self, asset: AssetSymbol) -> AdapterResult<Quote>;
}

/// Build the configured feeds over a shared transport
pub fn build_feeds(
    config: &PriceFeedConfig,
    transport: Arc<dyn HttpTransport>,
) -> Vec<Arc<dyn ExchangeAdapter>> {
    config
        .exchanges
        .iter()
        .map(|exchange| {
            let base_url = config.endpoints.base_url(*exchange);
            let transport = Arc::clone(&transport);

            let feed: Arc<dyn ExchangeAdapter> = match exchange {
                ExchangeId::Binance => Arc::new(BinanceFeed::new(base_url, transport)),
                ExchangeId::Coinbase => Arc::new(CoinbaseFeed::new(base_url, transport)),
                ExchangeId::Kraken => Arc::new(KrakenFeed::new(base_url, transport)),
                ExchangeId::Bitfinex => Arc::new(BitfinexFeed::new(base_url, transport)),
            };
            feed
        })
        .collect()
}

pub(crate) fn unsupported(exchange: ExchangeId, asset: AssetSymbol) -> AdapterError {
    AdapterError::UnsupportedAsset { exchange, asset }
}

/// Parse an exchange-supplied number, plain or exponent notation
pub(crate) fn parse_decimal(field: &str, raw: &str) -> AdapterResult<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| AdapterError::Parse(format!("{field} is not numeric: {raw:?}")))
}

pub(crate) fn decode_json<T: DeserializeOwned>(exchange: ExchangeId, body: &[u8]) -> AdapterResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AdapterError::Parse(format!("malformed {exchange} payload: {e}")))
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::StaticTransport;

    #[test]
    fn test_parse_decimal_accepts_plain_and_exponent() {
        assert_eq!(parse_decimal("price", " 42.50 ").unwrap(), Decimal::new(4250, 2));
        assert_eq!(parse_decimal("volume", "1.5e3").unwrap(), Decimal::new(1500, 0));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        let err = parse_decimal("price", "n/a").unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
        assert!(parse_decimal("price", "").is_err());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(endpoint("http://x/", "/a?b=c"), "http://x/a?b=c");
        assert_eq!(endpoint("http://x", "/a"), "http://x/a");
    }

    #[test]
    fn test_build_feeds_follows_config_order() {
        let config = PriceFeedConfig {
            exchanges: vec![ExchangeId::Bitfinex, ExchangeId::Binance],
            ..Default::default()
        };
        let feeds = build_feeds(&config, Arc::new(StaticTransport::new()));

        let ids: Vec<_> = feeds.iter().map(|f| f.exchange()).collect();
        assert_eq!(ids, vec![ExchangeId::Bitfinex, ExchangeId::Binance]);
    }
}
