//! Bitfinex: positional ticker array
//!
//! The v2 ticker row is `[SYMBOL, BID, BID_SIZE, ASK, ASK_SIZE, DAILY_CHANGE,
//! DAILY_CHANGE_RELATIVE, LAST_PRICE, VOLUME, HIGH, LOW]`. The layout is fixed,
//! so anything other than exactly eleven fields is rejected.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use blend_core::{AdapterError, AdapterResult, AssetSymbol, ExchangeId, Quote};

use super::{endpoint, parse_decimal, ExchangeAdapter};
use crate::transport::HttpTransport;

pub const TICKER_FIELDS: usize = 11;

const SYMBOL: usize = 0;
const LAST_PRICE: usize = 7;
const VOLUME: usize = 8;

pub struct BitfinexFeed {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl BitfinexFeed {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// Trading pair symbol, e.g. `tBTCUSD`
    pub fn symbol(asset: AssetSymbol) -> String {
        format!("t{}USD", asset.ticker())
    }

    pub fn ticker_url(&self, asset: AssetSymbol) -> String {
        endpoint(
            &self.base_url,
            &format!("/v2/tickers?symbols={}", Self::symbol(asset)),
        )
    }

    /// Returns `(LAST_PRICE, VOLUME)`
    pub fn parse_ticker(asset: AssetSymbol, body: &[u8]) -> AdapterResult<(Decimal, Decimal)> {
        let text = std::str::from_utf8(body)
            .map_err(|e| AdapterError::Parse(format!("bitfinex payload is not UTF-8: {e}")))?
            .trim();

        let mut row = strip_brackets(text).ok_or_else(|| {
            AdapterError::Parse(format!("bitfinex payload is not a bracketed array: {text:?}"))
        })?;
        // `tickers` wraps a single row in an outer list
        if let Some(inner) = strip_brackets(row) {
            row = inner;
        }

        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if fields.len() != TICKER_FIELDS {
            return Err(AdapterError::Parse(format!(
                "bitfinex ticker has {} fields, expected {TICKER_FIELDS}",
                fields.len()
            )));
        }

        let expected = Self::symbol(asset);
        let returned = fields[SYMBOL].trim_matches('"');
        if returned != expected {
            return Err(AdapterError::Validation(format!(
                "bitfinex returned {returned} for {expected}"
            )));
        }

        let price = parse_decimal("LAST_PRICE", fields[LAST_PRICE])?;
        let volume = parse_decimal("VOLUME", fields[VOLUME])?;
        Ok((price, volume))
    }
}

fn strip_brackets(text: &str) -> Option<&str> {
    text.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

#[async_trait::async_trait]
impl ExchangeAdapter for BitfinexFeed {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Bitfinex
    }

    fn supports(&self, _asset: AssetSymbol) -> bool {
        true
    }

    async fn fetch_quote(&self, asset: AssetSymbol) -> AdapterResult<Quote> {
        let url = self.ticker_url(asset);
        debug!("Fetching bitfinex {} from {}", asset, url);

        let body = self.transport.get(&url).await?;
        let (price, volume) = Self::parse_ticker(asset, &body)?;

        Quote::new(ExchangeId::Bitfinex, asset, price, volume)
    }
}
