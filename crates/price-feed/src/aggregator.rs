//! Volume-weighted price aggregation
//!
//! Each quote is weighted by its share of the total 24h volume, so thinly traded
//! venues barely move the blended price. Zero total volume is an error rather than
//! a zero or an unweighted mean.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::warn;

use blend_core::{round_price, AggregatedPrice, AggregationError, AggregationResult, AssetSymbol, Quote};

/// Stateless reducer from quotes to one blended price
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceAggregator;

impl PriceAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Blend `quotes` for `asset`. Quotes for any other asset are ignored.
    pub fn aggregate(&self, asset: AssetSymbol, quotes: &[Quote]) -> AggregationResult<AggregatedPrice> {
        let quotes: Vec<&Quote> = quotes
            .iter()
            .filter(|q| {
                if q.asset != asset {
                    warn!("Ignoring {} quote from {} while blending {}", q.asset, q.exchange, asset);
                    return false;
                }
                true
            })
            .collect();

        let overflow = || AggregationError::Overflow { asset };

        let total_volume = quotes
            .iter()
            .try_fold(Decimal::ZERO, |acc, q| acc.checked_add(q.volume))
            .ok_or_else(overflow)?;
        if total_volume.is_zero() {
            return Err(AggregationError::NoLiquidity { asset });
        }

        let mut price = Decimal::ZERO;
        let mut contributing_exchanges = BTreeSet::new();
        let mut timestamp = None;

        for quote in quotes.iter().filter(|q| q.has_liquidity()) {
            let weight = quote.volume.checked_div(total_volume).ok_or_else(overflow)?;
            price = quote
                .price
                .checked_mul(weight)
                .and_then(|share| price.checked_add(share))
                .ok_or_else(overflow)?;

            contributing_exchanges.insert(quote.exchange);
            timestamp = timestamp.max(Some(quote.fetched_at));
        }

        let timestamp = timestamp.ok_or(AggregationError::NoLiquidity { asset })?;

        Ok(AggregatedPrice {
            asset,
            price: round_price(price),
            total_volume,
            contributing_exchanges,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blend_core::ExchangeId;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn quote(exchange: ExchangeId, price: &str, volume: &str) -> Quote {
        Quote::at(exchange, AssetSymbol::Btc, d(price), d(volume), at(0)).unwrap()
    }

    #[test]
    fn test_weighted_average_ignores_zero_volume_price() {
        let quotes = vec![
            quote(ExchangeId::Binance, "100", "10"),
            quote(ExchangeId::Coinbase, "200", "20"),
            quote(ExchangeId::Kraken, "999", "0"),
        ];

        let blended = PriceAggregator::new().aggregate(AssetSymbol::Btc, &quotes).unwrap();

        assert_eq!(blended.price, d("166.667"));
        assert_eq!(blended.total_volume, d("30"));
        assert_eq!(
            blended.contributing_exchanges,
            BTreeSet::from([ExchangeId::Binance, ExchangeId::Coinbase])
        );
    }

    #[test]
    fn test_zero_liquidity() {
        let quotes = vec![
            quote(ExchangeId::Binance, "100", "0"),
            quote(ExchangeId::Bitfinex, "105", "0"),
        ];

        let err = PriceAggregator::new().aggregate(AssetSymbol::Btc, &quotes).unwrap_err();
        assert_eq!(err, AggregationError::NoLiquidity { asset: AssetSymbol::Btc });
    }

    #[test]
    fn test_no_quotes_is_no_liquidity() {
        let err = PriceAggregator::new().aggregate(AssetSymbol::Eth, &[]).unwrap_err();
        assert_eq!(err, AggregationError::NoLiquidity { asset: AssetSymbol::Eth });
    }

    #[test]
    fn test_single_quote_passes_through() {
        let quotes = vec![quote(ExchangeId::Kraken, "50005.123", "2.5")];
        let blended = PriceAggregator::new().aggregate(AssetSymbol::Btc, &quotes).unwrap();
        assert_eq!(blended.price, d("50005.123"));
        assert_eq!(blended.contributor_count(), 1);
    }

    #[test]
    fn test_timestamp_is_newest_contributor() {
        let quotes = vec![
            Quote::at(ExchangeId::Binance, AssetSymbol::Btc, d("1"), d("1"), at(5)).unwrap(),
            Quote::at(ExchangeId::Coinbase, AssetSymbol::Btc, d("1"), d("1"), at(9)).unwrap(),
            Quote::at(ExchangeId::Kraken, AssetSymbol::Btc, d("1"), d("0"), at(60)).unwrap(),
        ];

        let blended = PriceAggregator::new().aggregate(AssetSymbol::Btc, &quotes).unwrap();
        assert_eq!(blended.timestamp, at(9));
    }

    #[test]
    fn test_other_asset_quotes_are_ignored() {
        let eth = Quote::at(ExchangeId::Coinbase, AssetSymbol::Eth, d("3000"), d("100"), at(0)).unwrap();
        let quotes = vec![quote(ExchangeId::Binance, "50000", "1"), eth];

        let blended = PriceAggregator::new().aggregate(AssetSymbol::Btc, &quotes).unwrap();
        assert_eq!(blended.price, d("50000"));
        assert_eq!(blended.total_volume, d("1"));
    }

    #[test]
    fn test_volume_overflow_is_an_error() {
        let quotes = vec![
            quote(ExchangeId::Kraken, "50000", "50000000000000000000000000000"),
            quote(ExchangeId::Binance, "50010", "50000000000000000000000000000"),
        ];

        let err = PriceAggregator::new().aggregate(AssetSymbol::Btc, &quotes).unwrap_err();
        assert_eq!(err, AggregationError::Overflow { asset: AssetSymbol::Btc });
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let quotes = vec![
            quote(ExchangeId::Binance, "100.5", "3.3"),
            quote(ExchangeId::Bitfinex, "101.25", "7.1"),
        ];
        let aggregator = PriceAggregator::new();

        let first = aggregator.aggregate(AssetSymbol::Btc, &quotes).unwrap();
        let second = aggregator.aggregate(AssetSymbol::Btc, &quotes).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_blended_price_within_contributor_range(
            entries in prop::collection::vec((0u64..10_000_000, 0u64..1_000_000), 1..8)
        ) {
            let exchanges = ExchangeId::ALL;
            let quotes: Vec<Quote> = entries
                .iter()
                .enumerate()
                .map(|(i, (price, volume))| {
                    Quote::at(
                        exchanges[i % exchanges.len()],
                        AssetSymbol::Btc,
                        Decimal::new(*price as i64, 3),
                        Decimal::new(*volume as i64, 3),
                        at(0),
                    )
                    .unwrap()
                })
                .collect();

            let result = PriceAggregator::new().aggregate(AssetSymbol::Btc, &quotes);
            let liquid: Vec<&Quote> = quotes.iter().filter(|q| q.has_liquidity()).collect();

            if liquid.is_empty() {
                prop_assert!(result.is_err());
            } else {
                let blended = result.unwrap();
                let min = liquid.iter().map(|q| q.price).min().unwrap();
                let max = liquid.iter().map(|q| q.price).max().unwrap();
                prop_assert!(blended.price >= min && blended.price <= max);
                prop_assert!(!blended.contributing_exchanges.is_empty());
            }
        }
    }
}
