//! Quote and aggregated price types

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{AdapterError, AdapterResult, AssetSymbol, ExchangeId};

/// Decimal places kept on every price and volume
pub const PRICE_DECIMALS: u32 = 3;

/// Round to three decimals, halves away from zero.
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// One exchange's price and 24h volume for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub exchange: ExchangeId,
    pub asset: AssetSymbol,
    pub price: Decimal,
    /// 24h traded volume in base-currency units
    pub volume: Decimal,
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    /// Build a quote stamped with the current time.
    ///
    /// Rejects negative figures and rounds both to [`PRICE_DECIMALS`].
    pub fn new(
        exchange: ExchangeId,
        asset: AssetSymbol,
        price: Decimal,
        volume: Decimal,
    ) -> AdapterResult<Self> {
        Self::at(exchange, asset, price, volume, Utc::now())
    }

    pub fn at(
        exchange: ExchangeId,
        asset: AssetSymbol,
        price: Decimal,
        volume: Decimal,
        fetched_at: DateTime<Utc>,
    ) -> AdapterResult<Self> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(AdapterError::Validation(format!(
                "{exchange} reported negative price {price} for {asset}"
            )));
        }
        if volume.is_sign_negative() && !volume.is_zero() {
            return Err(AdapterError::Validation(format!(
                "{exchange} reported negative volume {volume} for {asset}"
            )));
        }

        Ok(Self {
            exchange,
            asset,
            price: round_price(price),
            volume: round_price(volume),
            fetched_at,
        })
    }

    pub fn has_liquidity(&self) -> bool {
        self.volume > Decimal::ZERO
    }
}

/// Volume-weighted price across several exchanges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPrice {
    pub asset: AssetSymbol,
    pub price: Decimal,
    pub total_volume: Decimal,
    /// Exchanges whose quotes carried non-zero weight
    pub contributing_exchanges: BTreeSet<ExchangeId>,
    /// Newest `fetched_at` among the contributing quotes
    pub timestamp: DateTime<Utc>,
}

impl AggregatedPrice {
    pub fn contributor_count(&self) -> usize {
        self.contributing_exchanges.len()
    }
}
