//! JSON view of a market snapshot
//!
//! Failed fetches and unblendable assets are shown as `-1` here, and only here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use blend_core::{AssetSymbol, ExchangeId};
use blend_price_feed::{AssetReport, FeedOutcome, MarketSnapshot};

pub const SENTINEL: Decimal = Decimal::NEGATIVE_ONE;

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotView {
    pub taken_at: DateTime<Utc>,
    pub assets: Vec<AssetView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    pub asset: AssetSymbol,
    pub price: Decimal,
    pub total_volume: Decimal,
    pub contributors: Vec<ExchangeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub exchanges: Vec<ExchangeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeView {
    pub exchange: ExchangeId,
    pub price: Decimal,
    pub volume: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&MarketSnapshot> for SnapshotView {
    fn from(snapshot: &MarketSnapshot) -> Self {
        Self {
            taken_at: snapshot.taken_at,
            assets: snapshot.reports.iter().map(AssetView::from).collect(),
        }
    }
}

impl From<&AssetReport> for AssetView {
    fn from(report: &AssetReport) -> Self {
        let exchanges = report.collected.outcomes.iter().map(ExchangeView::from).collect();

        match &report.blended {
            Ok(blended) => Self {
                asset: report.asset(),
                price: blended.price,
                total_volume: blended.total_volume,
                contributors: blended.contributing_exchanges.iter().copied().collect(),
                error: None,
                exchanges,
            },
            Err(e) => Self {
                asset: report.asset(),
                price: SENTINEL,
                total_volume: SENTINEL,
                contributors: vec![],
                error: Some(e.to_string()),
                exchanges,
            },
        }
    }
}

impl From<&FeedOutcome> for ExchangeView {
    fn from(outcome: &FeedOutcome) -> Self {
        match &outcome.result {
            Ok(quote) => Self {
                exchange: outcome.exchange,
                price: quote.price,
                volume: quote.volume,
                error: None,
            },
            Err(e) => Self {
                exchange: outcome.exchange,
                price: SENTINEL,
                volume: SENTINEL,
                error: Some(e.to_string()),
            },
        }
    }
}

pub fn render_json(snapshot: &MarketSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SnapshotView::from(snapshot))
}
