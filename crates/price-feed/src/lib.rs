//! Blended reference price from several exchange tickers
//!
//! Features:
//! - One REST feed per exchange, each with its own wire format
//! - Concurrent fan-out with per-feed failure isolation
//! - Volume-weighted blending
//! - Optional per-feed timeout

pub mod aggregator;
pub mod coordinator;
pub mod engine;
pub mod feeds;
pub mod transport;

pub use aggregator::PriceAggregator;
pub use coordinator::{AggregationCoordinator, CollectedQuotes, CoordinatorConfig, FeedOutcome};
pub use engine::{AssetReport, MarketSnapshot, PriceEngine};
pub use feeds::{build_feeds, ExchangeAdapter};
pub use transport::{HttpTransport, ReqwestTransport};
