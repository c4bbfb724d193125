//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported crypto assets, all quoted against USD (or USDT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetSymbol {
    Btc,
    Eth,
    Xrp,
    Ltc,
    Link,
    Ada,
}

impl AssetSymbol {
    pub const ALL: [AssetSymbol; 6] = [
        AssetSymbol::Btc,
        AssetSymbol::Eth,
        AssetSymbol::Xrp,
        AssetSymbol::Ltc,
        AssetSymbol::Link,
        AssetSymbol::Ada,
    ];

    /// Ticker as most exchanges spell it
    pub fn ticker(&self) -> &'static str {
        match self {
            AssetSymbol::Btc => "BTC",
            AssetSymbol::Eth => "ETH",
            AssetSymbol::Xrp => "XRP",
            AssetSymbol::Ltc => "LTC",
            AssetSymbol::Link => "LINK",
            AssetSymbol::Ada => "ADA",
        }
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker())
    }
}

impl FromStr for AssetSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetSymbol::ALL
            .into_iter()
            .find(|a| a.ticker().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown asset symbol: {s}"))
    }
}

/// Supported exchanges
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Binance,
    Coinbase,
    Kraken,
    Bitfinex,
}

impl ExchangeId {
    pub const ALL: [ExchangeId; 4] = [
        ExchangeId::Binance,
        ExchangeId::Coinbase,
        ExchangeId::Kraken,
        ExchangeId::Bitfinex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExchangeId::Binance => "binance",
            ExchangeId::Coinbase => "coinbase",
            ExchangeId::Kraken => "kraken",
            ExchangeId::Bitfinex => "bitfinex",
        }
    }

    /// Public REST endpoint used when no override is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ExchangeId::Binance => "https://api.binance.com",
            ExchangeId::Coinbase => "https://api.pro.coinbase.com",
            ExchangeId::Kraken => "https://api.kraken.com",
            ExchangeId::Bitfinex => "https://api-pub.bitfinex.com",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ExchangeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExchangeId::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown exchange: {s}"))
    }
}
