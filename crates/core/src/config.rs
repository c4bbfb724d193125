//! Configuration types

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{AssetSymbol, ConfigError, ConfigResult, ExchangeId};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "BLENDPRICE_CONFIG";

/// Prefix for environment overrides, e.g. `BLENDPRICE__FETCH_TIMEOUT_MS=5000`
pub const ENV_PREFIX: &str = "BLENDPRICE";

const DEFAULT_CONFIG_FILE: &str = "blendprice";

/// Base URL per exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeEndpoints {
    pub binance: String,
    pub coinbase: String,
    pub kraken: String,
    pub bitfinex: String,
}

impl ExchangeEndpoints {
    pub fn base_url(&self, exchange: ExchangeId) -> &str {
        match exchange {
            ExchangeId::Binance => &self.binance,
            ExchangeId::Coinbase => &self.coinbase,
            ExchangeId::Kraken => &self.kraken,
            ExchangeId::Bitfinex => &self.bitfinex,
        }
    }
}

impl Default for ExchangeEndpoints {
    fn default() -> Self {
        Self {
            binance: ExchangeId::Binance.default_base_url().to_string(),
            coinbase: ExchangeId::Coinbase.default_base_url().to_string(),
            kraken: ExchangeId::Kraken.default_base_url().to_string(),
            bitfinex: ExchangeId::Bitfinex.default_base_url().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFeedConfig {
    pub assets: Vec<AssetSymbol>,
    pub exchanges: Vec<ExchangeId>,
    pub endpoints: ExchangeEndpoints,
    /// Per-adapter fetch timeout, 0 disables it
    pub fetch_timeout_ms: u64,
    pub user_agent: String,
    pub log_format: LogFormat,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            assets: AssetSymbol::ALL.to_vec(),
            exchanges: ExchangeId::ALL.to_vec(),
            endpoints: ExchangeEndpoints::default(),
            fetch_timeout_ms: 10_000,
            user_agent: format!("blendprice/{}", env!("CARGO_PKG_VERSION")),
            log_format: LogFormat::Text,
        }
    }
}

impl PriceFeedConfig {
    /// Load from `blendprice.toml` (or the file named by `BLENDPRICE_CONFIG`),
    /// then apply `BLENDPRICE__*` environment overrides.
    pub fn load() -> ConfigResult<Self> {
        let file = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => File::with_name(&path).required(true),
            Err(_) => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("assets")
                .with_list_parse_key("exchanges"),
        );

        Self::from_sources(builder)
    }

    /// Deserialize and validate whatever sources the builder carries
    pub fn from_sources(builder: ConfigBuilder<DefaultState>) -> ConfigResult<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.assets.is_empty() {
            return Err(ConfigError::Invalid("no assets configured".into()));
        }
        if self.exchanges.is_empty() {
            return Err(ConfigError::Invalid("no exchanges configured".into()));
        }
        for (i, exchange) in self.exchanges.iter().enumerate() {
            if self.exchanges[..i].contains(exchange) {
                return Err(ConfigError::Invalid(format!("{exchange} listed twice")));
            }
        }

        for exchange in &self.exchanges {
            let url = self.endpoints.base_url(*exchange);
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{exchange} endpoint is not an http(s) URL: {url:?}"
                )));
            }
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }
}
