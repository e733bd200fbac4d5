//! TOML configuration file.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [spend]
//! min_utxo_sat = 0
//!
//! [[coins]]
//! ticker = "DOGE"
//! fee_min_sat = 50000
//! ```
//!
//! Every section is optional. `[[coins]]` entries patch built-in coins or,
//! when they carry `networks`, add new ones.

use std::fs;
use std::path::Path;

use chain_utxo::dev_fee::DevFeeRule;
use chain_utxo::network::NetworkParams;
use chain_utxo::plan::DEFAULT_CHANGE_DUST_SAT;
use chain_utxo::utxo::SpendFilter;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::coins::{CoinRegistry, CoinSpec};
use crate::error::WalletError;
use crate::logging::LogConfig;

/// Environment variable naming the config file the CLI loads by default.
pub const CONFIG_ENV_VAR: &str = "UTXO_WALLET_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub logging: LogConfig,
    pub spend: SpendConfig,
    pub coins: Vec<CoinOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendConfig {
    /// UTXOs worth this much or less are never spent.
    pub min_utxo_sat: u64,
    pub min_confirmations: u32,
}

impl Default for SpendConfig {
    fn default() -> Self {
        let filter = SpendFilter::default();
        SpendConfig {
            min_utxo_sat: filter.min_value_sat,
            min_confirmations: filter.min_confirmations,
        }
    }
}

impl SpendConfig {
    pub fn filter(&self) -> SpendFilter {
        SpendFilter {
            min_value_sat: self.min_utxo_sat,
            min_confirmations: self.min_confirmations,
        }
    }
}

/// Changes to one coin. Unset fields keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinOverride {
    pub ticker: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub fee_min_sat: Option<u64>,
    pub fee_max_sat: Option<u64>,
    pub change_dust_sat: Option<u64>,
    pub dev_fee: Option<DevFeeRule>,
    /// Replaces the whole network list; required for new coins.
    pub networks: Option<Vec<NetworkParams>>,
}

impl WalletConfig {
    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            WalletError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, WalletError> {
        let config: WalletConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        for coin in &self.coins {
            if coin.ticker.trim().is_empty() {
                return Err(WalletError::Config("coin entry without ticker".into()));
            }
            if let (Some(min), Some(max)) = (coin.fee_min_sat, coin.fee_max_sat) {
                if min > max {
                    return Err(WalletError::Config(format!(
                        "{}: fee_min_sat {min} exceeds fee_max_sat {max}",
                        coin.ticker
                    )));
                }
            }
            if coin.networks.as_ref().is_some_and(|n| n.is_empty()) {
                return Err(WalletError::Config(format!(
                    "{}: networks must not be empty",
                    coin.ticker
                )));
            }
        }
        Ok(())
    }

    /// Apply the `[[coins]]` entries to `registry`.
    pub fn apply(&self, registry: &mut CoinRegistry) -> Result<(), WalletError> {
        for entry in &self.coins {
            let mut spec = match registry.get(&entry.ticker) {
                Ok(existing) => existing.clone(),
                Err(_) => new_coin(entry)?,
            };
            entry.patch(&mut spec);
            if spec.fee_min_sat > spec.fee_max_sat {
                return Err(WalletError::Config(format!(
                    "{}: fee_min_sat {} exceeds fee_max_sat {}",
                    spec.ticker, spec.fee_min_sat, spec.fee_max_sat
                )));
            }
            debug!("applied config for {}", spec.ticker);
            registry.insert(spec);
        }
        Ok(())
    }
}

fn new_coin(entry: &CoinOverride) -> Result<CoinSpec, WalletError> {
    let networks = entry.networks.clone().ok_or_else(|| {
        WalletError::Config(format!(
            "{} is not a built-in coin and has no networks",
            entry.ticker
        ))
    })?;
    Ok(CoinSpec {
        ticker: entry.ticker.clone(),
        name: entry.ticker.clone(),
        color: "#808080".to_string(),
        networks,
        dev_fee: DevFeeRule::None,
        change_dust_sat: DEFAULT_CHANGE_DUST_SAT,
        fee_min_sat: 100_000,
        fee_max_sat: 10_000_000,
    })
}

impl CoinOverride {
    fn patch(&self, spec: &mut CoinSpec) {
        if let Some(name) = &self.name {
            spec.name = name.clone();
        }
        if let Some(color) = &self.color {
            spec.color = color.clone();
        }
        if let Some(min) = self.fee_min_sat {
            spec.fee_min_sat = min;
        }
        if let Some(max) = self.fee_max_sat {
            spec.fee_max_sat = max;
        }
        if let Some(dust) = self.change_dust_sat {
            spec.change_dust_sat = dust;
        }
        if let Some(rule) = &self.dev_fee {
            spec.dev_fee = rule.clone();
        }
        if let Some(networks) = &self.networks {
            spec.networks = networks.clone();
        }
    }
}
