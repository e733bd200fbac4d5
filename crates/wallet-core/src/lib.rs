//! # wallet-core
//!
//! Wallet operations for the supported UTXO coins: key generation, address
//! validation and building signed transactions from a front-end send request.
//!
//! [`Wallet`] carries the coin registry and spend policy loaded from a
//! [`WalletConfig`]; the free functions use the built-in defaults.

pub mod coins;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod send;
pub mod types;

use chain_utxo::address;
use chain_utxo::utxo::SpendFilter;

pub use coins::{CoinRegistry, CoinSpec};
pub use config::WalletConfig;
pub use error::WalletError;
pub use types::{CoinSummary, KeyPair, TxRequest, TxResult, UtxoEntry, WalletData};

/// Coin registry plus spend policy.
#[derive(Debug, Clone)]
pub struct Wallet {
    registry: CoinRegistry,
    filter: SpendFilter,
}

impl Default for Wallet {
    fn default() -> Self {
        Wallet {
            registry: CoinRegistry::builtin(),
            filter: SpendFilter::default(),
        }
    }
}

impl Wallet {
    pub fn new(registry: CoinRegistry, filter: SpendFilter) -> Self {
        Wallet { registry, filter }
    }

    /// Built-in coins with the config's overrides and spend policy applied.
    pub fn from_config(config: &WalletConfig) -> Result<Self, WalletError> {
        let mut registry = CoinRegistry::builtin();
        config.apply(&mut registry)?;
        Ok(Wallet::new(registry, config.spend.filter()))
    }

    pub fn registry(&self) -> &CoinRegistry {
        &self.registry
    }

    pub fn spend_filter(&self) -> &SpendFilter {
        &self.filter
    }

    pub fn generate_key(&self, ticker: &str, network: Option<&str>) -> Result<KeyPair, WalletError> {
        keys::generate_key(&self.registry, ticker, network)
    }

    pub fn generate_transaction_hex(&self, request: &TxRequest) -> Result<TxResult, WalletError> {
        send::generate_transaction_hex(&self.registry, &self.filter, request)
    }

    /// Parse a JSON send request (the front end's `walletData` shape) and sign it.
    pub fn generate_transaction_hex_json(&self, request_json: &str) -> Result<TxResult, WalletError> {
        let request: TxRequest = serde_json::from_str(request_json)
            .map_err(|e| WalletError::Validation(format!("malformed request: {e}")))?;
        self.generate_transaction_hex(&request)
    }

    /// `Ok(false)` for a well-formed address of another coin or network.
    pub fn validate_address(
        &self,
        ticker: &str,
        addr: &str,
        network: Option<&str>,
    ) -> Result<bool, WalletError> {
        let coin = self.registry.get(ticker)?;
        let params = coin.network(network)?;
        Ok(address::validate_address(addr.trim(), params)?)
    }

    pub fn list_coins(&self) -> Vec<CoinSummary> {
        self.registry.iter().map(CoinSummary::from).collect()
    }
}

/// Generate a new key for a built-in coin.
pub fn generate_key(ticker: &str, network: Option<&str>) -> Result<KeyPair, WalletError> {
    Wallet::default().generate_key(ticker, network)
}

/// Build and sign a transaction with the built-in coins and default spend filter.
pub fn generate_transaction_hex(request: &TxRequest) -> Result<TxResult, WalletError> {
    Wallet::default().generate_transaction_hex(request)
}

/// Validate an address for a built-in coin.
pub fn validate_address(ticker: &str, addr: &str, network: Option<&str>) -> Result<bool, WalletError> {
    Wallet::default().validate_address(ticker, addr, network)
}

pub fn list_coins() -> Vec<CoinSummary> {
    Wallet::default().list_coins()
}
