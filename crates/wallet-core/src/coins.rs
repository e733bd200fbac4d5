use std::collections::BTreeMap;

use chain_utxo::dev_fee::DevFeeRule;
use chain_utxo::network::{find_network, CoinNetwork, NetworkParams};
use chain_utxo::plan::DEFAULT_CHANGE_DUST_SAT;
use serde::Serialize;

use crate::error::WalletError;

const DEFAULT_FEE_MIN_SAT: u64 = 100_000;
const DEFAULT_FEE_MAX_SAT: u64 = 10_000_000;

/// Everything the wallet needs to know to send a coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinSpec {
    pub ticker: String,
    pub name: String,
    /// UI accent color.
    pub color: String,
    /// Livenet first.
    pub networks: Vec<NetworkParams>,
    pub dev_fee: DevFeeRule,
    pub change_dust_sat: u64,
    pub fee_min_sat: u64,
    pub fee_max_sat: u64,
}

impl CoinSpec {
    pub fn builtin(coin: CoinNetwork) -> Self {
        let (name, color) = match coin {
            CoinNetwork::Doge => ("Dogecoin", "#BA9F33"),
            CoinNetwork::Pep => ("Pepecoin", "#009E60"),
            CoinNetwork::Flop => ("Flopcoin", "#6C6CFF"),
            CoinNetwork::Gemma => ("Gemma", "#636363"),
            CoinNetwork::Bbq => ("BBQCoin", "#B5462F"),
            CoinNetwork::Lky => ("LuckyCoin", "#2E8B57"),
            CoinNetwork::Trmp => ("Trumpow", "#C9A227"),
            CoinNetwork::Xbt => ("Bitcoin", "#F7931A"),
        };
        let (fee_min_sat, fee_max_sat) = match coin {
            CoinNetwork::Flop => (100_000_000, 1_000_000_000),
            CoinNetwork::Gemma => (DEFAULT_FEE_MIN_SAT, 1_000_000_000),
            _ => (DEFAULT_FEE_MIN_SAT, DEFAULT_FEE_MAX_SAT),
        };

        CoinSpec {
            ticker: coin.ticker().to_string(),
            name: name.to_string(),
            color: color.to_string(),
            networks: coin.networks(),
            dev_fee: DevFeeRule::for_coin(coin),
            change_dust_sat: DEFAULT_CHANGE_DUST_SAT,
            fee_min_sat,
            fee_max_sat,
        }
    }

    /// The named network, or livenet when `name` is `None`.
    pub fn network(&self, name: Option<&str>) -> Result<&NetworkParams, WalletError> {
        let found = match name {
            Some(name) => find_network(&self.networks, name),
            None => self.networks.first(),
        };
        found.ok_or_else(|| {
            WalletError::UnsupportedCoin(format!(
                "{} has no network '{}'",
                self.ticker,
                name.unwrap_or("livenet")
            ))
        })
    }

    pub fn check_fee(&self, fee_sat: u64) -> Result<(), WalletError> {
        if fee_sat < self.fee_min_sat || fee_sat > self.fee_max_sat {
            return Err(WalletError::Validation(format!(
                "fee must be between {} and {} satoshis for {}, got {fee_sat}",
                self.fee_min_sat, self.fee_max_sat, self.ticker
            )));
        }
        Ok(())
    }
}

/// Coins known to the wallet, keyed by upper-case ticker.
#[derive(Debug, Clone, Default)]
pub struct CoinRegistry {
    coins: BTreeMap<String, CoinSpec>,
}

impl CoinRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for coin in CoinNetwork::ALL {
            registry.insert(CoinSpec::builtin(coin));
        }
        registry
    }

    /// Case-insensitive ticker lookup.
    pub fn get(&self, ticker: &str) -> Result<&CoinSpec, WalletError> {
        self.coins
            .get(&ticker.trim().to_ascii_uppercase())
            .ok_or_else(|| WalletError::UnsupportedCoin(ticker.to_string()))
    }

    /// Add or replace a coin.
    pub fn insert(&mut self, mut spec: CoinSpec) {
        spec.ticker = spec.ticker.trim().to_ascii_uppercase();
        self.coins.insert(spec.ticker.clone(), spec);
    }

    /// Coins in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = &CoinSpec> {
        self.coins.values()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}
