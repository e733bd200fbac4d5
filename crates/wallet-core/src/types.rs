use chain_utxo::dev_fee::DevFeeRule;
use crypto_utils::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use crate::coins::CoinSpec;

/// A wallet as the front end stores it.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletData {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub address: String,
    /// WIF private key.
    #[serde(default = "empty_secret", deserialize_with = "secret_string")]
    pub privkey: SecretString,
    #[serde(default)]
    pub utxos: Vec<UtxoEntry>,
}

/// One UTXO as reported by the explorer. `value` is in coins, not satoshis.
///
/// Fields are optional here so that a missing one produces a
/// `UTXO {index} missing ...` error instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtxoEntry {
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub vout: Option<u32>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub script_hex: String,
    #[serde(default)]
    pub confirmations: Option<u32>,
}

/// Input of `generate_transaction_hex`. Amounts are in satoshis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub wallet_data: WalletData,
    #[serde(default)]
    pub receiving_address: String,
    pub amount: u64,
    pub fee: u64,
    /// Take the network fee out of `amount` instead of adding it on top.
    #[serde(default)]
    pub subtract_fee: bool,
    /// Network name or alias; livenet when absent.
    #[serde(default)]
    pub network: Option<String>,
}

/// A signed transaction and how its value was split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
    pub tx_hex: String,
    pub txid: String,
    /// Amount the recipient receives.
    pub amount_sat: u64,
    /// Miner fee including any absorbed dust change.
    pub fee_sat: u64,
    pub dev_fee_sat: u64,
    pub change_sat: u64,
    pub inputs: usize,
}

/// A generated key in the coin's formats.
#[derive(Debug)]
pub struct KeyPair {
    pub wif: SecretString,
    pub address: String,
}

/// Public description of a supported coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinSummary {
    pub ticker: String,
    pub name: String,
    pub color: String,
    pub networks: Vec<String>,
    pub fee_min_sat: u64,
    pub fee_max_sat: u64,
    pub dev_fee: DevFeeRule,
}

impl From<&CoinSpec> for CoinSummary {
    fn from(spec: &CoinSpec) -> Self {
        CoinSummary {
            ticker: spec.ticker.clone(),
            name: spec.name.clone(),
            color: spec.color.clone(),
            networks: spec.networks.iter().map(|n| n.name.clone()).collect(),
            fee_min_sat: spec.fee_min_sat,
            fee_max_sat: spec.fee_max_sat,
            dev_fee: spec.dev_fee.clone(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::new)
}
