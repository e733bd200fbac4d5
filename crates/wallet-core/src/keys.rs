use chain_utxo::keygen::generate_keypair;
use log::info;

use crate::coins::CoinRegistry;
use crate::error::WalletError;
use crate::logging::sanitize_for_logging;
use crate::types::KeyPair;

/// Generate a new key for `ticker` on `network` (livenet by default).
pub fn generate_key(
    registry: &CoinRegistry,
    ticker: &str,
    network: Option<&str>,
) -> Result<KeyPair, WalletError> {
    let coin = registry.get(ticker)?;
    let params = coin.network(network)?;
    let generated = generate_keypair(params)?;
    info!(
        "generated {} {} address {}",
        coin.ticker,
        params.name,
        sanitize_for_logging(&generated.address)
    );
    Ok(KeyPair {
        wif: generated.wif,
        address: generated.address,
    })
}
