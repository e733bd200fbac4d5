//! Validate a send request and turn it into a signed transaction.

use std::collections::HashSet;

use chain_utxo::address::{decode, pubkey_to_address};
use chain_utxo::amount::{coins_to_sat, sat_to_coins_string};
use chain_utxo::dev_fee::DevFee;
use chain_utxo::network::NetworkParams;
use chain_utxo::plan::SpendPlan;
use chain_utxo::transaction::{build_transaction, estimate_size, serialize_hex, sign_transaction};
use chain_utxo::utxo::{filter_spendable, total_value, SpendFilter, Utxo};
use chain_utxo::wif::{decode_wif, DecodedWif};
use chain_utxo::UtxoError;
use log::{debug, info, warn};

use crate::coins::{CoinRegistry, CoinSpec};
use crate::error::WalletError;
use crate::logging::sanitize_for_logging;
use crate::types::{TxRequest, TxResult, UtxoEntry, WalletData};

/// Build, sign and serialize the transaction described by `request`.
pub fn generate_transaction_hex(
    registry: &CoinRegistry,
    filter: &SpendFilter,
    request: &TxRequest,
) -> Result<TxResult, WalletError> {
    let wallet = &request.wallet_data;
    let coin = registry.get(&wallet.ticker)?;
    let params = coin.network(request.network.as_deref())?;
    if let Some(magic) = params.magic_bytes() {
        debug!("{} {} (magic {})", coin.ticker, params.name, hex::encode(magic));
    }

    check_wallet_fields(wallet)?;
    let utxos = parse_utxos(&wallet.utxos)?;

    if request.receiving_address.trim().is_empty() {
        return Err(WalletError::Validation("receiving address is empty".into()));
    }
    let recipient = request.receiving_address.trim();
    decode(recipient, params)
        .map_err(|e| WalletError::InvalidAddress(format!("receiving address: {e}")))?;

    let amount_sat = send_amount(request)?;
    coin.check_fee(request.fee)?;
    let dev_fee = dev_fee_for(coin, params, amount_sat)?;

    let required = amount_sat
        .checked_add(request.fee)
        .and_then(|v| v.checked_add(dev_fee.amount_sat))
        .ok_or_else(|| WalletError::Validation("amount + fee overflows".into()))?;
    let available = total_value(&utxos)?;
    if available < required {
        return Err(WalletError::InsufficientFunds {
            available,
            required,
            dev_fee_sat: dev_fee.amount_sat,
        });
    }

    let key = key_for_wallet(wallet, params)?;

    let spendable = filter_spendable(&utxos, filter);
    if spendable.is_empty() {
        warn!("no UTXO passes the spend filter");
        return Err(WalletError::InsufficientFunds {
            available: 0,
            required,
            dev_fee_sat: dev_fee.amount_sat,
        });
    }

    let dev_fee_sat = dev_fee.amount_sat;
    let plan = SpendPlan::new(
        &spendable,
        recipient,
        amount_sat,
        request.fee,
        dev_fee,
        &wallet.address,
        coin.change_dust_sat,
    )
    .map_err(|e| match e {
        UtxoError::InsufficientFunds {
            available,
            required,
        } => WalletError::InsufficientFunds {
            available,
            required,
            dev_fee_sat,
        },
        other => other.into(),
    })?;

    let size = estimate_size(plan.selection.selected.len(), plan.outputs.len());
    if plan.effective_fee_sat() < size {
        warn!(
            "fee of {} sat is below 1 sat/byte for a ~{size} byte transaction",
            plan.effective_fee_sat()
        );
    }

    let unsigned = build_transaction(&plan, params)?;
    let signed = sign_transaction(&unsigned, &key)?;
    let tx_hex = serialize_hex(&signed);
    let txid = signed.compute_txid().to_string();

    info!(
        "signed {} tx {}: {} {} to recipient, {} inputs, {} outputs",
        coin.ticker,
        sanitize_for_logging(&txid),
        sat_to_coins_string(amount_sat),
        coin.ticker,
        signed.input.len(),
        signed.output.len()
    );

    Ok(TxResult {
        tx_hex,
        txid,
        amount_sat,
        fee_sat: plan.effective_fee_sat(),
        dev_fee_sat: plan.dev_fee.amount_sat,
        change_sat: plan.change_sat,
        inputs: plan.selection.selected.len(),
    })
}

fn check_wallet_fields(wallet: &WalletData) -> Result<(), WalletError> {
    if wallet.address.trim().is_empty() {
        return Err(WalletError::Validation("wallet address is empty".into()));
    }
    if wallet.privkey.is_empty() {
        return Err(WalletError::Validation("wallet private key is empty".into()));
    }
    if wallet.utxos.is_empty() {
        return Err(WalletError::Validation("UTXOs must be a non-empty list".into()));
    }
    Ok(())
}

/// Convert explorer UTXO entries, rejecting the first malformed or repeated one.
pub fn parse_utxos(entries: &[UtxoEntry]) -> Result<Vec<Utxo>, WalletError> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut utxos = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let utxo = parse_utxo(index, entry)?;
        if !seen.insert((utxo.txid.clone(), utxo.vout)) {
            return Err(UtxoError::InvalidUtxo {
                index,
                reason: "duplicates an earlier txid:vout".into(),
            }
            .into());
        }
        utxos.push(utxo);
    }
    Ok(utxos)
}

fn parse_utxo(index: usize, entry: &UtxoEntry) -> Result<Utxo, UtxoError> {
    let invalid = |reason: &str| UtxoError::InvalidUtxo {
        index,
        reason: reason.to_string(),
    };

    if entry.txid.is_empty() {
        return Err(invalid("missing txid"));
    }
    if entry.txid.len() != 64 || !entry.txid.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("has a malformed txid"));
    }
    let vout = entry.vout.ok_or_else(|| invalid("missing or invalid vout"))?;
    let value = entry
        .value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| invalid("missing or invalid value"))?;
    if entry.script_hex.is_empty() {
        return Err(invalid("missing script_hex"));
    }
    let script_pubkey =
        hex::decode(&entry.script_hex).map_err(|_| invalid("has a malformed script_hex"))?;
    let value_sat = coins_to_sat(value).map_err(|e| invalid(&format!("has an invalid value: {e}")))?;

    Ok(Utxo {
        txid: entry.txid.to_ascii_lowercase(),
        vout,
        value_sat,
        script_pubkey,
        confirmations: entry.confirmations,
    })
}

fn send_amount(request: &TxRequest) -> Result<u64, WalletError> {
    if request.amount == 0 {
        return Err(WalletError::Validation("amount must be greater than zero".into()));
    }
    if !request.subtract_fee {
        return Ok(request.amount);
    }
    match request.amount.checked_sub(request.fee) {
        Some(net) if net > 0 => {
            debug!("fee subtracted from amount: {} -> {net} sat", request.amount);
            Ok(net)
        }
        _ => Err(WalletError::Validation(format!(
            "amount {} does not cover the fee {} it should be subtracted from",
            request.amount, request.fee
        ))),
    }
}

/// Developer fees only apply on livenet; their addresses do not exist elsewhere.
fn dev_fee_for(coin: &CoinSpec, params: &NetworkParams, amount_sat: u64) -> Result<DevFee, WalletError> {
    if !params.is_livenet() {
        return Ok(DevFee::none());
    }
    let dev_fee = coin.dev_fee.compute(amount_sat)?;
    if dev_fee.included() {
        debug!(
            "{} developer fee: {} {}",
            coin.ticker,
            sat_to_coins_string(dev_fee.amount_sat),
            coin.ticker
        );
    }
    Ok(dev_fee)
}

/// Decode the wallet's WIF and check it controls the wallet address.
fn key_for_wallet(wallet: &WalletData, params: &NetworkParams) -> Result<DecodedWif, WalletError> {
    let key = decode_wif(wallet.privkey.expose(), params)?;
    let derived = pubkey_to_address(&key.public_key()?.to_bytes(), params)?;
    if derived != wallet.address.trim() {
        return Err(WalletError::InvalidPrivateKey(format!(
            "private key does not match wallet address. Derived: {derived}, Expected: {}",
            wallet.address.trim()
        )));
    }
    Ok(key)
}
