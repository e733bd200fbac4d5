use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::script::{Builder, PushBytesBuf, ScriptBuf};
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use log::debug;

use crate::address::{decode, hash160};
use crate::error::UtxoError;
use crate::network::NetworkParams;
use crate::plan::SpendPlan;
use crate::wif::DecodedWif;

/// Size of a signed P2PKH input with a compressed key (worst-case signature).
const P2PKH_INPUT_BYTES: u64 = 148;

/// Size of a P2PKH/P2SH output.
const OUTPUT_BYTES: u64 = 34;

/// Version, lock time and the two count varints.
const TX_OVERHEAD_BYTES: u64 = 10;

/// An unsigned legacy transaction ready for signing.
#[derive(Debug, Clone)]
pub struct UnsignedTx {
    /// Transaction with empty scriptSigs.
    pub tx: Transaction,
    /// The outputs being spent, in input order. Their scripts feed the sighash.
    pub prevouts: Vec<TxOut>,
}

/// Estimated serialized size of a P2PKH transaction with compressed keys.
pub fn estimate_size(num_inputs: usize, num_outputs: usize) -> u64 {
    TX_OVERHEAD_BYTES + num_inputs as u64 * P2PKH_INPUT_BYTES + num_outputs as u64 * OUTPUT_BYTES
}

/// Turn a spend plan into an unsigned version-1 transaction.
///
/// Every output address must belong to `params`.
pub fn build_transaction(plan: &SpendPlan, params: &NetworkParams) -> Result<UnsignedTx, UtxoError> {
    let mut inputs = Vec::with_capacity(plan.selection.selected.len());
    let mut prevouts = Vec::with_capacity(plan.selection.selected.len());

    for utxo in &plan.selection.selected {
        let txid: Txid = utxo
            .txid
            .parse()
            .map_err(|e| UtxoError::TransactionBuildError(format!("invalid txid {}: {e}", utxo.txid)))?;

        inputs.push(TxIn {
            previous_output: OutPoint::new(txid, utxo.vout),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::default(),
        });

        prevouts.push(TxOut {
            value: Amount::from_sat(utxo.value_sat),
            script_pubkey: ScriptBuf::from(utxo.script_pubkey.clone()),
        });
    }

    let mut outputs = Vec::with_capacity(plan.outputs.len());
    for planned in &plan.outputs {
        let address = decode(&planned.address, params).map_err(|e| {
            UtxoError::InvalidAddress(format!("{:?} output {}: {e}", planned.role, planned.address))
        })?;
        outputs.push(TxOut {
            value: Amount::from_sat(planned.amount_sat),
            script_pubkey: address.script_pubkey(),
        });
    }

    let tx = Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input: inputs,
        output: outputs,
    };

    debug!(
        "built unsigned tx: {} inputs, {} outputs, ~{} bytes",
        tx.input.len(),
        tx.output.len(),
        estimate_size(tx.input.len(), tx.output.len())
    );

    Ok(UnsignedTx { tx, prevouts })
}

/// Sign every input of a P2PKH transaction with `key`, SIGHASH_ALL.
///
/// Each spent output must be a P2PKH script locked to `key`.
pub fn sign_transaction(unsigned: &UnsignedTx, key: &DecodedWif) -> Result<Transaction, UtxoError> {
    if unsigned.prevouts.len() != unsigned.tx.input.len() {
        return Err(UtxoError::SigningError(format!(
            "{} prevouts for {} inputs",
            unsigned.prevouts.len(),
            unsigned.tx.input.len()
        )));
    }

    let secp = Secp256k1::new();
    let secret_key = key.secret_key()?;
    let public_key = key.public_key()?;
    let key_hash = hash160(&public_key.to_bytes());

    let cache = SighashCache::new(&unsigned.tx);
    let mut signed_tx = unsigned.tx.clone();

    for (input_index, prevout) in unsigned.prevouts.iter().enumerate() {
        let script = &prevout.script_pubkey;
        if !script.is_p2pkh() {
            return Err(UtxoError::SigningError(format!(
                "input {input_index} does not spend a P2PKH output"
            )));
        }
        // OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
        if script.as_bytes()[3..23] != key_hash {
            return Err(UtxoError::SigningError(format!(
                "input {input_index} is not locked to the signing key"
            )));
        }

        let sighash = cache
            .legacy_signature_hash(input_index, script, EcdsaSighashType::All.to_u32())
            .map_err(|e| UtxoError::SigningError(format!("sighash computation failed: {e}")))?;

        let msg = Message::from_digest(sighash.to_byte_array());
        let signature = bitcoin::ecdsa::Signature {
            signature: secp.sign_ecdsa(&msg, &secret_key),
            sighash_type: EcdsaSighashType::All,
        };

        let sig_push = PushBytesBuf::try_from(signature.to_vec())
            .map_err(|e| UtxoError::SigningError(format!("signature push: {e}")))?;

        signed_tx.input[input_index].script_sig = Builder::new()
            .push_slice(sig_push)
            .push_key(&public_key)
            .into_script();
    }

    Ok(signed_tx)
}

/// Raw transaction hex, as broadcast.
pub fn serialize_hex(tx: &Transaction) -> String {
    bitcoin::consensus::encode::serialize_hex(tx)
}
