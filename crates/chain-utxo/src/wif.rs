use bitcoin::secp256k1::{Secp256k1, SecretKey};
use bitcoin::PublicKey;
use crypto_utils::{SecretBytes32, SecretString};
use zeroize::Zeroize;

use crate::error::UtxoError;
use crate::network::NetworkParams;

/// Suffix byte marking a WIF whose public key is compressed.
const COMPRESSED_FLAG: u8 = 0x01;

/// A private key recovered from its WIF encoding.
#[derive(Debug)]
pub struct DecodedWif {
    secret: SecretBytes32,
    pub compressed: bool,
}

impl DecodedWif {
    pub fn secret_bytes(&self) -> &[u8; 32] {
        self.secret.as_bytes()
    }

    pub fn secret_key(&self) -> Result<SecretKey, UtxoError> {
        SecretKey::from_slice(self.secret.as_bytes())
            .map_err(|e| UtxoError::InvalidPrivateKey(format!("not a valid secp256k1 scalar: {e}")))
    }

    /// The public key in the encoding the WIF asks for.
    pub fn public_key(&self) -> Result<PublicKey, UtxoError> {
        Ok(public_key_for(&self.secret_key()?, self.compressed))
    }
}

/// Derive the public key for `secret`, compressed or not.
pub fn public_key_for(secret: &SecretKey, compressed: bool) -> PublicKey {
    let secp = Secp256k1::signing_only();
    let inner = bitcoin::secp256k1::PublicKey::from_secret_key(&secp, secret);
    PublicKey { compressed, inner }
}

/// Encode a 32-byte secret as WIF using the network's private key version.
pub fn encode_wif(secret: &[u8; 32], compressed: bool, params: &NetworkParams) -> SecretString {
    let mut payload = Vec::with_capacity(34);
    payload.push(params.privatekey);
    payload.extend_from_slice(secret);
    if compressed {
        payload.push(COMPRESSED_FLAG);
    }
    let wif = bs58::encode(&payload).with_check().into_string();
    payload.zeroize();
    SecretString::new(wif)
}

/// Decode a WIF string, requiring the network's private key version byte.
pub fn decode_wif(wif: &str, params: &NetworkParams) -> Result<DecodedWif, UtxoError> {
    if wif.is_empty() {
        return Err(UtxoError::InvalidPrivateKey("private key is empty".into()));
    }

    let mut payload = bs58::decode(wif.trim())
        .with_check(None)
        .into_vec()
        .map_err(|e| UtxoError::InvalidPrivateKey(format!("invalid base58check: {e}")))?;

    let result = parse_payload(&payload, params);
    payload.zeroize();
    result
}

fn parse_payload(payload: &[u8], params: &NetworkParams) -> Result<DecodedWif, UtxoError> {
    let compressed = match payload.len() {
        33 => false,
        34 if payload[33] == COMPRESSED_FLAG => true,
        34 => {
            return Err(UtxoError::InvalidPrivateKey(format!(
                "unexpected compression flag 0x{:02x}",
                payload[33]
            )))
        }
        n => {
            return Err(UtxoError::InvalidPrivateKey(format!(
                "unexpected WIF payload length {n}"
            )))
        }
    };

    if payload[0] != params.privatekey {
        return Err(UtxoError::InvalidPrivateKey(format!(
            "version byte 0x{:02x} does not match network {} (expected 0x{:02x})",
            payload[0], params.name, params.privatekey
        )));
    }

    let secret = SecretBytes32::from_slice(&payload[1..33])
        .map_err(|e| UtxoError::InvalidPrivateKey(e.to_string()))?;
    Ok(DecodedWif { secret, compressed })
}
