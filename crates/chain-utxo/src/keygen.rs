use bitcoin::secp256k1::SecretKey;
use crypto_utils::random::random_key_bytes;
use crypto_utils::SecretString;
use log::debug;

use crate::address::pubkey_to_address;
use crate::error::UtxoError;
use crate::network::NetworkParams;
use crate::wif::{encode_wif, public_key_for};

/// Attempts before giving up on drawing a valid scalar. A 32-byte draw is
/// out of range with probability ~2^-128, so hitting this means the RNG is broken.
const MAX_ATTEMPTS: usize = 8;

/// A freshly generated key in the coin's formats.
#[derive(Debug)]
pub struct GeneratedKey {
    /// Compressed WIF.
    pub wif: SecretString,
    pub address: String,
}

/// Generate a random compressed key pair for `params`.
pub fn generate_keypair(params: &NetworkParams) -> Result<GeneratedKey, UtxoError> {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_key_bytes()
            .map_err(|e| UtxoError::InvalidPrivateKey(format!("key generation failed: {e}")))?;
        let Ok(secret_key) = SecretKey::from_slice(candidate.as_bytes()) else {
            debug!("random bytes out of secp256k1 range, retrying");
            continue;
        };

        let public_key = public_key_for(&secret_key, true);
        let address = pubkey_to_address(&public_key.to_bytes(), params)?;
        let wif = encode_wif(candidate.as_bytes(), true, params);
        debug!("generated {} key for {}", params.name, address);
        return Ok(GeneratedKey { wif, address });
    }

    Err(UtxoError::InvalidPrivateKey(
        "could not draw a valid secp256k1 scalar".into(),
    ))
}
