use bitcoin::hashes::Hash;
use bitcoin::{PubkeyHash, ScriptBuf, ScriptHash};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::UtxoError;
use crate::network::NetworkParams;

/// Length of a decoded base58check address payload: version + 20-byte hash.
const ADDRESS_PAYLOAD_LEN: usize = 21;

/// Compute Hash160 (RIPEMD-160(SHA-256(data))).
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    P2pkh,
    P2sh,
}

/// A decoded legacy address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub kind: AddressKind,
    pub version: u8,
    pub hash: [u8; 20],
}

impl Address {
    /// Build an address of `kind` for `hash` using the network's version bytes.
    pub fn new(kind: AddressKind, hash: [u8; 20], params: &NetworkParams) -> Self {
        let version = match kind {
            AddressKind::P2pkh => params.pubkeyhash,
            AddressKind::P2sh => params.scripthash,
        };
        Address { kind, version, hash }
    }

    /// Base58check string form.
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(ADDRESS_PAYLOAD_LEN);
        payload.push(self.version);
        payload.extend_from_slice(&self.hash);
        bs58::encode(payload).with_check().into_string()
    }

    /// The locking script paying to this address.
    pub fn script_pubkey(&self) -> ScriptBuf {
        match self.kind {
            AddressKind::P2pkh => ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(self.hash)),
            AddressKind::P2sh => ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(self.hash)),
        }
    }
}

/// Derive the P2PKH address for a serialized public key (33 or 65 bytes).
pub fn pubkey_to_address(pubkey: &[u8], params: &NetworkParams) -> Result<String, UtxoError> {
    match pubkey.len() {
        33 if pubkey[0] == 0x02 || pubkey[0] == 0x03 => {}
        65 if pubkey[0] == 0x04 => {}
        n => {
            return Err(UtxoError::InvalidPublicKey(format!(
                "unexpected public key encoding ({n} bytes)"
            )))
        }
    }
    Ok(Address::new(AddressKind::P2pkh, hash160(pubkey), params).encode())
}

/// Split a base58check address into its version byte and hash.
fn decode_payload(address: &str) -> Result<(u8, [u8; 20]), UtxoError> {
    if address.is_empty() {
        return Err(UtxoError::InvalidAddress("address is empty".into()));
    }
    let decoded = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|e| UtxoError::InvalidAddress(format!("invalid base58check: {e}")))?;

    if decoded.len() != ADDRESS_PAYLOAD_LEN {
        return Err(UtxoError::InvalidAddress(format!(
            "expected {ADDRESS_PAYLOAD_LEN} bytes, got {}",
            decoded.len()
        )));
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&decoded[1..]);
    Ok((decoded[0], hash))
}

/// Decode an address and require that it belongs to `params`.
pub fn decode(address: &str, params: &NetworkParams) -> Result<Address, UtxoError> {
    let (version, hash) = decode_payload(address)?;
    let kind = if version == params.pubkeyhash {
        AddressKind::P2pkh
    } else if version == params.scripthash {
        AddressKind::P2sh
    } else {
        return Err(UtxoError::InvalidAddress(format!(
            "version byte 0x{version:02x} does not belong to network {}",
            params.name
        )));
    };
    Ok(Address { kind, version, hash })
}

/// Validate an address string for the given network.
///
/// Returns `false` for a well-formed address of another network; malformed
/// input is an error.
pub fn validate_address(address: &str, params: &NetworkParams) -> Result<bool, UtxoError> {
    let (version, _) = decode_payload(address)?;
    Ok(version == params.pubkeyhash || version == params.scripthash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::CoinNetwork;

    // privkey = 1 -> compressed pubkey
    const TEST_PUBKEY_HEX: &str =
        "0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798";

    fn test_pubkey() -> Vec<u8> {
        hex::decode(TEST_PUBKEY_HEX).unwrap()
    }

    #[test]
    fn hash160_known_vector() {
        assert_eq!(
            hex::encode(hash160(&test_pubkey())),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn known_addresses_per_coin() {
        let cases = [
            (CoinNetwork::Xbt, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            (CoinNetwork::Doge, "DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLE"),
            (CoinNetwork::Gemma, "GUXByHDZLvU4DnVH9imSFckt3HEQ5cFgE5"),
            (CoinNetwork::Pep, "Pic3hEak8AopwazqbGmAysf3NMsNp76pUa"),
            (CoinNetwork::Flop, "FGWP1xKhDP5RmV525TmUoEwX9mTZwp3sJn"),
            (CoinNetwork::Bbq, "bPQYFPE6iQFEfA3MJSRR3WYrczLjWVjiWG"),
            (CoinNetwork::Lky, "L6ZcqFu9jYdwagk4NVmJckCxhpYtTGicG8"),
            (CoinNetwork::Trmp, "TLeUZDGLWnyiJVFcp3m3M1782uBsGWa8uf"),
        ];
        for (coin, expected) in cases {
            let addr = pubkey_to_address(&test_pubkey(), &coin.livenet()).unwrap();
            assert_eq!(addr, expected, "{coin}");
        }
    }

    #[test]
    fn doge_testnet_address() {
        let net = CoinNetwork::Doge.get("testnet").unwrap();
        let addr = pubkey_to_address(&test_pubkey(), &net).unwrap();
        assert_eq!(addr, "nesRpRaAbTDmZHwmzBkLd2AtF7Z9L9z5S2");
    }

    #[test]
    fn uncompressed_prefix_with_wrong_length_rejected() {
        let mut bad = test_pubkey();
        bad[0] = 0x04;
        assert!(pubkey_to_address(&bad, &CoinNetwork::Doge.livenet()).is_err());
    }

    #[test]
    fn decode_p2pkh_roundtrip() {
        let net = CoinNetwork::Pep.livenet();
        let addr = decode("PjH3mdGxpJwuEMP9oeieXf47ygNDEhT2ij", &net).unwrap();
        assert_eq!(addr.kind, AddressKind::P2pkh);
        assert_eq!(addr.version, 0x38);
        assert_eq!(addr.encode(), "PjH3mdGxpJwuEMP9oeieXf47ygNDEhT2ij");
    }

    #[test]
    fn decode_p2sh() {
        let net = CoinNetwork::Xbt.livenet();
        let addr = decode("3CNHUhP3uyB9EUtRLsmvFUmvGdjGdkTxJw", &net).unwrap();
        assert_eq!(addr.kind, AddressKind::P2sh);
        assert!(addr.script_pubkey().is_p2sh());
    }

    #[test]
    fn p2pkh_script_shape() {
        let net = CoinNetwork::Doge.livenet();
        let addr = decode("DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLE", &net).unwrap();
        let script = addr.script_pubkey();
        assert!(script.is_p2pkh());
        assert_eq!(
            hex::encode(script.as_bytes()),
            "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac"
        );
    }

    #[test]
    fn decode_wrong_network_fails() {
        let net = CoinNetwork::Doge.livenet();
        let result = decode("PjH3mdGxpJwuEMP9oeieXf47ygNDEhT2ij", &net);
        assert!(matches!(result, Err(UtxoError::InvalidAddress(_))));
    }

    #[test]
    fn validate_known_fork_addresses() {
        let gemma = CoinNetwork::Gemma.livenet();
        assert!(validate_address("GXm5E26AemfunwcVm6cJUL13GCK7VhhVhS", &gemma).unwrap());
        let flop = CoinNetwork::Flop.livenet();
        assert!(validate_address("FPsGHvtackmeypdeddhEBpFg6u1KwqXqAc", &flop).unwrap());
    }

    #[test]
    fn validate_other_network_returns_false() {
        let doge = CoinNetwork::Doge.livenet();
        assert!(!validate_address("1Hjtk8fVKB1ZkeQwE2Eos3Ph6LZyooKszk", &doge).unwrap());
    }

    #[test]
    fn validate_bad_checksum_is_error() {
        let doge = CoinNetwork::Doge.livenet();
        // Last character altered.
        let result = validate_address("DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLF", &doge);
        assert!(result.is_err());
    }

    #[test]
    fn validate_garbage_and_empty() {
        let doge = CoinNetwork::Doge.livenet();
        assert!(validate_address("notanaddress!!!", &doge).is_err());
        assert!(validate_address("", &doge).is_err());
    }
}
