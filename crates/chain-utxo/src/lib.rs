//! UTXO chain support for the DOGE-family forks served by the wallet.
//!
//! Provides per-coin network parameters, base58check P2PKH/P2SH addresses,
//! WIF keys, UTXO coin selection with developer-fee accounting, and legacy
//! transaction building and signing.

pub mod address;
pub mod amount;
pub mod dev_fee;
pub mod error;
pub mod keygen;
pub mod network;
pub mod plan;
pub mod transaction;
pub mod utxo;
pub mod wif;

pub use error::UtxoError;
