//! # crypto-utils
//!
//! Secret-holding wrappers and OS randomness shared by the wallet crates.

pub mod error;
pub mod random;
pub mod secret;

pub use error::CryptoError;
pub use secret::{SecretBytes32, SecretString};
