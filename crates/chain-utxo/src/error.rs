use thiserror::Error;

/// UTXO chain operation errors.
#[derive(Debug, Error)]
pub enum UtxoError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("UTXO {index} {reason}")]
    InvalidUtxo { index: usize, reason: String },

    #[error("insufficient funds. Available: {available} satoshis, Required: {required} satoshis")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("developer fee rejected: {0}")]
    DevFeeRejected(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
