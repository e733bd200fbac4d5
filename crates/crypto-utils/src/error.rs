use thiserror::Error;

/// Errors from secret handling and randomness.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}
