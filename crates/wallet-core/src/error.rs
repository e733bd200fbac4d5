use chain_utxo::UtxoError;
use crypto_utils::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported coin: {0}")]
    UnsupportedCoin(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error(
        "Insufficient funds. Available: {available} satoshis, Required: {required} satoshis{}",
        dev_fee_note(.dev_fee_sat)
    )]
    InsufficientFunds {
        available: u64,
        required: u64,
        dev_fee_sat: u64,
    },

    #[error("Developer fee rejected: {0}")]
    DevFeeRejected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn dev_fee_note(dev_fee_sat: &u64) -> String {
    if *dev_fee_sat > 0 {
        format!(" (including {dev_fee_sat} satoshi dev fee)")
    } else {
        String::new()
    }
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        WalletError::Internal(e.to_string())
    }
}

impl From<UtxoError> for WalletError {
    fn from(e: UtxoError) -> Self {
        match e {
            UtxoError::InvalidPrivateKey(msg) => WalletError::InvalidPrivateKey(msg),
            UtxoError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            UtxoError::InvalidAmount(msg) => WalletError::Validation(msg),
            UtxoError::InvalidUtxo { .. } => WalletError::Validation(e.to_string()),
            UtxoError::InsufficientFunds {
                available,
                required,
            } => WalletError::InsufficientFunds {
                available,
                required,
                dev_fee_sat: 0,
            },
            UtxoError::DevFeeRejected(msg) => WalletError::DevFeeRejected(msg),
            UtxoError::SigningError(msg) => WalletError::SigningFailed(msg),
            UtxoError::UnknownNetwork(msg) => WalletError::UnsupportedCoin(msg),
            UtxoError::InvalidPublicKey(_) | UtxoError::TransactionBuildError(_) => {
                WalletError::TransactionFailed(e.to_string())
            }
        }
    }
}

impl From<toml::de::Error> for WalletError {
    fn from(e: toml::de::Error) -> Self {
        WalletError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_mentions_dev_fee_when_present() {
        let err = WalletError::InsufficientFunds {
            available: 1_000,
            required: 2_500,
            dev_fee_sat: 500,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds. Available: 1000 satoshis, Required: 2500 satoshis \
             (including 500 satoshi dev fee)"
        );
    }

    #[test]
    fn insufficient_funds_without_dev_fee() {
        let err = WalletError::InsufficientFunds {
            available: 1_000,
            required: 2_000,
            dev_fee_sat: 0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds. Available: 1000 satoshis, Required: 2000 satoshis"
        );
    }

    #[test]
    fn utxo_errors_map_to_wallet_errors() {
        let err: WalletError = UtxoError::InvalidUtxo {
            index: 2,
            reason: "missing txid".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid request: UTXO 2 missing txid");

        let err: WalletError = UtxoError::DevFeeRejected("too small".into()).into();
        assert!(matches!(err, WalletError::DevFeeRejected(_)));

        let err: WalletError = UtxoError::InsufficientFunds {
            available: 1,
            required: 2,
        }
        .into();
        assert!(matches!(
            err,
            WalletError::InsufficientFunds { dev_fee_sat: 0, .. }
        ));
    }

    #[test]
    fn crypto_errors_are_internal() {
        let err: WalletError = CryptoError::RandomnessUnavailable("no entropy".into()).into();
        assert!(matches!(err, WalletError::Internal(_)));
    }
}
