use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use serde_json::{json, Value};
use wallet_core::config::CONFIG_ENV_VAR;
use wallet_core::logging::{self, LogLevel};
use wallet_core::{Wallet, WalletConfig};

#[derive(Parser)]
#[command(name = "txhex")]
#[command(about = "Build signed transactions and keys for Dogecoin-family wallets")]
#[command(version)]
pub struct Cli {
    /// TOML config file
    #[arg(long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Log level, overriding the config file (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign a send request (JSON) and print the transaction hex
    Tx {
        /// Request file; stdin when omitted
        #[arg(long)]
        request: Option<PathBuf>,
    },
    /// Generate a new private key and address
    Keygen {
        /// Coin ticker, e.g. DOGE
        ticker: String,
        /// Network name (livenet when omitted)
        #[arg(long)]
        network: Option<String>,
    },
    /// List supported coins
    Coins,
    /// Check that an address belongs to a coin
    Validate {
        ticker: String,
        address: String,
        #[arg(long)]
        network: Option<String>,
    },
}

pub fn run_cli() -> Result<Value> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WalletConfig::load(path)?,
        None => WalletConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    logging::init(&config.logging)?;
    if let Some(path) = &cli.config {
        debug!("using config {}", path.display());
    }

    let wallet = Wallet::from_config(&config)?;
    run_command(&wallet, cli.command)
}

fn run_command(wallet: &Wallet, command: Commands) -> Result<Value> {
    match command {
        Commands::Tx { request } => {
            let body = read_request(request.as_ref())?;
            let result = wallet.generate_transaction_hex_json(&body)?;
            Ok(serde_json::to_value(result)?)
        }
        Commands::Keygen { ticker, network } => {
            let key = wallet.generate_key(&ticker, network.as_deref())?;
            Ok(json!({ "wif": key.wif.expose(), "address": key.address }))
        }
        Commands::Coins => Ok(serde_json::to_value(wallet.list_coins())?),
        Commands::Validate {
            ticker,
            address,
            network,
        } => {
            let valid = wallet.validate_address(&ticker, &address, network.as_deref())?;
            Ok(json!({ "ticker": ticker.to_uppercase(), "address": address, "valid": valid }))
        }
    }
}

fn read_request(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display())),
        None => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("failed to read request from stdin")?;
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_and_subcommand() {
        let cli = Cli::try_parse_from([
            "txhex",
            "--log-level",
            "debug",
            "keygen",
            "DOGE",
            "--network",
            "testnet",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        match cli.command {
            Commands::Keygen { ticker, network } => {
                assert_eq!(ticker, "DOGE");
                assert_eq!(network.as_deref(), Some("testnet"));
            }
            _ => panic!("expected keygen"),
        }
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["txhex", "--log-level", "loud", "coins"]).is_err());
    }

    #[test]
    fn keygen_prints_wif_and_address() {
        let wallet = Wallet::default();
        let out = run_command(
            &wallet,
            Commands::Keygen {
                ticker: "pep".into(),
                network: None,
            },
        )
        .unwrap();
        let address = out["address"].as_str().unwrap();
        assert!(address.starts_with('P'));
        assert!(out["wif"].as_str().is_some());
    }

    #[test]
    fn validate_reports_result() {
        let wallet = Wallet::default();
        let out = run_command(
            &wallet,
            Commands::Validate {
                ticker: "doge".into(),
                address: "DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLE".into(),
                network: None,
            },
        )
        .unwrap();
        assert_eq!(out["valid"], true);
        assert_eq!(out["ticker"], "DOGE");
    }

    #[test]
    fn tx_from_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        let body = json!({
            "walletData": {
                "ticker": "DOGE",
                "address": "DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLE",
                "privkey": "QNcdLVw8fHkixm6NNyN6nVwxKek4u7qrioRbQmjxac5TVoTtZuot",
                "utxos": [{
                    "txid": "ef".repeat(32),
                    "vout": 0,
                    "value": 3.0,
                    "script_hex": "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac"
                }]
            },
            "receivingAddress": "D6hLULEGDRbk86j58t5iWmeinqM6acA16V",
            "amount": 100000000,
            "fee": 1000000
        });
        fs::write(&path, body.to_string()).unwrap();

        let out = run_command(&Wallet::default(), Commands::Tx { request: Some(path) }).unwrap();
        assert!(out["txHex"].as_str().unwrap().starts_with("01000000"));
        assert_eq!(out["changeSat"], 300_000_000u64 - 100_000_000 - 1_000_000);
    }

    #[test]
    fn wallet_errors_propagate() {
        let err = run_command(
            &Wallet::default(),
            Commands::Keygen {
                ticker: "ETH".into(),
                network: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("ETH"));
    }
}
