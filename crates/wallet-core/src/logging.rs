//! Logging setup for the wallet.
//!
//! Library code only uses the `log` macros. Binaries call [`init`] once to
//! install an `env_logger` backend; `RUST_LOG` still overrides the configured
//! level. Private keys are never logged, and addresses and txids should go
//! through [`sanitize_for_logging`] at `info` level and above.

use std::io::Write;
use std::sync::Once;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(WalletError::Config(format!("unknown log level '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    /// One JSON object per line instead of the human-readable format.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            json: false,
        }
    }
}

static LOGGING_INIT: Once = Once::new();

/// Install the global logger. Later calls are no-ops.
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init(config: &LogConfig) -> Result<(), WalletError> {
    let mut result = Ok(());
    let json_format = config.json;
    let level = config.level;

    LOGGING_INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level.into());
        builder.parse_default_env();
        builder.target(env_logger::Target::Stderr);

        if json_format {
            builder.format(|buf, record| {
                let line = json!({
                    "timestamp": buf.timestamp().to_string(),
                    "level": record.level().to_string(),
                    "target": record.target(),
                    "message": record.args().to_string(),
                });
                writeln!(buf, "{line}")
            });
        }

        if let Err(e) = builder.try_init() {
            result = Err(WalletError::Internal(format!("logger init failed: {e}")));
        }
    });

    result
}

/// Keep the first and last four characters of an address or txid.
pub fn sanitize_for_logging(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    match chars.len() {
        0 => String::new(),
        1..=8 => "*****".to_string(),
        n => {
            let first: String = chars[..4].iter().collect();
            let last: String = chars[n - 4..].iter().collect();
            format!("{first}...{last}")
        }
    }
}
