//! Storefront configuration

use std::path::PathBuf;

use clap::Args;
use rusty_money::{Findable, iso::Currency};
use thiserror::Error;

use crate::store::DEFAULT_STORAGE_KEY;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "TROLLEY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Storefront settings.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "TROLLEY_DATA_DIR", default_value = ".trolley")]
    pub data_dir: PathBuf,

    /// Catalog YAML file
    #[arg(long, env = "TROLLEY_CATALOG", default_value = "fixtures/catalog.yml")]
    pub catalog: PathBuf,

    /// Storage key the cart is persisted under
    #[arg(long, env = "TROLLEY_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// ISO 4217 code of the display currency
    #[arg(long, env = "TROLLEY_CURRENCY", default_value = "BRL")]
    pub currency: String,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Resolves the configured currency code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not an ISO currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        resolve_currency(&self.currency)
    }
}

/// Looks up an ISO 4217 currency by code, ignoring case.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] if no currency has that code.
pub fn resolve_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| ConfigError::UnknownCurrency(code.to_string()))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rusty_money::iso::{BRL, EUR};
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: StorefrontConfig,
    }

    #[test]
    fn resolves_known_codes_case_insensitively() -> TestResult {
        assert_eq!(resolve_currency("BRL")?, BRL);
        assert_eq!(resolve_currency(" eur ")?, EUR);

        Ok(())
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(
            resolve_currency("XYZ1"),
            Err(ConfigError::UnknownCurrency("XYZ1".to_string()))
        );
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let cli = TestCli::try_parse_from([
            "trolley",
            "--data-dir",
            "/tmp/carts",
            "--storage-key",
            "cart",
            "--currency",
            "eur",
            "--log-format",
            "json",
        ])?;

        assert_eq!(cli.config.data_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(cli.config.storage_key, "cart");
        assert_eq!(cli.config.currency()?, EUR);
        assert_eq!(cli.config.logging.log_format, LogFormat::Json);

        Ok(())
    }
}
