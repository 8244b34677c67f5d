use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Path to the JSON array of raw ledger events.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub csv_path: String,
    pub preview_rows: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("ledger.path", "user-wallet-transactions.json")?
            .set_default("report.csv_path", "wallet_credit_scores.csv")?
            .set_default("report.preview_rows", 10)?
            // Load from config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (CREDIT__LEDGER__PATH, etc.)
            .add_source(
                Environment::with_prefix("CREDIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
