mod config;
mod error;
mod metrics;
mod normalize;
mod pipeline;
mod report;
mod types;

use std::fs;
use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

pub use crate::error::{AppError, AppResult};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_credit=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // A positional argument overrides the configured ledger path.
    let input: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.ledger.path.clone())
        .into();

    tracing::info!(
        input = %input.display(),
        output = %config.report.csv_path,
        "Starting credit scoring run"
    );

    let events = pipeline::load_events(&input)?;
    let scored = pipeline::run(&events)?;

    print!("{}", report::render_preview(&scored, config.report.preview_rows));

    fs::write(&config.report.csv_path, report::to_csv(&scored))?;
    println!("Scores saved to {}", config.report.csv_path);
    tracing::info!(
        wallets = scored.len(),
        path = %config.report.csv_path,
        "Wrote credit score table"
    );

    Ok(())
}
