use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::error::{AppError, AppResult};
use crate::metrics::{aggregate, score_wallets, ScoreWeights, ScoredWallet};
use crate::normalize::normalize;
use crate::types::RawEvent;

/// Read a JSON array of raw ledger events from disk.
pub fn load_events(path: &Path) -> AppResult<Vec<RawEvent>> {
    let data = fs::read_to_string(path)?;
    let events: Vec<RawEvent> = serde_json::from_str(&data)?;
    tracing::info!(path = %path.display(), events = events.len(), "Loaded ledger events");
    Ok(events)
}

/// Run the full scoring pipeline over an in-memory event collection.
///
/// Batch only: min-max rescaling is population-relative, so aggregation must
/// finish for every wallet before any score exists. Each stage consumes its
/// input and returns a fresh collection.
pub fn run(events: &[RawEvent]) -> AppResult<Vec<ScoredWallet>> {
    let start = Instant::now();

    if events.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let transactions = normalize(events);
    tracing::info!(transactions = transactions.len(), "Normalized raw events");

    let features = aggregate(&transactions);
    tracing::info!(wallets = features.len(), "Aggregated wallet features");

    let scored = score_wallets(&features, &ScoreWeights::default())?;
    tracing::info!(
        wallets = scored.len(),
        duration_ms = %start.elapsed().as_millis(),
        "Scored wallet population"
    );

    Ok(scored)
}
