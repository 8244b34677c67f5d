use std::cmp::Ordering;

use crate::error::{AppError, AppResult};

use super::features::WalletFeatures;

/// Upper bound of the published credit score range.
pub const MAX_SCORE: f64 = 1000.0;

/// Coefficients of the raw credit score formula. Fixed policy, not runtime
/// configurable; tests substitute their own set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub num_deposit: f64,
    pub num_repay: f64,
    pub num_borrow: f64,
    pub liquidation_count: f64,
    pub borrow_to_repay_ratio: f64,
    pub net_balance_change: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            num_deposit: 2.0,
            num_repay: 2.0,
            num_borrow: -1.5,
            liquidation_count: -10.0,
            borrow_to_repay_ratio: -5.0,
            net_balance_change: 0.001,
        }
    }
}

impl ScoreWeights {
    pub fn raw_score(&self, features: &WalletFeatures) -> f64 {
        features.deposit.count as f64 * self.num_deposit
            + features.repay.count as f64 * self.num_repay
            + features.borrow.count as f64 * self.num_borrow
            + features.liquidation_count as f64 * self.liquidation_count
            + features.borrow_to_repay_ratio * self.borrow_to_repay_ratio
            + features.net_balance_change * self.net_balance_change
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredWallet {
    pub wallet: Option<String>,
    pub credit_score: f64,
}

/// Score the whole wallet population and rank it descending.
///
/// Min-max rescaling is population-relative, so the complete feature table
/// must be in hand before any score is produced. An empty table is a caller
/// mistake and comes back as an error rather than an empty ranking.
pub fn score_wallets(
    features: &[WalletFeatures],
    weights: &ScoreWeights,
) -> AppResult<Vec<ScoredWallet>> {
    if features.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let raw: Vec<f64> = features.iter().map(|f| weights.raw_score(f)).collect();
    let rescaled = min_max_rescale(&raw);

    let mut scored: Vec<ScoredWallet> = features
        .iter()
        .zip(rescaled)
        .map(|(f, credit_score)| ScoredWallet {
            wallet: f.wallet.clone(),
            credit_score,
        })
        .collect();

    // Stable sort keeps first-seen wallet order on ties.
    scored.sort_by(|a, b| {
        b.credit_score
            .partial_cmp(&a.credit_score)
            .unwrap_or(Ordering::Equal)
    });

    Ok(scored)
}

/// Linear map of raw scores onto [0, MAX_SCORE]. When every score is
/// identical the scale is degenerate and the whole population maps to 0.
fn min_max_rescale(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    raw.iter()
        .map(|&r| {
            if span > 0.0 {
                (r - min) / span * MAX_SCORE
            } else {
                0.0
            }
        })
        .collect()
}
