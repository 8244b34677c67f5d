use std::fmt::Write as _;

use crate::metrics::ScoredWallet;

const MISSING_WALLET_LABEL: &str = "<unknown>";

/// Human-readable ranking preview, truncated to `limit` rows.
pub fn render_preview(scored: &[ScoredWallet], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<44} {:>12}", "wallet", "credit_score");
    for row in scored.iter().take(limit) {
        let wallet = row.wallet.as_deref().unwrap_or(MISSING_WALLET_LABEL);
        let _ = writeln!(out, "{:<44} {:>12.2}", wallet, row.credit_score);
    }
    out
}

/// Two-column CSV of the full ranking. Unidentified wallets serialize as an
/// empty first cell.
pub fn to_csv(scored: &[ScoredWallet]) -> String {
    let mut out = String::from("wallet,credit_score\n");
    for row in scored {
        let _ = writeln!(
            out,
            "{},{}",
            row.wallet.as_deref().unwrap_or_default(),
            row.credit_score
        );
    }
    out
}
