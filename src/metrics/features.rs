use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::types::{Action, Transaction};

/// Ratio reported for wallets that borrowed without ever repaying.
pub const NO_REPAY_RATIO_SENTINEL: f64 = 1_000_000.0;

/// Count / mean / sample std-dev triple for one action type within a wallet
/// group. All zero when the wallet has no transactions of that action.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionStats {
    pub count: u64,
    pub avg_amount: f64,
    pub std_amount: f64,
}

/// Dense behavioral feature vector for one wallet. Every field is always
/// present and finite; degenerate statistics land as 0, never NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletFeatures {
    pub wallet: Option<String>,
    pub num_transactions: u64,
    pub active_days: u64,
    pub avg_time_between_txns: f64,
    pub deposit: ActionStats,
    pub borrow: ActionStats,
    pub repay: ActionStats,
    pub redeem_underlying: ActionStats,
    pub liquidation_call: ActionStats,
    pub total_borrow: f64,
    pub total_repay: f64,
    pub borrow_to_repay_ratio: f64,
    pub liquidation_count: u64,
    pub net_balance_change: f64,
}

impl WalletFeatures {
    pub fn action_stats(&self, action: Action) -> &ActionStats {
        match action {
            Action::Deposit => &self.deposit,
            Action::Borrow => &self.borrow,
            Action::Repay => &self.repay,
            Action::RedeemUnderlying => &self.redeem_underlying,
            Action::LiquidationCall => &self.liquidation_call,
        }
    }

    fn action_stats_mut(&mut self, action: Action) -> &mut ActionStats {
        match action {
            Action::Deposit => &mut self.deposit,
            Action::Borrow => &mut self.borrow,
            Action::Repay => &mut self.repay,
            Action::RedeemUnderlying => &mut self.redeem_underlying,
            Action::LiquidationCall => &mut self.liquidation_call,
        }
    }
}

/// Group transactions by wallet and compute one feature vector per group.
///
/// Records with no wallet id form a single unidentified group. Output order
/// is first-seen wallet order, which downstream tie-breaking relies on.
pub fn aggregate(transactions: &[Transaction]) -> Vec<WalletFeatures> {
    let mut order: Vec<Option<String>> = Vec::new();
    let mut groups: HashMap<Option<String>, Vec<&Transaction>> = HashMap::new();

    for tx in transactions {
        groups
            .entry(tx.wallet.clone())
            .or_insert_with(|| {
                order.push(tx.wallet.clone());
                Vec::new()
            })
            .push(tx);
    }

    order
        .into_iter()
        .map(|wallet| {
            let group = &groups[&wallet];
            features_for_group(wallet, group)
        })
        .collect()
}

fn features_for_group(wallet: Option<String>, group: &[&Transaction]) -> WalletFeatures {
    let mut features = WalletFeatures {
        wallet,
        num_transactions: group.len() as u64,
        ..Default::default()
    };

    let days: HashSet<NaiveDate> = group.iter().map(|tx| tx.datetime.date_naive()).collect();
    features.active_days = days.len() as u64;

    // Gaps between successive records in input order, not time-sorted.
    if group.len() > 1 {
        let gap_sum: f64 = group
            .windows(2)
            .map(|pair| (pair[1].timestamp - pair[0].timestamp) as f64)
            .sum();
        features.avg_time_between_txns = gap_sum / (group.len() - 1) as f64;
    }

    for action in Action::ALL {
        let amounts: Vec<f64> = group
            .iter()
            .filter(|tx| tx.action == action.as_str())
            .map(|tx| tx.amount)
            .collect();
        *features.action_stats_mut(action) = ActionStats {
            count: amounts.len() as u64,
            avg_amount: mean(&amounts),
            std_amount: sample_std_dev(&amounts),
        };
    }

    features.total_borrow = sum_for(group, Action::Borrow);
    features.total_repay = sum_for(group, Action::Repay);
    features.borrow_to_repay_ratio = if features.total_repay > 0.0 {
        features.total_borrow / features.total_repay
    } else {
        NO_REPAY_RATIO_SENTINEL
    };
    features.liquidation_count = features.liquidation_call.count;
    features.net_balance_change = sum_for(group, Action::Deposit) - features.total_borrow
        + features.total_repay
        - sum_for(group, Action::RedeemUnderlying);

    scrub_non_finite(&mut features);
    features
}

fn sum_for(group: &[&Transaction], action: Action) -> f64 {
    group
        .iter()
        .filter(|tx| tx.action == action.as_str())
        .map(|tx| tx.amount)
        .sum()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator); 0 for fewer than 2 samples.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// The feature table must be dense: anything non-finite lands as 0.
fn scrub_non_finite(features: &mut WalletFeatures) {
    for value in [
        &mut features.avg_time_between_txns,
        &mut features.deposit.avg_amount,
        &mut features.deposit.std_amount,
        &mut features.borrow.avg_amount,
        &mut features.borrow.std_amount,
        &mut features.repay.avg_amount,
        &mut features.repay.std_amount,
        &mut features.redeem_underlying.avg_amount,
        &mut features.redeem_underlying.std_amount,
        &mut features.liquidation_call.avg_amount,
        &mut features.liquidation_call.std_amount,
        &mut features.total_borrow,
        &mut features.total_repay,
        &mut features.borrow_to_repay_ratio,
        &mut features.net_balance_change,
    ] {
        if !value.is_finite() {
            *value = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn tx(wallet: Option<&str>, action: &str, amount: f64, timestamp: i64) -> Transaction {
        Transaction {
            wallet: wallet.map(|w| w.to_string()),
            action: action.to_string(),
            amount,
            timestamp,
            datetime: DateTime::from_timestamp(timestamp, 0).unwrap_or_default(),
        }
    }

    #[test]
    fn test_empty_input_yields_no_features() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_counts_and_active_days() {
        const DAY: i64 = 86_400;
        let features = aggregate(&[
            tx(Some("a"), "deposit", 1.0, 0),
            tx(Some("a"), "deposit", 2.0, 100),
            tx(Some("a"), "borrow", 3.0, DAY + 100),
        ]);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].num_transactions, 3);
        assert_eq!(features[0].active_days, 2);
        assert!(features[0].active_days <= features[0].num_transactions);
    }

    #[test]
    fn test_avg_time_between_txns_follows_input_order() {
        let features = aggregate(&[
            tx(Some("a"), "deposit", 1.0, 100),
            tx(Some("a"), "deposit", 1.0, 400),
            tx(Some("a"), "deposit", 1.0, 300),
        ]);
        // Gaps in input order: +300, -100.
        assert_eq!(features[0].avg_time_between_txns, 100.0);
    }

    #[test]
    fn test_single_transaction_has_zero_gap() {
        let features = aggregate(&[tx(Some("a"), "deposit", 1.0, 100)]);
        assert_eq!(features[0].avg_time_between_txns, 0.0);
    }

    #[test]
    fn test_action_stats_per_type() {
        let features = aggregate(&[
            tx(Some("a"), "deposit", 1.0, 0),
            tx(Some("a"), "deposit", 3.0, 1),
            tx(Some("a"), "borrow", 5.0, 2),
        ]);
        let deposit = features[0].action_stats(Action::Deposit);
        assert_eq!(deposit.count, 2);
        assert_eq!(deposit.avg_amount, 2.0);
        // Sample std-dev of {1, 3} is sqrt(2).
        assert!((deposit.std_amount - 2.0_f64.sqrt()).abs() < 1e-12);

        let borrow = features[0].action_stats(Action::Borrow);
        assert_eq!(borrow.count, 1);
        assert_eq!(borrow.avg_amount, 5.0);
        assert_eq!(borrow.std_amount, 0.0);

        let repay = features[0].action_stats(Action::Repay);
        assert_eq!(*repay, ActionStats::default());
    }

    #[test]
    fn test_unrecognized_actions_counted_but_not_featured() {
        let features = aggregate(&[
            tx(Some("a"), "flashloan", 7.0, 0),
            tx(Some("a"), "deposit", 1.0, 1),
        ]);
        assert_eq!(features[0].num_transactions, 2);
        assert_eq!(features[0].deposit.count, 1);
        for action in Action::ALL {
            if action != Action::Deposit {
                assert_eq!(features[0].action_stats(action).count, 0);
            }
        }
    }

    #[test]
    fn test_no_repay_sentinel() {
        let features = aggregate(&[tx(Some("a"), "borrow", 2.0, 0)]);
        assert_eq!(features[0].borrow_to_repay_ratio, NO_REPAY_RATIO_SENTINEL);
    }

    #[test]
    fn test_borrow_to_repay_ratio() {
        let features = aggregate(&[
            tx(Some("a"), "borrow", 2.0, 0),
            tx(Some("a"), "repay", 1.0, 1),
        ]);
        assert_eq!(features[0].borrow_to_repay_ratio, 2.0);
    }

    #[test]
    fn test_net_balance_change() {
        let features = aggregate(&[
            tx(Some("a"), "deposit", 10.0, 0),
            tx(Some("a"), "borrow", 4.0, 1),
            tx(Some("a"), "repay", 3.0, 2),
            tx(Some("a"), "redeemunderlying", 2.0, 3),
        ]);
        // 10 - 4 + 3 - 2
        assert_eq!(features[0].net_balance_change, 7.0);
        assert_eq!(features[0].liquidation_count, 0);
    }

    #[test]
    fn test_liquidation_count_aliases_action_count() {
        let features = aggregate(&[
            tx(Some("a"), "liquidationcall", 0.0, 0),
            tx(Some("a"), "liquidationcall", 0.0, 1),
        ]);
        assert_eq!(features[0].liquidation_count, 2);
        assert_eq!(features[0].liquidation_call.count, 2);
    }

    #[test]
    fn test_null_wallets_grouped_together() {
        let features = aggregate(&[
            tx(None, "deposit", 1.0, 0),
            tx(Some("a"), "deposit", 1.0, 1),
            tx(None, "borrow", 1.0, 2),
        ]);
        assert_eq!(features.len(), 2);
        let unidentified = features.iter().find(|f| f.wallet.is_none()).unwrap();
        assert_eq!(unidentified.num_transactions, 2);
    }

    #[test]
    fn test_first_seen_wallet_order() {
        let features = aggregate(&[
            tx(Some("b"), "deposit", 1.0, 0),
            tx(Some("a"), "deposit", 1.0, 1),
            tx(Some("b"), "deposit", 1.0, 2),
        ]);
        assert_eq!(features[0].wallet.as_deref(), Some("b"));
        assert_eq!(features[1].wallet.as_deref(), Some("a"));
    }

    #[test]
    fn test_feature_table_is_dense() {
        let features = aggregate(&[tx(Some("a"), "swap", 1.0, 0)]);
        let f = &features[0];
        assert!(f.avg_time_between_txns.is_finite());
        assert!(f.borrow_to_repay_ratio.is_finite());
        assert!(f.net_balance_change.is_finite());
        for action in Action::ALL {
            let stats = f.action_stats(action);
            assert!(stats.avg_amount.is_finite());
            assert!(stats.std_amount.is_finite());
        }
    }
}
