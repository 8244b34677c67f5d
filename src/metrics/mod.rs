pub mod features;
pub mod score;

pub use features::{aggregate, WalletFeatures};
pub use score::{score_wallets, ScoreWeights, ScoredWallet};
