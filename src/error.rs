use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No wallets to score: input produced an empty population")]
    EmptyInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed ledger JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
