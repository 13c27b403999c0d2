use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScorecardError {
    #[error("Card store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Card export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Bad card JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid card configuration: {0}")]
    Config(String),

    #[error("Invalid card data: {0}")]
    Validation(String),
}

pub type ScResult<T> = Result<T, ScorecardError>;
