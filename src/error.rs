use thiserror::Error;

/// Failures while pulling fields out of a message body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("date phrase needs 4 tokens, got {0}: {1:?}")]
    TooFewTokens(usize, String),

    #[error("invalid day in date phrase: {0:?}")]
    InvalidDay(String),

    #[error("unknown month abbreviation: {0:?}")]
    UnknownMonth(String),

    #[error("invalid grand total: {0:?}")]
    InvalidTotal(String),

    #[error("invalid cursor date: {0:?} (expected YYYY-Mon-DD)")]
    InvalidCursor(String),

    #[error("message is missing its {0}")]
    MissingField(&'static str),
}

/// Condition values that cannot be turned into a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("row limit must be a positive whole number, got {0:?}")]
    InvalidRowLimit(String),
}

#[derive(Error, Debug)]
pub enum BasketError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Mailbox error: {0}")]
    Mailbox(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BasketError>;
