use thiserror::Error as ThisError;

/// Ledger errors. All of them are recoverable, the
/// caller decides how to word them.
#[derive(ThisError, Debug)]
pub enum LedgerError {
    #[error("member not found")]
    NotFound,
    #[error("member is already enrolled")]
    AlreadyEnrolled,
    #[error("{0} members share this display name")]
    AmbiguousName(usize),
    #[error("the monthly cost is not set")]
    PlanCostUnset,
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid duration {0}, expected a positive number of months")]
    InvalidDuration(i64),
    #[error("invalid monthly cost {0}")]
    InvalidCost(f64),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
