use thiserror::Error as ThisError;

/// Query errors
#[derive(Debug, Clone, ThisError)]
pub enum QueryError {
    #[error("Not found")]
    NotFound,
}
