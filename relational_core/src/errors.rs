use crate::validation::ValidationError;
use cache_system::CacheError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Incorrect result size: expected {expected}, actual {actual}")]
    IncorrectResultSize { expected: usize, actual: usize },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Metadata cache error: {0}")]
    Cache(#[from] CacheError),
}

impl QueryError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Wrap a driver error raised while executing `sql`
    pub fn query_execution(sql: &str, error: impl std::fmt::Display) -> Self {
        Self::Database(format!("Failed to execute '{}': {}", sql, error))
    }
}
