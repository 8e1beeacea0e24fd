use sea_orm::{DbErr, SqlErr};

/// Result type for all usecase operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by usecases.
///
/// Handlers translate these 1:1 into the HTTP error envelope; nothing here is
/// retried. `TopicHasChildren` is its own variant because clients branch on it
/// to offer the cascade/reparent recovery choices.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Topic has children; delete with mode=cascade or mode=reparent")]
    TopicHasChildren,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    /// Classifies a uniqueness violation as Conflict, everything else as a
    /// database error. Inspects the driver error code, not its message text,
    /// so it holds across backends and locales.
    pub fn or_conflict(err: DbErr, message: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(message.into()),
            _ => ServiceError::Database(err),
        }
    }
}
