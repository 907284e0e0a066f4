use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Builds a `NotFound` error for the given entity and key.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Returns true for point-lookup misses, which callers recover into an
    /// explicit absent result.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }

    /// Returns true when the store itself cannot be used. No component can
    /// operate past this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RepositoryError::StorageUnavailable(_))
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
