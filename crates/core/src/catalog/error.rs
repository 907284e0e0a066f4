use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors raised when validating catalog input before it reaches storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("ISBN-13 cannot be empty")]
    EmptyIsbn,
    #[error("Row id must be positive, got {0}")]
    InvalidRowId(i64),
    #[error("{0} has no row id")]
    MissingRowId(&'static str),
    #[error("Invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

impl From<CatalogError> for RepositoryError {
    fn from(err: CatalogError) -> Self {
        RepositoryError::MalformedInput(err.to_string())
    }
}
