use std::path::PathBuf;
use thiserror::Error;

/// Rejected user-supplied input. Callers must correct the input before retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product id must not be empty")]
    EmptyId,
    #[error("product id '{0}' already exists")]
    DuplicateKey(String),
    #[error("product name must not be empty")]
    EmptyName,
    #[error("unit price must be greater than 0 (got {0})")]
    NonPositivePrice(i64),
    #[error("quantity must be greater than 0 (got {0})")]
    NonPositiveQuantity(i64),
    #[error("{field} must be a positive whole number (got '{input}')")]
    NotANumber { field: &'static str, input: String },
    #[error("search keyword must not be empty")]
    EmptyKeyword,
    #[error("stock value does not fit into a 64-bit integer")]
    StockValueOverflow,
}

/// Read or write failure on one of the storage files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl PersistenceError {
    /// The file the failed operation was working on
    pub fn path(&self) -> &std::path::Path {
        match self {
            PersistenceError::Io { path, .. }
            | PersistenceError::Csv { path, .. }
            | PersistenceError::Json { path, .. } => path,
        }
    }
}

/// Failure while rendering the status chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no products to chart")]
    NoData,
    #[error("failed to write chart to {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Unified error type for ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no product with id '{0}'")]
    NotFound(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Result alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
