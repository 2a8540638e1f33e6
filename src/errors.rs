use thiserror::Error;

/// Unified error type for ledger, storage, and report layers.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("not a valid transaction value: {0}")]
    TypeMismatch(String),
    #[error("storage read failed: {0}")]
    StorageRead(String),
    #[error("storage write failed: {0}")]
    StorageWrite(String),
    #[error("malformed stored record: {0}")]
    MalformedRecord(String),
}

pub type Result<T> = std::result::Result<T, FinanceError>;
