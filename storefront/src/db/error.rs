use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Order already exists: {0}")]
    DuplicateOrder(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateOrder(id) => {
                AppError::already_exists(format!("Order {}", id))
            }
            // 数据库文件打不开 (被占用等)
            StorageError::Database(e) => {
                AppError::with_message(ErrorCode::StorageUnavailable, e.to_string())
            }
            StorageError::Serialization(e) => {
                AppError::with_message(ErrorCode::InternalError, e.to_string())
            }
            other => AppError::database(other.to_string()),
        }
    }
}
