/// Errors raised by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed record in {file}: {reason}")]
    Malformed { file: String, reason: String },
    /// The request does not match what is stored (e.g. a reorder that is not
    /// a permutation of the current list)
    #[error("{0}")]
    Mismatch(String),
    #[error("{0}")]
    Constraint(String),
}

impl StorageError {
    /// Message safe to return to clients; details stay in the logs
    pub fn public_message(&self) -> &'static str {
        match self {
            StorageError::Database(_) | StorageError::Constraint(_) => "Database error",
            StorageError::Mismatch(_) => "Storage conflict",
            StorageError::Io(_) | StorageError::Csv(_) | StorageError::Malformed { .. } => {
                "Storage file error"
            }
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return StorageError::Constraint(db_err.message().to_string());
            }
        }
        StorageError::Database(err)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
