use crate::storage::StorageError;

/// Errors returned by the domain services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Mismatch(message) => ServiceError::Validation(message),
            StorageError::Constraint(message) => {
                ServiceError::Validation(format!("Constraint violation: {}", message))
            }
            other => ServiceError::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
