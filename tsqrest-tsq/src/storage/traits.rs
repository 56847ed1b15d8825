//! Queue service client trait

use async_trait::async_trait;
use thiserror::Error;
use tsqrest_core::{ApiError, ErrorCode};

/// Errors from queue service operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("TSQ {0} does not exist")]
    QueueNotFound(String),

    #[error("Invalid TSQ name: {0:?}")]
    InvalidQueueName(String),

    #[error("Record of {length} bytes exceeds the {max} byte limit for TSQ {name}")]
    RecordTooLong {
        name: String,
        length: usize,
        max: usize,
    },

    #[error("TSQ {name} already holds the maximum of {max} items")]
    QueueFull { name: String, max: usize },

    #[error("Queue service error: {0}")]
    Backend(String),
}

impl QueueError {
    /// Name of the queue the error refers to, when it has one
    pub fn queue_name(&self) -> Option<&str> {
        match self {
            Self::QueueNotFound(name) | Self::InvalidQueueName(name) => Some(name),
            Self::RecordTooLong { name, .. } | Self::QueueFull { name, .. } => Some(name),
            Self::Backend(_) => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::QueueNotFound(_) => ErrorCode::QueueNotFound,
            Self::InvalidQueueName(_) => ErrorCode::InvalidQueueName,
            Self::RecordTooLong { .. } => ErrorCode::RecordTooLong,
            Self::QueueFull { .. } => ErrorCode::QueueFull,
            Self::Backend(_) => ErrorCode::BackendError,
        }
    }
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        let api = match &err {
            QueueError::Backend(_) => ApiError::backend(err.to_string()),
            _ => ApiError::new(err.code(), err.to_string()),
        };
        match err.queue_name() {
            Some(name) => api.with_resource(name),
            None => api,
        }
    }
}

/// The four operations the REST resource needs from the queue service.
///
/// Implementations own ordering and concurrency of each individual call;
/// callers get no atomicity across calls.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Read every record in the queue, oldest first, without removing any
    async fn browse(&self, name: &str) -> Result<Vec<String>, QueueError>;

    /// Append a record, returning a human-readable outcome
    async fn write(&self, name: &str, record: &str) -> Result<String, QueueError>;

    /// Number of items in the queue; 0 when the queue does not exist
    async fn info(&self, name: &str) -> Result<usize, QueueError>;

    /// Remove the queue, returning a human-readable outcome
    async fn delete(&self, name: &str) -> Result<String, QueueError>;

    /// Short backend identifier reported by the health endpoint
    fn backend_name(&self) -> &'static str;
}
