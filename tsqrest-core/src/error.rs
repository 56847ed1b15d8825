//! API error types and formatting

use serde::Serialize;
use thiserror::Error;

use crate::request_id::RequestId;

/// Error codes surfaced in the JSON error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Request shape
    InvalidRequest,
    QueueNameMismatch,
    UnsupportedMediaType,

    // Rejected by the queue service
    InvalidQueueName,
    RecordTooLong,
    QueueNotFound,
    QueueFull,

    // Queue service fault
    BackendError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "InvalidRequest",
            Self::QueueNameMismatch => "QueueNameMismatch",
            Self::UnsupportedMediaType => "UnsupportedMediaType",
            Self::InvalidQueueName => "InvalidQueueName",
            Self::RecordTooLong => "RecordTooLong",
            Self::QueueNotFound => "QueueNotFound",
            Self::QueueFull => "QueueFull",
            Self::BackendError => "BackendError",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest
            | Self::QueueNameMismatch
            | Self::InvalidQueueName
            | Self::RecordTooLong => 400,
            Self::QueueNotFound => 404,
            Self::UnsupportedMediaType => 415,
            Self::BackendError => 500,
            Self::QueueFull => 507,
        }
    }

    /// Whether the fault lies with the server rather than the caller
    pub fn is_server_error(&self) -> bool {
        self.http_status() >= 500
    }
}

/// Error returned to HTTP callers
#[derive(Debug, Error)]
#[error("{}: {message}", .code.as_str())]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub resource: Option<String>,
    pub request_id: RequestId,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            resource: None,
            request_id: RequestId::new(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendError, message)
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Format as the JSON error envelope
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct JsonError<'a> {
            error: &'static str,
            message: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            tsq_name: Option<&'a str>,
            request_id: &'a str,
        }

        let error = JsonError {
            error: self.code.as_str(),
            message: &self.message,
            tsq_name: self.resource.as_deref(),
            request_id: self.request_id.as_str(),
        };

        serde_json::to_string(&error).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"{}","requestId":"{}"}}"#,
                self.code.as_str(),
                self.request_id
            )
        })
    }
}
