//! Core types for tsqrest
//!
//! This crate provides the error envelope and request ids shared by the
//! service crates.

pub mod error;
pub mod request_id;

pub use error::{ApiError, ErrorCode};
pub use request_id::{RequestId, REQUEST_ID_HEADER};
