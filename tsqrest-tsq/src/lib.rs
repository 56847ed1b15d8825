//! Temporary Storage Queue resource for tsqrest
//!
//! Maps `/tsq/{tsqName}` onto four queue operations:
//! - GET browses every record in the queue
//! - PUT appends a record to a queue that already has items
//! - POST writes the first record of a new queue
//! - DELETE removes the queue
//!
//! The queue service itself sits behind the [`QueueClient`] trait. An
//! in-memory implementation is provided for standalone use and tests.

pub mod handlers;
pub mod storage;

pub use handlers::{routes, TsqState};
pub use storage::{MemoryBackendConfig, MemoryQueueClient, QueueClient, QueueError};
