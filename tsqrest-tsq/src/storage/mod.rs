//! Queue service clients

mod memory;
mod traits;

#[cfg(test)]
mod tests;

pub use memory::{MemoryBackendConfig, MemoryQueueClient, TsQueue};
pub use traits::{QueueClient, QueueError};
