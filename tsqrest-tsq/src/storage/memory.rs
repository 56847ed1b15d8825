//! In-memory TSQ backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, info};

use super::traits::{QueueClient, QueueError};

/// Limits enforced by the in-memory backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryBackendConfig {
    /// Longest accepted queue name, in characters
    pub max_name_length: usize,
    /// Longest accepted record, in bytes
    pub max_record_length: usize,
    /// Most items a single queue may hold
    pub max_items: usize,
}

impl Default for MemoryBackendConfig {
    fn default() -> Self {
        Self {
            max_name_length: 16,
            max_record_length: 32763,
            max_items: 32767,
        }
    }
}

/// A queue and its records
#[derive(Debug, Clone)]
pub struct TsQueue {
    pub name: String,
    pub records: Vec<String>,
    pub created: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl TsQueue {
    fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            records: Vec::new(),
            created: now,
            last_used: now,
        }
    }
}

/// Queue client holding every queue in process memory.
///
/// A queue comes into existence on its first write and disappears on
/// delete. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryQueueClient {
    queues: DashMap<String, TsQueue>,
    config: MemoryBackendConfig,
}

impl MemoryQueueClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryBackendConfig) -> Self {
        Self {
            queues: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &MemoryBackendConfig {
        &self.config
    }

    /// Snapshot of a queue, if it exists
    pub fn queue(&self, name: &str) -> Option<TsQueue> {
        self.queues.get(name).map(|q| q.value().clone())
    }

    /// Names of all existing queues, sorted
    pub fn queue_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.queues.iter().map(|q| q.key().clone()).collect();
        names.sort();
        names
    }

    fn validate_name(&self, name: &str) -> Result<(), QueueError> {
        let length = name.chars().count();
        if length == 0 || length > self.config.max_name_length || name.trim() != name {
            return Err(QueueError::InvalidQueueName(name.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QueueClient for MemoryQueueClient {
    async fn browse(&self, name: &str) -> Result<Vec<String>, QueueError> {
        self.validate_name(name)?;

        let records = match self.queues.get_mut(name) {
            Some(mut queue) => {
                queue.last_used = Utc::now();
                queue.records.clone()
            }
            None => Vec::new(),
        };

        debug!(tsq_name = %name, count = records.len(), "Browsed queue");
        Ok(records)
    }

    async fn write(&self, name: &str, record: &str) -> Result<String, QueueError> {
        self.validate_name(name)?;
        if record.len() > self.config.max_record_length {
            return Err(QueueError::RecordTooLong {
                name: name.to_string(),
                length: record.len(),
                max: self.config.max_record_length,
            });
        }

        let full = || QueueError::QueueFull {
            name: name.to_string(),
            max: self.config.max_items,
        };

        // A rejected write must not bring the queue into existence
        let item = match self.queues.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                let queue = entry.get_mut();
                if queue.records.len() >= self.config.max_items {
                    return Err(full());
                }
                queue.records.push(record.to_string());
                queue.last_used = Utc::now();
                queue.records.len()
            }
            Entry::Vacant(entry) => {
                if self.config.max_items == 0 {
                    return Err(full());
                }
                let mut queue = TsQueue::new(name);
                queue.records.push(record.to_string());
                entry.insert(queue);
                1
            }
        };

        info!(tsq_name = %name, item = item, "Wrote record");
        Ok(format!("Record written to TSQ {} as item {}", name, item))
    }

    async fn info(&self, name: &str) -> Result<usize, QueueError> {
        self.validate_name(name)?;

        let count = self.queues.get(name).map_or(0, |q| q.records.len());
        debug!(tsq_name = %name, count = count, "Queue info");
        Ok(count)
    }

    async fn delete(&self, name: &str) -> Result<String, QueueError> {
        self.validate_name(name)?;

        match self.queues.remove(name) {
            Some((_, queue)) => {
                info!(tsq_name = %name, items = queue.records.len(), "Deleted queue");
                Ok(format!("TSQ {} deleted", name))
            }
            None => Err(QueueError::QueueNotFound(name.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
