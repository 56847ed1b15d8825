//! Tests for the in-memory queue client

use super::*;

fn client() -> MemoryQueueClient {
    MemoryQueueClient::new()
}

// =============================================================================
// WRITE / BROWSE
// =============================================================================

mod write_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_write_creates_queue() {
        let c = client();
        assert_eq!(c.info("ORDERS").await.unwrap(), 0);

        let outcome = c.write("ORDERS", "first").await.unwrap();
        assert_eq!(outcome, "Record written to TSQ ORDERS as item 1");
        assert_eq!(c.info("ORDERS").await.unwrap(), 1);
        assert_eq!(c.queue_names(), vec!["ORDERS".to_string()]);
    }

    #[tokio::test]
    async fn test_write_reports_item_number() {
        let c = client();
        c.write("Q", "a").await.unwrap();
        c.write("Q", "b").await.unwrap();

        let outcome = c.write("Q", "c").await.unwrap();
        assert!(outcome.ends_with("item 3"));
    }

    #[tokio::test]
    async fn test_browse_preserves_write_order() {
        let c = client();
        for record in ["A", "B", "C"] {
            c.write("Q", record).await.unwrap();
        }

        let records = c.browse("Q").await.unwrap();
        assert_eq!(records, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_browse_does_not_consume() {
        let c = client();
        c.write("Q", "A").await.unwrap();

        c.browse("Q").await.unwrap();
        assert_eq!(c.browse("Q").await.unwrap(), vec!["A"]);
        assert_eq!(c.info("Q").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_browse_missing_queue_is_empty() {
        let c = client();
        let records = c.browse("NOPE").await.unwrap();
        assert!(records.is_empty());
        assert!(c.queue("NOPE").is_none());
    }

    #[tokio::test]
    async fn test_browse_touches_last_used() {
        let c = client();
        c.write("Q", "A").await.unwrap();
        let before = c.queue("Q").unwrap();

        c.browse("Q").await.unwrap();
        let after = c.queue("Q").unwrap();
        assert!(after.last_used >= before.last_used);
        assert_eq!(after.created, before.created);
    }

    #[tokio::test]
    async fn test_empty_record_is_accepted() {
        let c = client();
        c.write("Q", "").await.unwrap();
        assert_eq!(c.browse("Q").await.unwrap(), vec![String::new()]);
    }
}

// =============================================================================
// DELETE
// =============================================================================

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_existing_queue() {
        let c = client();
        c.write("Q", "A").await.unwrap();

        let outcome = c.delete("Q").await.unwrap();
        assert_eq!(outcome, "TSQ Q deleted");
        assert_eq!(c.info("Q").await.unwrap(), 0);
        assert!(c.queue_names().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_queue() {
        let c = client();
        let result = c.delete("Q").await;
        assert!(matches!(result, Err(QueueError::QueueNotFound(name)) if name == "Q"));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let c = client();
        c.write("Q", "A").await.unwrap();
        c.delete("Q").await.unwrap();

        assert!(matches!(
            c.delete("Q").await,
            Err(QueueError::QueueNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_write_after_delete_starts_fresh() {
        let c = client();
        c.write("Q", "old").await.unwrap();
        c.delete("Q").await.unwrap();

        let outcome = c.write("Q", "new").await.unwrap();
        assert!(outcome.ends_with("item 1"));
        assert_eq!(c.browse("Q").await.unwrap(), vec!["new"]);
    }
}

// =============================================================================
// LIMITS
// =============================================================================

mod limit_tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = MemoryBackendConfig::default();
        assert_eq!(config.max_name_length, 16);
        assert_eq!(config.max_record_length, 32763);
        assert_eq!(config.max_items, 32767);
    }

    #[tokio::test]
    async fn test_name_too_long() {
        let c = client();
        let name = "A".repeat(17);
        let result = c.write(&name, "x").await;
        assert!(matches!(result, Err(QueueError::InvalidQueueName(_))));
        assert!(c.queue_names().is_empty());
    }

    #[tokio::test]
    async fn test_name_at_limit() {
        let c = client();
        let name = "A".repeat(16);
        c.write(&name, "x").await.unwrap();
        assert_eq!(c.info(&name).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_name_with_surrounding_whitespace() {
        let c = client();
        assert!(matches!(
            c.info(" Q").await,
            Err(QueueError::InvalidQueueName(_))
        ));
        assert!(matches!(
            c.browse("Q ").await,
            Err(QueueError::InvalidQueueName(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_name() {
        let c = client();
        assert!(matches!(
            c.delete("").await,
            Err(QueueError::InvalidQueueName(_))
        ));
    }

    #[tokio::test]
    async fn test_record_too_long() {
        let c = MemoryQueueClient::with_config(MemoryBackendConfig {
            max_record_length: 4,
            ..MemoryBackendConfig::default()
        });

        let result = c.write("Q", "12345").await;
        assert!(matches!(
            result,
            Err(QueueError::RecordTooLong { length: 5, max: 4, .. })
        ));
        assert!(c.queue("Q").is_none());
    }

    #[tokio::test]
    async fn test_queue_full() {
        let c = MemoryQueueClient::with_config(MemoryBackendConfig {
            max_items: 2,
            ..MemoryBackendConfig::default()
        });
        c.write("Q", "a").await.unwrap();
        c.write("Q", "b").await.unwrap();

        let result = c.write("Q", "c").await;
        assert!(matches!(result, Err(QueueError::QueueFull { max: 2, .. })));
        assert_eq!(c.info("Q").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_write_leaves_no_queue() {
        let c = MemoryQueueClient::with_config(MemoryBackendConfig {
            max_items: 0,
            ..MemoryBackendConfig::default()
        });

        let result = c.write("Q", "x").await;
        assert!(matches!(result, Err(QueueError::QueueFull { max: 0, .. })));
        assert!(c.queue("Q").is_none());
        assert!(c.queue_names().is_empty());
        assert!(matches!(
            c.delete("Q").await,
            Err(QueueError::QueueNotFound(_))
        ));
    }
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

mod error_tests {
    use super::*;
    use tsqrest_core::{ApiError, ErrorCode};

    #[test]
    fn test_not_found_maps_to_404() {
        let api: ApiError = QueueError::QueueNotFound("Q".to_string()).into();
        assert_eq!(api.code, ErrorCode::QueueNotFound);
        assert_eq!(api.http_status(), 404);
        assert_eq!(api.resource.as_deref(), Some("Q"));
        assert_eq!(api.message, "TSQ Q does not exist");
    }

    #[test]
    fn test_backend_maps_to_500() {
        let api: ApiError = QueueError::Backend("link down".to_string()).into();
        assert_eq!(api.code, ErrorCode::BackendError);
        assert_eq!(api.http_status(), 500);
        assert!(api.resource.is_none());
        assert_eq!(api.message, "Queue service error: link down");
    }

    #[test]
    fn test_limits_map_to_client_errors() {
        let too_long: ApiError = QueueError::RecordTooLong {
            name: "Q".to_string(),
            length: 10,
            max: 4,
        }
        .into();
        assert_eq!(too_long.http_status(), 400);

        let bad_name: ApiError = QueueError::InvalidQueueName(String::new()).into();
        assert_eq!(bad_name.http_status(), 400);
    }
}

// =============================================================================
// CONCURRENCY
// =============================================================================

mod concurrency_tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_all_land() {
        let c = Arc::new(client());
        let mut handles = Vec::new();
        for i in 0..50 {
            let c = c.clone();
            handles.push(tokio::spawn(async move {
                c.write("Q", &format!("record-{}", i)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(c.info("Q").await.unwrap(), 50);
    }
}
