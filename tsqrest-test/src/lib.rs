//! Test utilities for tsqrest
//!
//! Provides utilities for integration testing the REST facade:
//! - Serve a router on a random local port
//! - Client helpers for the `/tsq/{tsqName}` resource
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tsqrest_test::TestServer;
//!
//! #[tokio::test]
//! async fn test_tsq() {
//!     let server = TestServer::start(axum::Router::new()).await.unwrap();
//!     let reply = server.client().browse("ORDERS").await.unwrap();
//!     println!("{}: {:?}", reply.status, reply.body);
//! }
//! ```

pub mod client;
pub mod server;

pub use client::{ClientError, Reply, TsqClient};
pub use server::{TestError, TestServer};

/// Timeout applied to every client request
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
