//! In-process test server

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// A router served on an ephemeral local port.
///
/// The server task is aborted when the value is dropped.
pub struct TestServer {
    handle: JoinHandle<()>,
    addr: SocketAddr,
    base_url: String,
}

impl TestServer {
    /// Serve `router` on `127.0.0.1` with an OS-assigned port
    pub async fn start(router: axum::Router) -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| TestError::BindFailed(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| TestError::BindFailed(e.to_string()))?;

        info!(port = addr.port(), "Starting test server");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "Test server stopped");
            }
        });

        Ok(Self {
            handle,
            addr,
            base_url: format!("http://{}", addr),
        })
    }

    /// Get the base URL
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Get the port
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Get a client for the TSQ resource
    pub fn client(&self) -> crate::TsqClient {
        crate::TsqClient::new(self.base_url.clone())
    }

    /// Stop the server
    pub fn stop(&self) {
        info!(port = self.addr.port(), "Stopping test server");
        self.handle.abort();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Errors that can occur with test server
#[derive(Debug, Error)]
pub enum TestError {
    #[error("Failed to bind test server: {0}")]
    BindFailed(String),
}
