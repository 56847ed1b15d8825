//! Client for the TSQ REST resource

use reqwest::{Client, Method, Url};
use serde_json::{json, Value};
use thiserror::Error;

/// Client for the `/tsq/{tsqName}` resource
pub struct TsqClient {
    base_url: String,
    client: Client,
}

/// Status and JSON body of a response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    /// The `result` field of a write or delete response
    pub fn result(&self) -> Option<&str> {
        self.body.get("result").and_then(Value::as_str)
    }

    /// Record strings of a browse response, in order
    pub fn records(&self) -> Vec<String> {
        self.body
            .get("records")
            .and_then(Value::as_array)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|r| r.get("record").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The `error` code of an error response
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

impl TsqClient {
    /// Create a new client
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(crate::REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /tsq/{name}
    pub async fn browse(&self, name: &str) -> Result<Reply, ClientError> {
        self.send(Method::GET, name, None).await
    }

    /// POST /tsq/{name} with `{tsqName, record}`
    pub async fn create(&self, name: &str, record: &str) -> Result<Reply, ClientError> {
        let body = json!({ "tsqName": name, "record": record });
        self.send(Method::POST, name, Some(body)).await
    }

    /// PUT /tsq/{name} with `{tsqName, record}`
    pub async fn update(&self, name: &str, record: &str) -> Result<Reply, ClientError> {
        let body = json!({ "tsqName": name, "record": record });
        self.send(Method::PUT, name, Some(body)).await
    }

    /// DELETE /tsq/{name}
    pub async fn delete(&self, name: &str) -> Result<Reply, ClientError> {
        self.send(Method::DELETE, name, None).await
    }

    /// URL of /tsq/{name}, with the name percent-encoded as one path segment
    pub fn tsq_url(&self, name: &str) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("tsq")
            .push(name);
        Ok(url)
    }

    /// Send an arbitrary JSON body to /tsq/{name}
    pub async fn send(
        &self,
        method: Method,
        name: &str,
        body: Option<Value>,
    ) -> Result<Reply, ClientError> {
        let url = self.tsq_url(name)?;
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ClientError::ParseError(e.to_string()))?
        };

        Ok(Reply { status, body })
    }
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_accessors() {
        let reply = Reply {
            status: 200,
            body: json!({"tsqName": "Q", "records": [{"record": "A"}, {"record": "B"}]}),
        };
        assert_eq!(reply.records(), vec!["A", "B"]);
        assert!(reply.result().is_none());

        let reply = Reply {
            status: 404,
            body: json!({"error": "QueueNotFound", "message": "TSQ Q does not exist"}),
        };
        assert_eq!(reply.error_code(), Some("QueueNotFound"));
        assert!(reply.records().is_empty());
    }

    #[test]
    fn test_tsq_url_encodes_name() {
        let client = TsqClient::new("http://127.0.0.1:8080".to_string());
        assert_eq!(
            client.tsq_url("Q1").unwrap().as_str(),
            "http://127.0.0.1:8080/tsq/Q1"
        );
        assert_eq!(
            client.tsq_url("A/B?C#D").unwrap().as_str(),
            "http://127.0.0.1:8080/tsq/A%2FB%3FC%23D"
        );
    }

    #[test]
    fn test_tsq_url_rejects_bad_base() {
        let client = TsqClient::new("not a url".to_string());
        assert!(matches!(
            client.tsq_url("Q"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
