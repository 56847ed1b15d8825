//! HTTP handlers for the TSQ resource

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tsqrest_core::{ApiError, ErrorCode, REQUEST_ID_HEADER};

use crate::storage::QueueClient;

/// Shared state for TSQ handlers
pub struct TsqState {
    pub client: Arc<dyn QueueClient>,
    /// Report "already exists" / "does not exist" outcomes as 409 / 404
    /// instead of 200
    pub strict_status: bool,
}

impl TsqState {
    pub fn new(client: Arc<dyn QueueClient>) -> Self {
        Self {
            client,
            strict_status: false,
        }
    }

    pub fn with_strict_status(mut self, strict_status: bool) -> Self {
        self.strict_status = strict_status;
        self
    }
}

/// Mount the TSQ resource at `/tsq/:tsq_name`
pub fn routes(state: Arc<TsqState>) -> Router {
    Router::new()
        .route(
            "/tsq/:tsq_name",
            get(browse_tsq)
                .put(update_tsq)
                .post(create_tsq)
                .delete(delete_tsq),
        )
        .with_state(state)
}

// === Request/Response types ===

/// Body of PUT and POST
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteTsqRequest {
    /// Must match the path when present
    #[serde(default)]
    pub tsq_name: Option<String>,
    pub record: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    pub tsq_name: String,
    pub records: Vec<RecordEntry>,
}

#[derive(Debug, Serialize)]
pub struct RecordEntry {
    pub record: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub tsq_name: String,
    pub result: String,
}

// === Handler functions ===

/// GET /tsq/{tsqName}
/// Browse every record in the queue
pub async fn browse_tsq(
    State(state): State<Arc<TsqState>>,
    Path(tsq_name): Path<String>,
) -> Response {
    debug!(tsq_name = %tsq_name, "BrowseTsq");

    match state.client.browse(&tsq_name).await {
        Ok(records) => {
            let response = BrowseResponse {
                tsq_name,
                records: records
                    .into_iter()
                    .map(|record| RecordEntry { record })
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PUT /tsq/{tsqName}
/// Append a record to a queue that already has items
pub async fn update_tsq(
    State(state): State<Arc<TsqState>>,
    Path(tsq_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    update(&state, tsq_name, &headers, &body)
        .await
        .unwrap_or_else(error_response)
}

/// POST /tsq/{tsqName}
/// Write the first record of a queue that has no items
pub async fn create_tsq(
    State(state): State<Arc<TsqState>>,
    Path(tsq_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    create(&state, tsq_name, &headers, &body)
        .await
        .unwrap_or_else(error_response)
}

/// DELETE /tsq/{tsqName}
/// Delete the queue; the client decides what deleting a missing queue means
pub async fn delete_tsq(
    State(state): State<Arc<TsqState>>,
    Path(tsq_name): Path<String>,
) -> Response {
    info!(tsq_name = %tsq_name, "DeleteTsq");

    match state.client.delete(&tsq_name).await {
        Ok(result) => result_response(StatusCode::OK, tsq_name, result),
        Err(e) => error_response(e.into()),
    }
}

// The existence check and the write below are separate client calls. Two
// concurrent requests for the same queue can both pass the check.

async fn update(
    state: &TsqState,
    tsq_name: String,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, ApiError> {
    let record = parse_write_request(&tsq_name, headers, body)?;
    info!(tsq_name = %tsq_name, "UpdateTsq");

    let items = state.client.info(&tsq_name).await?;
    if items == 0 {
        let status = if state.strict_status {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };
        let result = queue_missing_message(&tsq_name);
        return Ok(result_response(status, tsq_name, result));
    }

    let result = state.client.write(&tsq_name, &record).await?;
    Ok(result_response(StatusCode::OK, tsq_name, result))
}

async fn create(
    state: &TsqState,
    tsq_name: String,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, ApiError> {
    let record = parse_write_request(&tsq_name, headers, body)?;
    info!(tsq_name = %tsq_name, "CreateTsq");

    let items = state.client.info(&tsq_name).await?;
    if items > 0 {
        let status = if state.strict_status {
            StatusCode::CONFLICT
        } else {
            StatusCode::OK
        };
        let result = queue_exists_message(&tsq_name);
        return Ok(result_response(status, tsq_name, result));
    }

    let result = state.client.write(&tsq_name, &record).await?;
    Ok(result_response(StatusCode::OK, tsq_name, result))
}

/// `application/json` or an `application/*+json` type, parameters ignored
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}

/// Validate a PUT/POST body and return the record to write.
///
/// The path names the queue. A body `tsqName` is accepted only when it
/// agrees with the path.
fn parse_write_request(
    tsq_name: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<String, ApiError> {
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let is_json = content_type.to_str().is_ok_and(is_json_media_type);
        if !is_json {
            return Err(ApiError::new(
                ErrorCode::UnsupportedMediaType,
                "Request body must be application/json",
            )
            .with_resource(tsq_name));
        }
    }

    let req: WriteTsqRequest = serde_json::from_slice(body).map_err(|e| {
        ApiError::invalid_request(format!("Invalid request body: {}", e)).with_resource(tsq_name)
    })?;

    if let Some(body_name) = req.tsq_name.as_deref() {
        if body_name != tsq_name {
            return Err(ApiError::new(
                ErrorCode::QueueNameMismatch,
                format!(
                    "Body tsqName {:?} does not match path tsqName {:?}",
                    body_name, tsq_name
                ),
            )
            .with_resource(tsq_name));
        }
    }

    Ok(req.record)
}

pub fn queue_missing_message(tsq_name: &str) -> String {
    format!(
        "You are trying to write to an existing queue but TSQ {} does not exist. \
         Try creating a TSQ using a POST method instead.",
        tsq_name
    )
}

pub fn queue_exists_message(tsq_name: &str) -> String {
    format!(
        "You are trying to create a TSQ but {} already exists, \
         try using a PUT method to write to an existing TSQ",
        tsq_name
    )
}

// === Helpers ===

fn result_response(status: StatusCode, tsq_name: String, result: String) -> Response {
    (status, Json(ResultResponse { tsq_name, result })).into_response()
}

fn error_response(err: ApiError) -> Response {
    if err.code.is_server_error() {
        error!(request_id = %err.request_id, error = %err, "TSQ request failed");
    } else {
        warn!(request_id = %err.request_id, error = %err, "TSQ request rejected");
    }

    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        err.to_json(),
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(err.request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
