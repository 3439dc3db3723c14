//! Request validation for the recommendation API
//!
//! This module is the first line of defense against malformed inputs: a
//! compiled JSON Schema for the recommend request, a content-type check,
//! and the request body-size limit layer. Validation runs before any
//! upstream or model call is issued.

use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use tower_http::limit::RequestBodyLimitLayer;

use crate::ErrorResponse;

/// Maximum request payload size (64KB); recommend requests are small.
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Upper bound on the free-text question embedded in the model payload.
/// Oversized questions are rejected here rather than truncated.
pub const MAX_QUESTION_CHARS: usize = 8192;

lazy_static::lazy_static! {
    /// Schema for the recommend request
    pub static ref RECOMMEND_REQUEST_SCHEMA: JSONSchema = {
        let schema = json!({
            "type": "object",
            "required": ["username", "question"],
            "properties": {
                "username": {
                    "type": "string",
                    "minLength": 1,
                    "maxLength": 64,
                    "pattern": "^[a-zA-Z0-9_.-]+$"
                },
                "question": {
                    "type": "string",
                    "minLength": 1,
                    "maxLength": MAX_QUESTION_CHARS
                },
                "sub_limit": {
                    "type": ["integer", "null"],
                    "minimum": 1,
                    "maximum": 1000
                }
            },
            "additionalProperties": false
        });

        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .expect("Invalid schema")
    };
}

/// Validation error for API requests
#[derive(Debug, thiserror::Error)]
pub enum ApiValidationError {
    #[error("Invalid request format: {0}")]
    InvalidFormat(String),

    #[error("Content type must be {0}")]
    ContentType(String),

    #[error("Request payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Schema validation error: {0}")]
    Schema(String),
}

impl ApiValidationError {
    /// Convert to HTTP status code and error response.
    ///
    /// Malformed bodies and schema violations (a missing question included)
    /// surface with a server-error status; clients of this API key off the
    /// error payload, not the status class. Transport-level checks keep
    /// their conventional statuses.
    pub fn to_response(&self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, code) = match self {
            Self::InvalidFormat(_) => (StatusCode::INTERNAL_SERVER_ERROR, 500),
            Self::ContentType(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, 415),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, 413),
            Self::Schema(_) => (StatusCode::INTERNAL_SERVER_ERROR, 500),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                code,
            }),
        )
    }
}

/// Validate the Content-Type header
pub fn validate_content_type(headers: &HeaderMap, expected: &str) -> Result<(), ApiValidationError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !content_type.starts_with(expected) {
        return Err(ApiValidationError::ContentType(format!(
            "Expected content type '{}', got '{}'",
            expected, content_type
        )));
    }

    Ok(())
}

/// Validate a recommend request body against the schema
pub fn validate_recommend_request(body: &Value) -> Result<(), ApiValidationError> {
    let validation = RECOMMEND_REQUEST_SCHEMA.validate(body);
    if let Err(errors) = validation {
        let error_details: Vec<String> = errors
            .map(|err| format!("{:?} at {}", err.kind, err.instance_path))
            .collect();

        return Err(ApiValidationError::Schema(if error_details.is_empty() {
            "Schema validation failed".to_string()
        } else {
            error_details.join("; ")
        }));
    }

    Ok(())
}

/// Request size limit layer for the router
pub fn payload_limit_config() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE)
}
