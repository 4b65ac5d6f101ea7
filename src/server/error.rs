// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! JSON error responses: `{ "error": ..., "message": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::error;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
    /// Extra top-level fields merged into the body.
    pub extra: Map<String, Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
            extra: Map::new(),
        }
    }

    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error, message)
    }

    /// A 500 for a failed operation. The cause is logged and echoed as the
    /// message.
    pub fn internal(error: impl Into<String>, cause: &crate::Error) -> Self {
        let error = error.into();
        error!(%cause, "{error}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, cause.to_string())
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.error,
            "message": self.message,
        });
        if let Value::Object(map) = &mut body {
            map.extend(self.extra);
        }
        (self.status, Json(body)).into_response()
    }
}
