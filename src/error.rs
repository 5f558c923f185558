// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

//! API error type and the mapping from storage failures to HTTP statuses.
//!
//! Raw provider errors never reach the caller; only a status, a message
//! and (for storage failures) a short provider code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StoreError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Short upstream code (e.g. "storage"), when one exists.
    pub code: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_code("storage")
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // Fetch handlers convert NotFound to the sentinel response before
            // this mapping; anywhere else a missing row is a server bug.
            StoreError::NotFound(_) => ApiError::internal("Profile row disappeared"),
            StoreError::Conflict(message) => ApiError::conflict(message),
            StoreError::MissingUsername => {
                ApiError::bad_request("Wallet address and username are required")
            }
            StoreError::PermissionDenied(message) => ApiError::forbidden(message),
            StoreError::Storage(detail) => {
                tracing::error!(%detail, "profile store failure");
                ApiError::internal("Failed to save user profile")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            code: self.code,
        });
        (self.status, body).into_response()
    }
}
