// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use warrant_core::{AuthorizationError, StoreError};
use warrant_server_api::ErrorResponse;

/// Server error types.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Error raised by the authorization engine.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),

	/// Invalid request payload or parameters.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	/// No caller identity on the request.
	#[error("Unauthorized: {0}")]
	Unauthorized(String),

	/// Internal server error.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl From<StoreError> for ServerError {
	fn from(err: StoreError) -> Self {
		Self::Authorization(AuthorizationError::Store(err))
	}
}

fn body(error: &str, message: impl Into<String>) -> ErrorResponse {
	ErrorResponse {
		error: error.to_string(),
		message: message.into(),
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error_response) = match &self {
			ServerError::Authorization(AuthorizationError::Validation(message)) => (
				StatusCode::BAD_REQUEST,
				body("validation_error", message.clone()),
			),
			ServerError::Authorization(AuthorizationError::NotAuthorized(message)) => (
				StatusCode::FORBIDDEN,
				body("forbidden", message.clone()),
			),
			ServerError::Authorization(AuthorizationError::DuplicateIdentifier(identifier)) => (
				StatusCode::CONFLICT,
				body(
					"conflict",
					format!("Identifier {identifier} is already in use"),
				),
			),
			ServerError::Authorization(AuthorizationError::Store(e)) => {
				tracing::error!(error = %e, "store error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					body("store_error", "A store error occurred"),
				)
			}
			ServerError::BadRequest(message) => {
				(StatusCode::BAD_REQUEST, body("bad_request", message.clone()))
			}
			ServerError::Unauthorized(message) => (
				StatusCode::UNAUTHORIZED,
				body("unauthorized", message.clone()),
			),
			ServerError::Internal(message) => {
				tracing::error!(error = %message, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					body("internal_error", "An internal error occurred"),
				)
			}
		};

		(status, Json(error_response)).into_response()
	}
}
