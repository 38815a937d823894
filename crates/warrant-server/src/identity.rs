// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Per-request caller identity.
//!
//! An upstream proxy authenticates the caller and forwards the user
//! identifier in a trusted header. [`identity_layer`] reads that header and
//! runs the rest of the request inside a task-local scope, where
//! [`RequestIdentity`] finds it when the engine asks who is calling.
//!
//! ```ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let routes = Router::new()
//!     .route("/authorizations/...", get(handler))
//!     .route_layer(from_fn_with_state(state.clone(), identity_layer));
//! ```

use axum::{
	body::Body,
	extract::State,
	http::{HeaderMap, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use warrant_engine::{IdentityAccessor, PrincipalIdentity};

use crate::{api::AppState, error::ServerError};

tokio::task_local! {
	static CALLER: PrincipalIdentity;
}

/// Identity accessor backed by the task-local set by [`identity_layer`].
/// Outside a request scope the caller is anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdentity;

impl IdentityAccessor for RequestIdentity {
	fn current_identity(&self) -> PrincipalIdentity {
		CALLER
			.try_with(Clone::clone)
			.unwrap_or_else(|_| PrincipalIdentity::anonymous())
	}
}

/// Reads the caller from `header`. Blank values count as absent.
pub fn caller_from_headers(headers: &HeaderMap, header: &str) -> Option<PrincipalIdentity> {
	headers
		.get(header)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.map(PrincipalIdentity::authenticated)
}

/// Rejects requests without a caller and scopes the rest to that caller.
pub async fn identity_layer(
	State(state): State<AppState>,
	request: Request<Body>,
	next: Next,
) -> Response {
	match caller_from_headers(request.headers(), &state.identity_header) {
		Some(caller) => {
			tracing::debug!(caller = %caller.identifier, "request identity resolved");
			CALLER.scope(caller, next.run(request)).await
		}
		None => {
			tracing::debug!(header = %state.identity_header, "request has no caller identity");
			ServerError::Unauthorized("Authentication required".to_string()).into_response()
		}
	}
}
