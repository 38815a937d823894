// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use warrant_engine::IsolationLevel;
use warrant_server_api::{HealthResponse, HealthStatus};

use crate::api::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store is reachable", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Opens and releases a store session.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let version = env!("CARGO_PKG_VERSION").to_string();

	let result = match state
		.authorizer
		.store()
		.session(IsolationLevel::ReadCommitted)
		.await
	{
		Ok(session) => session.rollback().await,
		Err(e) => Err(e),
	};

	match result {
		Ok(()) => (
			StatusCode::OK,
			Json(HealthResponse {
				status: HealthStatus::Healthy,
				version,
				error: None,
			}),
		),
		Err(e) => {
			tracing::warn!(error = %e, "health check failed");
			(
				StatusCode::SERVICE_UNAVAILABLE,
				Json(HealthResponse {
					status: HealthStatus::Unhealthy,
					version,
					error: Some(e.to_string()),
				}),
			)
		}
	}
}
