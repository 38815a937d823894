// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	middleware::from_fn_with_state,
	routing::get,
	Json, Router,
};
use utoipa::OpenApi;
use warrant_engine::{AuthorizationStore, Authorizer, RoleProvider, Uuid7Generator};
use warrant_server_config::ServerConfig;

use crate::{api_docs::ApiDoc, identity::identity_layer, identity::RequestIdentity, routes};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
	pub authorizer: Authorizer,
	/// Lower-case name of the trusted caller header.
	pub identity_header: Arc<str>,
}

/// Builds the state from configuration, using role assignments from the
/// config file.
pub fn create_app_state(config: &ServerConfig, store: Arc<dyn AuthorizationStore>) -> AppState {
	create_app_state_with_roles(config, store, Arc::new(config.roles.role_provider()))
}

/// Builds the state with a caller-supplied role provider.
pub fn create_app_state_with_roles(
	config: &ServerConfig,
	store: Arc<dyn AuthorizationStore>,
	roles: Arc<dyn RoleProvider>,
) -> AppState {
	let authorizer = Authorizer::new(
		config.authorization.options(),
		store,
		Arc::new(RequestIdentity),
		roles,
		Arc::new(Uuid7Generator),
	);

	AppState {
		authorizer,
		identity_header: Arc::from(config.identity.header.as_str()),
	}
}

/// Creates the router. Routes under `/authorizations` require a caller
/// identity; health and the OpenAPI document do not.
pub fn create_router(state: AppState) -> Router {
	let authorizations = Router::new()
		.route(
			"/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/effectivePermission",
			get(routes::authorizations::get_effective_permission),
		)
		.route(
			"/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/accessControlLists",
			get(routes::authorizations::get_access_control_lists)
				.post(routes::authorizations::set_access_control_lists),
		)
		.route(
			"/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/accessControlLists/subjects/{subject_type}/{subject_identifier}",
			get(routes::authorizations::get_access_control_entries)
				.post(routes::authorizations::set_access_control_entries),
		)
		.route_layer(from_fn_with_state(state.clone(), identity_layer));

	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
		.merge(authorizations)
		.with_state(state)
}
