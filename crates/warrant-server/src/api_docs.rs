// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for warrant-server, generated from Rust types using
//! utoipa. The raw JSON document is served at `/api-docs/openapi.json`.

use utoipa::OpenApi;
use warrant_server_api::{
	AccessControlEntryApi, AccessControlEntryDefinitionApi, AccessControlListApi,
	AccessControlListRequest, ContextEntryApi, DecisionApi, EffectivePermissionResponse,
	ErrorResponse, HealthResponse, HealthStatus, MatchTypeApi, NounApi, PermissionFlagApi,
	ReferenceApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warrant Server API",
        version = "1.0.0",
        description = "Authorization engine. Computes effective permissions from access control entries and administers those entries.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "authorizations", description = "Effective permissions and access control lists"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::authorizations::get_effective_permission,
        crate::routes::authorizations::get_access_control_lists,
        crate::routes::authorizations::get_access_control_entries,
        crate::routes::authorizations::set_access_control_entries,
        crate::routes::authorizations::set_access_control_lists,
        crate::routes::health::health_check,
    ),
    components(schemas(
        AccessControlEntryApi,
        AccessControlEntryDefinitionApi,
        AccessControlListApi,
        AccessControlListRequest,
        ContextEntryApi,
        DecisionApi,
        EffectivePermissionResponse,
        ErrorResponse,
        HealthResponse,
        HealthStatus,
        MatchTypeApi,
        NounApi,
        PermissionFlagApi,
        ReferenceApi,
    ))
)]
pub struct ApiDoc;
