// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Warrant authorization server.
//!
//! Exposes the authorization engine over HTTP with access control entries
//! persisted in SQLite.

pub mod api;
pub mod api_docs;
pub mod error;
pub mod identity;
pub mod routes;
pub mod startup;
pub mod version;

pub use api::{create_app_state, create_app_state_with_roles, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use identity::{identity_layer, RequestIdentity};
pub use warrant_server_config::ServerConfig;
