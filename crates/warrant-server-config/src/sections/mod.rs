// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each section has a partial `*ConfigLayer` that
//! sources produce and a resolved `*Config` the server consumes.

mod authorization;
mod database;
mod http;
mod identity;
mod logging;
mod roles;

pub use authorization::{AuthorizationConfig, AuthorizationConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use identity::{IdentityConfig, IdentityConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use roles::{RoleAssignment, RolesConfig, RolesConfigLayer};
