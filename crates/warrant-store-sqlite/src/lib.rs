// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! SQLite storage for Warrant.

pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;
#[cfg(test)]
pub mod testing;

pub use error::{DbError, Result};
pub use pool::{create_pool, create_pool_with_busy_timeout, DEFAULT_BUSY_TIMEOUT};
pub use repository::{AuthorizationRepository, AuthorizationTransaction};
pub use schema::run_migrations;
