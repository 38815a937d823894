// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use warrant_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<DbError> for StoreError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::Sqlx(sqlx::Error::Database(db)) if db.is_unique_violation() => {
				StoreError::Conflict(db.message().to_string())
			}
			DbError::Conflict(message) => StoreError::Conflict(message),
			DbError::Internal(message) => StoreError::Internal(message),
			DbError::Serialization(e) => StoreError::Serialization(e),
			other => StoreError::backend(other),
		}
	}
}
