// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Connection pool setup.
//!
//! The database runs in WAL mode so deferred readers never block on a
//! writer. Writers open their transaction with `BEGIN IMMEDIATE` (see
//! [`crate::repository`]) and wait up to the busy timeout for the write lock,
//! which makes concurrent replacements of the same scope take turns.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

use crate::error::DbError;

/// How long a writer waits for the database write lock before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a SqlitePool with the default busy timeout.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./warrant.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid or connection fails.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	create_pool_with_busy_timeout(database_url, DEFAULT_BUSY_TIMEOUT).await
}

/// Create a SqlitePool in WAL mode, creating the database file if needed.
///
/// `busy_timeout` bounds how long a session queues behind another writer.
/// It must be non-zero for concurrent writes to serialize rather than fail.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool_with_busy_timeout(
	database_url: &str,
	busy_timeout: Duration,
) -> Result<SqlitePool, DbError> {
	if busy_timeout.is_zero() {
		return Err(DbError::Internal(
			"busy timeout must be greater than zero".to_string(),
		));
	}

	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.busy_timeout(busy_timeout)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!(busy_timeout_ms = busy_timeout.as_millis() as u64, "database pool created");
	Ok(pool)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn zero_busy_timeout_is_rejected() {
		let result = create_pool_with_busy_timeout("sqlite::memory:", Duration::ZERO).await;
		assert!(matches!(result, Err(DbError::Internal(_))));
	}

	#[tokio::test]
	async fn file_database_uses_wal() {
		let dir = tempfile::TempDir::new().unwrap();
		let url = format!("sqlite:{}", dir.path().join("wal.db").display());
		let pool = create_pool(&url).await.unwrap();

		let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
			.fetch_one(&pool)
			.await
			.unwrap();
		assert_eq!(mode.to_lowercase(), "wal");
	}
}
