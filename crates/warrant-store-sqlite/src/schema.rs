// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema for the `authorizations` table.
//!
//! One row per access control entry. Absent objects are stored as an empty
//! object type and identifier so that uniqueness covers domain-wide entries.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const CREATE_AUTHORIZATIONS: &str = r#"
	CREATE TABLE IF NOT EXISTS authorizations (
		identifier TEXT NOT NULL PRIMARY KEY,
		domain TEXT NOT NULL,
		purpose TEXT NOT NULL,
		object_type TEXT NOT NULL,
		object_identifier TEXT NOT NULL,
		subject_type TEXT NOT NULL,
		subject_identifier TEXT NOT NULL,
		action TEXT NOT NULL,
		context TEXT NOT NULL,
		permissions INTEGER NOT NULL,
		registered_at TEXT NOT NULL,
		registrant_type TEXT NOT NULL,
		registrant_identifier TEXT NOT NULL,
		last_updated_at TEXT,
		last_updater_type TEXT,
		last_updater_identifier TEXT,
		UNIQUE (domain, purpose, object_type, object_identifier, subject_type, subject_identifier, action)
	)
"#;

const CREATE_SUBJECT_INDEX: &str = r#"
	CREATE INDEX IF NOT EXISTS idx_authorizations_subject
	ON authorizations (subject_type, subject_identifier)
"#;

/// Creates the schema if it does not exist yet. Safe to run on every start.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	let mut tx = pool.begin().await?;
	sqlx::query(CREATE_AUTHORIZATIONS).execute(&mut *tx).await?;
	sqlx::query(CREATE_SUBJECT_INDEX).execute(&mut *tx).await?;
	tx.commit().await?;

	tracing::debug!("authorization schema ready");
	Ok(())
}
