// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authorization repository for database operations.
//!
//! [`AuthorizationRepository`] opens one SQLite transaction per session.
//! Serializable sessions begin `IMMEDIATE` and so hold the database write
//! lock from their first statement; the others are deferred readers.
//! Context constraints are stored as JSON, permissions as their bit value
//! and timestamps as RFC 3339 text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use std::collections::BTreeMap;
use warrant_core::{
	AccessControlContextEntry, AccessControlEntry, AccessControlEntryDefinition, AccessControlList,
	ActionContext, DomainObject, Noun, Permissions, Reference, StoreError,
};
use warrant_engine::{AuthorizationSession, AuthorizationStore, IsolationLevel};

use crate::error::DbError;

const ENTRY_COLUMNS: &str = r#"
	identifier, subject_type, subject_identifier, action, context, permissions,
	registered_at, registrant_type, registrant_identifier,
	last_updated_at, last_updater_type, last_updater_identifier
"#;

/// Repository for access control entries.
#[derive(Clone)]
pub struct AuthorizationRepository {
	pool: SqlitePool,
}

impl AuthorizationRepository {
	/// Create a new repository with the given pool.
	///
	/// # Arguments
	/// * `pool` - SQLite connection pool with the schema applied
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Checks that a connection can be acquired and used.
	#[tracing::instrument(skip(self))]
	pub async fn ping(&self) -> Result<(), DbError> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}

	/// Total number of stored entries.
	#[tracing::instrument(skip(self))]
	pub async fn count(&self) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS n FROM authorizations")
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("n"))
	}
}

#[async_trait]
impl AuthorizationStore for AuthorizationRepository {
	async fn session(
		&self,
		isolation: IsolationLevel,
	) -> Result<Box<dyn AuthorizationSession>, StoreError> {
		// A deferred transaction that reads and then writes cannot wait for the
		// write lock: SQLite fails the upgrade with SQLITE_BUSY at once. Writers
		// take the lock up front so they queue on the busy timeout instead.
		let tx = match isolation {
			IsolationLevel::Serializable => self.pool.begin_with("BEGIN IMMEDIATE").await,
			IsolationLevel::ReadCommitted | IsolationLevel::RepeatableRead => self.pool.begin().await,
		}
		.map_err(DbError::from)?;
		tracing::trace!(?isolation, "sqlite session opened");
		Ok(Box::new(AuthorizationTransaction { tx }))
	}
}

/// A session backed by one SQLite transaction. Dropping it rolls back.
pub struct AuthorizationTransaction {
	tx: Transaction<'static, Sqlite>,
}

impl AuthorizationTransaction {
	async fn select_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		action: Option<&str>,
	) -> Result<Vec<AccessControlEntry>, DbError> {
		let sql = format!(
			r#"
			SELECT {ENTRY_COLUMNS}
			FROM authorizations
			WHERE domain = ? AND purpose = ? AND object_type = ? AND object_identifier = ?
				AND subject_type = ? AND subject_identifier = ?
				AND (? IS NULL OR action = ?)
			ORDER BY action
			"#
		);
		let rows = sqlx::query(&sql)
			.bind(&object.domain)
			.bind(purpose)
			.bind(object.object_type())
			.bind(object.object_identifier())
			.bind(&subject.kind)
			.bind(&subject.identifier)
			.bind(action)
			.bind(action)
			.fetch_all(&mut *self.tx)
			.await?;

		rows.iter().map(row_to_entry).collect()
	}

	async fn select_lists(
		&mut self,
		purpose: &str,
		object: &DomainObject,
	) -> Result<Vec<AccessControlList>, DbError> {
		let sql = format!(
			r#"
			SELECT {ENTRY_COLUMNS}
			FROM authorizations
			WHERE domain = ? AND purpose = ? AND object_type = ? AND object_identifier = ?
			ORDER BY subject_type, subject_identifier, action
			"#
		);
		let rows = sqlx::query(&sql)
			.bind(&object.domain)
			.bind(purpose)
			.bind(object.object_type())
			.bind(object.object_identifier())
			.fetch_all(&mut *self.tx)
			.await?;

		let mut lists: BTreeMap<Noun, Vec<AccessControlEntry>> = BTreeMap::new();
		for row in &rows {
			let subject = Noun::new(
				row.get::<String, _>("subject_type"),
				row.get::<String, _>("subject_identifier"),
			);
			lists.entry(subject).or_default().push(row_to_entry(row)?);
		}

		Ok(lists
			.into_iter()
			.map(|(subject, entries)| AccessControlList { subject, entries })
			.collect())
	}

	async fn delete_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: Option<&Noun>,
	) -> Result<u64, DbError> {
		let subject_type = subject.map(|s| s.kind.as_str());
		let subject_identifier = subject.map(|s| s.identifier.as_str());
		let result = sqlx::query(
			r#"
			DELETE FROM authorizations
			WHERE domain = ? AND purpose = ? AND object_type = ? AND object_identifier = ?
				AND (? IS NULL OR (subject_type = ? AND subject_identifier = ?))
			"#,
		)
		.bind(&object.domain)
		.bind(purpose)
		.bind(object.object_type())
		.bind(object.object_identifier())
		.bind(subject_type)
		.bind(subject_type)
		.bind(subject_identifier)
		.execute(&mut *self.tx)
		.await?;

		Ok(result.rows_affected())
	}

	async fn entry_exists(&mut self, identifier: &str) -> Result<bool, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS n FROM authorizations WHERE identifier = ?")
			.bind(identifier)
			.fetch_one(&mut *self.tx)
			.await?;
		let n: i64 = row.get("n");
		Ok(n > 0)
	}

	async fn insert_entry(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		entry: &AccessControlEntry,
	) -> Result<(), DbError> {
		let context = serde_json::to_string(&entry.definition.context)?;
		let last_update = entry.last_update.as_ref();

		sqlx::query(
			r#"
			INSERT INTO authorizations (
				identifier, domain, purpose, object_type, object_identifier,
				subject_type, subject_identifier, action, context, permissions,
				registered_at, registrant_type, registrant_identifier,
				last_updated_at, last_updater_type, last_updater_identifier
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&entry.identifier)
		.bind(&object.domain)
		.bind(purpose)
		.bind(object.object_type())
		.bind(object.object_identifier())
		.bind(&subject.kind)
		.bind(&subject.identifier)
		.bind(entry.action())
		.bind(context)
		.bind(i64::from(entry.permissions().bits()))
		.bind(entry.registration.timestamp.to_rfc3339())
		.bind(&entry.registration.actor.kind)
		.bind(&entry.registration.actor.identifier)
		.bind(last_update.map(|u| u.timestamp.to_rfc3339()))
		.bind(last_update.map(|u| u.actor.kind.clone()))
		.bind(last_update.map(|u| u.actor.identifier.clone()))
		.execute(&mut *self.tx)
		.await?;

		tracing::trace!(identifier = %entry.identifier, "entry inserted");
		Ok(())
	}
}

#[async_trait]
impl AuthorizationSession for AuthorizationTransaction {
	async fn access_control_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		action: Option<&str>,
	) -> Result<Vec<AccessControlEntry>, StoreError> {
		Ok(self.select_entries(purpose, object, subject, action).await?)
	}

	async fn access_control_lists(
		&mut self,
		purpose: &str,
		object: &DomainObject,
	) -> Result<Vec<AccessControlList>, StoreError> {
		Ok(self.select_lists(purpose, object).await?)
	}

	async fn delete_access_control_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: Option<&Noun>,
	) -> Result<u64, StoreError> {
		Ok(self.delete_entries(purpose, object, subject).await?)
	}

	async fn access_control_entry_exists(&mut self, identifier: &str) -> Result<bool, StoreError> {
		Ok(self.entry_exists(identifier).await?)
	}

	async fn insert(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		entry: &AccessControlEntry,
	) -> Result<(), StoreError> {
		Ok(self.insert_entry(purpose, object, subject, entry).await?)
	}

	async fn commit(self: Box<Self>) -> Result<(), StoreError> {
		let AuthorizationTransaction { tx } = *self;
		tx.commit().await.map_err(DbError::from)?;
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
		let AuthorizationTransaction { tx } = *self;
		tx.rollback().await.map_err(DbError::from)?;
		Ok(())
	}
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|t| t.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

fn row_to_entry(row: &SqliteRow) -> Result<AccessControlEntry, DbError> {
	let context: String = row.try_get("context")?;
	let context: Vec<AccessControlContextEntry> = serde_json::from_str(&context)?;

	let bits: i64 = row.try_get("permissions")?;
	let permissions = u8::try_from(bits)
		.ok()
		.and_then(Permissions::from_bits)
		.ok_or_else(|| DbError::Internal(format!("Invalid permissions: {bits}")))?;

	let registered_at: String = row.try_get("registered_at")?;
	let registration = ActionContext {
		actor: Reference::new(
			row.try_get::<String, _>("registrant_type")?,
			row.try_get::<String, _>("registrant_identifier")?,
		),
		timestamp: parse_timestamp(&registered_at, "registered_at")?,
	};

	let last_updated_at: Option<String> = row.try_get("last_updated_at")?;
	let last_update = match last_updated_at {
		Some(at) => Some(ActionContext {
			actor: Reference::new(
				row.try_get::<Option<String>, _>("last_updater_type")?.unwrap_or_default(),
				row.try_get::<Option<String>, _>("last_updater_identifier")?.unwrap_or_default(),
			),
			timestamp: parse_timestamp(&at, "last_updated_at")?,
		}),
		None => None,
	};

	Ok(AccessControlEntry {
		identifier: row.try_get("identifier")?,
		definition: AccessControlEntryDefinition {
			action: row.try_get("action")?,
			context,
			permissions,
		},
		registration,
		last_update,
	})
}
