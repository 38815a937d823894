// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage seam for access control entries.
//!
//! Every engine operation opens one [`AuthorizationSession`] and threads it
//! through resolution as `&mut dyn AuthorizationSession`. A session is a
//! transaction: it must be committed explicitly, and one that is dropped
//! without [`AuthorizationSession::commit`] is rolled back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use warrant_core::{AccessControlEntry, AccessControlList, DomainObject, Noun, StoreError};

/// Transaction isolation requested when opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
	#[default]
	ReadCommitted,
	RepeatableRead,
	Serializable,
}

#[async_trait]
pub trait AuthorizationStore: Send + Sync {
	/// Opens a session. The session holds its transaction until it is
	/// committed, rolled back or dropped.
	async fn session(
		&self,
		isolation: IsolationLevel,
	) -> Result<Box<dyn AuthorizationSession>, StoreError>;
}

#[async_trait]
pub trait AuthorizationSession: Send {
	/// Entries matching the scope exactly. `action: None` returns every action.
	async fn access_control_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		action: Option<&str>,
	) -> Result<Vec<AccessControlEntry>, StoreError>;

	/// Entries for every subject within the scope, grouped by subject.
	async fn access_control_lists(
		&mut self,
		purpose: &str,
		object: &DomainObject,
	) -> Result<Vec<AccessControlList>, StoreError>;

	/// Deletes entries within the scope. `subject: None` clears every subject.
	/// Returns the number of entries removed.
	async fn delete_access_control_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: Option<&Noun>,
	) -> Result<u64, StoreError>;

	async fn access_control_entry_exists(&mut self, identifier: &str) -> Result<bool, StoreError>;

	async fn insert(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		entry: &AccessControlEntry,
	) -> Result<(), StoreError>;

	async fn commit(self: Box<Self>) -> Result<(), StoreError>;

	async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
