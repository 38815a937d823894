// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process transactional store.
//!
//! A session takes the store lock for its whole lifetime and works on a copy
//! of the data. Commit swaps the copy in; rollback or drop discards it.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use warrant_core::{AccessControlEntry, AccessControlList, DomainObject, Noun, StoreError};

use crate::store::{AuthorizationSession, AuthorizationStore, IsolationLevel};

/// Normalized location of an entry. An absent object is stored as an empty
/// type and identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scope {
	purpose: String,
	domain: String,
	object_type: String,
	object_identifier: String,
}

impl Scope {
	fn new(purpose: &str, object: &DomainObject) -> Self {
		Self {
			purpose: purpose.to_string(),
			domain: object.domain.clone(),
			object_type: object.object_type().to_string(),
			object_identifier: object.object_identifier().to_string(),
		}
	}
}

#[derive(Debug, Clone)]
struct StoredEntry {
	scope: Scope,
	subject: Noun,
	entry: AccessControlEntry,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
	entries: Vec<StoredEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of committed entries.
	pub async fn len(&self) -> usize {
		self.state.lock().await.entries.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}

#[async_trait]
impl AuthorizationStore for MemoryStore {
	async fn session(
		&self,
		isolation: IsolationLevel,
	) -> Result<Box<dyn AuthorizationSession>, StoreError> {
		let guard = self.state.clone().lock_owned().await;
		let working = guard.clone();
		tracing::trace!(?isolation, "memory session opened");
		Ok(Box::new(MemorySession { guard, working }))
	}
}

pub struct MemorySession {
	guard: OwnedMutexGuard<MemoryState>,
	working: MemoryState,
}

impl MemorySession {
	fn in_scope<'a>(
		&'a self,
		scope: &'a Scope,
	) -> impl Iterator<Item = &'a StoredEntry> + 'a {
		self.working.entries.iter().filter(move |e| e.scope == *scope)
	}
}

#[async_trait]
impl AuthorizationSession for MemorySession {
	async fn access_control_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		action: Option<&str>,
	) -> Result<Vec<AccessControlEntry>, StoreError> {
		let scope = Scope::new(purpose, object);
		Ok(self
			.in_scope(&scope)
			.filter(|e| e.subject == *subject)
			.filter(|e| action.map_or(true, |a| e.entry.action() == a))
			.map(|e| e.entry.clone())
			.collect())
	}

	async fn access_control_lists(
		&mut self,
		purpose: &str,
		object: &DomainObject,
	) -> Result<Vec<AccessControlList>, StoreError> {
		let scope = Scope::new(purpose, object);
		let mut lists: BTreeMap<Noun, Vec<AccessControlEntry>> = BTreeMap::new();
		for stored in self.in_scope(&scope) {
			lists
				.entry(stored.subject.clone())
				.or_default()
				.push(stored.entry.clone());
		}
		Ok(lists
			.into_iter()
			.map(|(subject, entries)| AccessControlList { subject, entries })
			.collect())
	}

	async fn delete_access_control_entries(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: Option<&Noun>,
	) -> Result<u64, StoreError> {
		let scope = Scope::new(purpose, object);
		let before = self.working.entries.len();
		self.working.entries.retain(|e| {
			!(e.scope == scope && subject.map_or(true, |s| e.subject == *s))
		});
		Ok((before - self.working.entries.len()) as u64)
	}

	async fn access_control_entry_exists(&mut self, identifier: &str) -> Result<bool, StoreError> {
		Ok(self
			.working
			.entries
			.iter()
			.any(|e| e.entry.identifier == identifier))
	}

	async fn insert(
		&mut self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		entry: &AccessControlEntry,
	) -> Result<(), StoreError> {
		if self.access_control_entry_exists(&entry.identifier).await? {
			return Err(StoreError::Conflict(format!(
				"identifier {} already exists",
				entry.identifier
			)));
		}

		let scope = Scope::new(purpose, object);
		let duplicate_action = self
			.in_scope(&scope)
			.any(|e| e.subject == *subject && e.entry.action() == entry.action());
		if duplicate_action {
			return Err(StoreError::Conflict(format!(
				"{subject} already has an entry for {} on {object}",
				entry.action()
			)));
		}

		self.working.entries.push(StoredEntry {
			scope,
			subject: subject.clone(),
			entry: entry.clone(),
		});
		Ok(())
	}

	async fn commit(self: Box<Self>) -> Result<(), StoreError> {
		let MemorySession { mut guard, working } = *self;
		*guard = working;
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
		Ok(())
	}
}
