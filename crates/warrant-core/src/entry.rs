// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control entries and their definitions.
//!
//! A definition is what a caller submits: an action, optional context
//! constraints and the permission flags. An entry is a stored definition with
//! an identifier and its audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{context_matches, AccessControlContext, AccessControlContextEntry};
use crate::permissions::Permissions;
use crate::types::{Noun, Reference};

/// Who did something, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
	pub actor: Reference,
	pub timestamp: DateTime<Utc>,
}

impl ActionContext {
	/// Stamps `actor` with the current UTC time.
	pub fn now(actor: Reference) -> Self {
		Self {
			actor,
			timestamp: Utc::now(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlEntryDefinition {
	pub action: String,
	#[serde(default)]
	pub context: Vec<AccessControlContextEntry>,
	pub permissions: Permissions,
}

impl AccessControlEntryDefinition {
	pub fn new(action: impl Into<String>, permissions: Permissions) -> Self {
		Self {
			action: action.into(),
			context: Vec::new(),
			permissions,
		}
	}

	pub fn with_context(mut self, entry: AccessControlContextEntry) -> Self {
		self.context.push(entry);
		self
	}

	/// True when this definition applies under `context`.
	pub fn applies_to(&self, context: &AccessControlContext) -> bool {
		context_matches(&self.context, context)
	}

	/// Two definitions are the same rule when action and permissions agree.
	/// Context constraints do not take part: a resubmitted rule with edited
	/// constraints keeps its identifier.
	pub fn same_rule(&self, other: &Self) -> bool {
		self.action == other.action && self.permissions == other.permissions
	}
}

/// A stored access control entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlEntry {
	pub identifier: String,
	#[serde(flatten)]
	pub definition: AccessControlEntryDefinition,
	pub registration: ActionContext,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_update: Option<ActionContext>,
}

impl AccessControlEntry {
	pub fn action(&self) -> &str {
		&self.definition.action
	}

	pub fn permissions(&self) -> Permissions {
		self.definition.permissions
	}
}

/// Every entry one subject holds within a (purpose, domain object) scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
	pub subject: Noun,
	pub entries: Vec<AccessControlEntry>,
}
