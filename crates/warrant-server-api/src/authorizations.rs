// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response types for the `/authorizations` routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warrant_core::{
	AccessControlContext, AccessControlContextEntry, AccessControlEntry,
	AccessControlEntryDefinition, AccessControlList, MatchType, Noun, Permissions, Reference,
};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Nouns
// =============================================================================

/// A typed identifier naming a subject or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NounApi {
	/// `USER`, `GROUP`, or an application-defined object type.
	#[serde(rename = "type")]
	pub kind: String,
	pub identifier: String,
}

impl From<NounApi> for Noun {
	fn from(noun: NounApi) -> Self {
		Noun::new(noun.kind, noun.identifier)
	}
}

impl From<&Noun> for NounApi {
	fn from(noun: &Noun) -> Self {
		Self {
			kind: noun.kind.clone(),
			identifier: noun.identifier.clone(),
		}
	}
}

/// The actor behind a registration or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ReferenceApi {
	#[serde(rename = "type")]
	pub kind: String,
	pub identifier: String,
}

impl From<&Reference> for ReferenceApi {
	fn from(reference: &Reference) -> Self {
		Self {
			kind: reference.kind.clone(),
			identifier: reference.identifier.clone(),
		}
	}
}

// =============================================================================
// Permissions
// =============================================================================

/// One permission flag. A set of flags is sent as a list; an empty list
/// means no permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PermissionFlagApi {
	Denied,
	Allowed,
	Grant,
}

impl PermissionFlagApi {
	pub fn from_permissions(permissions: Permissions) -> Vec<Self> {
		let mut flags = Vec::new();
		if permissions.contains(Permissions::DENIED) {
			flags.push(Self::Denied);
		}
		if permissions.contains(Permissions::ALLOWED) {
			flags.push(Self::Allowed);
		}
		if permissions.contains(Permissions::GRANT) {
			flags.push(Self::Grant);
		}
		flags
	}

	pub fn to_permissions(flags: &[Self]) -> Permissions {
		flags
			.iter()
			.fold(Permissions::NONE, |acc, flag| acc | Permissions::from(*flag))
	}
}

impl From<PermissionFlagApi> for Permissions {
	fn from(flag: PermissionFlagApi) -> Self {
		match flag {
			PermissionFlagApi::Denied => Permissions::DENIED,
			PermissionFlagApi::Allowed => Permissions::ALLOWED,
			PermissionFlagApi::Grant => Permissions::GRANT,
		}
	}
}

/// The answer to an effective permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DecisionApi {
	Allowed,
	Denied,
}

impl From<Permissions> for DecisionApi {
	fn from(permissions: Permissions) -> Self {
		if permissions.is_allowed() {
			Self::Allowed
		} else {
			Self::Denied
		}
	}
}

// =============================================================================
// Context
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum MatchTypeApi {
	Equals,
	In,
	Like,
	NotEqual,
	NotIn,
	/// Unrecognized match types are kept but never match.
	#[serde(other)]
	Unknown,
}

impl From<MatchTypeApi> for MatchType {
	fn from(match_type: MatchTypeApi) -> Self {
		match match_type {
			MatchTypeApi::Equals => MatchType::Equals,
			MatchTypeApi::In => MatchType::In,
			MatchTypeApi::Like => MatchType::Like,
			MatchTypeApi::NotEqual => MatchType::NotEqual,
			MatchTypeApi::NotIn => MatchType::NotIn,
			MatchTypeApi::Unknown => MatchType::Unknown,
		}
	}
}

impl From<MatchType> for MatchTypeApi {
	fn from(match_type: MatchType) -> Self {
		match match_type {
			MatchType::Equals => Self::Equals,
			MatchType::In => Self::In,
			MatchType::Like => Self::Like,
			MatchType::NotEqual => Self::NotEqual,
			MatchType::NotIn => Self::NotIn,
			MatchType::Unknown => Self::Unknown,
		}
	}
}

/// A constraint on the request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ContextEntryApi {
	pub key: String,
	pub match_type: MatchTypeApi,
	#[serde(default)]
	pub values: Vec<String>,
}

impl From<ContextEntryApi> for AccessControlContextEntry {
	fn from(entry: ContextEntryApi) -> Self {
		AccessControlContextEntry::new(entry.key, entry.match_type.into(), entry.values)
	}
}

impl From<&AccessControlContextEntry> for ContextEntryApi {
	fn from(entry: &AccessControlContextEntry) -> Self {
		Self {
			key: entry.key.clone(),
			match_type: entry.match_type.into(),
			values: entry.values.clone(),
		}
	}
}

// =============================================================================
// Entries
// =============================================================================

/// A rule to store: what `permissions` apply to `action` under `context`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccessControlEntryDefinitionApi {
	pub action: String,
	#[serde(default)]
	pub context: Vec<ContextEntryApi>,
	#[serde(default)]
	pub permissions: Vec<PermissionFlagApi>,
}

impl From<AccessControlEntryDefinitionApi> for AccessControlEntryDefinition {
	fn from(definition: AccessControlEntryDefinitionApi) -> Self {
		AccessControlEntryDefinition {
			permissions: PermissionFlagApi::to_permissions(&definition.permissions),
			action: definition.action,
			context: definition.context.into_iter().map(Into::into).collect(),
		}
	}
}

/// A stored rule with its identifier and audit stamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccessControlEntryApi {
	pub identifier: String,
	pub action: String,
	pub context: Vec<ContextEntryApi>,
	pub permissions: Vec<PermissionFlagApi>,
	pub registered_by: ReferenceApi,
	pub registered_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_by: Option<ReferenceApi>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_updated_at: Option<DateTime<Utc>>,
}

impl From<&AccessControlEntry> for AccessControlEntryApi {
	fn from(entry: &AccessControlEntry) -> Self {
		Self {
			identifier: entry.identifier.clone(),
			action: entry.definition.action.clone(),
			context: entry.definition.context.iter().map(Into::into).collect(),
			permissions: PermissionFlagApi::from_permissions(entry.definition.permissions),
			registered_by: (&entry.registration.actor).into(),
			registered_at: entry.registration.timestamp,
			last_updated_by: entry.last_update.as_ref().map(|u| (&u.actor).into()),
			last_updated_at: entry.last_update.as_ref().map(|u| u.timestamp),
		}
	}
}

/// The entries held by one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccessControlListApi {
	pub subject: NounApi,
	pub entries: Vec<AccessControlEntryApi>,
}

impl From<&AccessControlList> for AccessControlListApi {
	fn from(list: &AccessControlList) -> Self {
		Self {
			subject: (&list.subject).into(),
			entries: list.entries.iter().map(Into::into).collect(),
		}
	}
}

/// The complete set of rules to store for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccessControlListRequest {
	pub subject: NounApi,
	#[serde(default)]
	pub entries: Vec<AccessControlEntryDefinitionApi>,
}

impl AccessControlListRequest {
	pub fn into_parts(self) -> (Noun, Vec<AccessControlEntryDefinition>) {
		(
			self.subject.into(),
			self.entries.into_iter().map(Into::into).collect(),
		)
	}
}

// =============================================================================
// Effective permission
// =============================================================================

/// Query parameters for an effective permission lookup.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct EffectivePermissionQuery {
	pub subject_type: String,
	pub subject_identifier: String,
	pub action: String,
	/// JSON object of context values, e.g. `{"region":["eu"]}`.
	#[serde(default)]
	pub context: Option<String>,
}

impl EffectivePermissionQuery {
	pub fn subject(&self) -> Noun {
		Noun::new(self.subject_type.clone(), self.subject_identifier.clone())
	}

	/// Decodes the `context` parameter. Absent means empty.
	pub fn context(&self) -> Result<AccessControlContext, serde_json::Error> {
		match self.context.as_deref() {
			Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw),
			_ => Ok(AccessControlContext::new()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EffectivePermissionResponse {
	pub permission: DecisionApi,
}

/// Error body returned by every authorization route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}
