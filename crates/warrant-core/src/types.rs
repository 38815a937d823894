// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity types shared by subjects, objects and actors.
//!
//! - [`Noun`]: a typed identifier naming a subject (user or group) or an object
//! - [`DomainObject`]: an optional object scoped to a domain
//! - [`Reference`]: a snapshot of who performed an administrative action
//!
//! A [`Noun`] with an empty identifier stands for every object of its type. A
//! [`DomainObject`] without an object stands for the whole domain. The scope
//! fallback resolver relies on both conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Subject Types
// =============================================================================

/// Well-known subject type names.
pub mod subject_types {
	/// An individual user.
	pub const USER: &str = "USER";
	/// A group or role. Roles returned by a role provider resolve as groups.
	pub const GROUP: &str = "GROUP";
}

// =============================================================================
// Noun
// =============================================================================

/// A typed identifier. Equality is structural over both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Noun {
	#[serde(rename = "type")]
	pub kind: String,
	pub identifier: String,
}

impl Noun {
	pub fn new(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			identifier: identifier.into(),
		}
	}

	/// A `USER` subject.
	pub fn user(identifier: impl Into<String>) -> Self {
		Self::new(subject_types::USER, identifier)
	}

	/// A `GROUP` subject.
	pub fn group(identifier: impl Into<String>) -> Self {
		Self::new(subject_types::GROUP, identifier)
	}

	/// A noun covering every object of `kind`.
	pub fn whole_type(kind: impl Into<String>) -> Self {
		Self::new(kind, String::new())
	}

	pub fn is_group(&self) -> bool {
		self.kind == subject_types::GROUP
	}

	pub fn is_user(&self) -> bool {
		self.kind == subject_types::USER
	}

	/// True when this noun names a whole type rather than one instance.
	pub fn is_whole_type(&self) -> bool {
		self.identifier.is_empty()
	}

	/// True when neither type nor identifier is set.
	pub fn is_empty(&self) -> bool {
		self.kind.is_empty() && self.identifier.is_empty()
	}
}

impl fmt::Display for Noun {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.kind, self.identifier)
	}
}

// =============================================================================
// Domain Object
// =============================================================================

/// An object scoped to a domain. `object: None` applies to the whole domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainObject {
	pub domain: String,
	#[serde(default)]
	pub object: Option<Noun>,
}

impl DomainObject {
	pub fn new(domain: impl Into<String>, object: Noun) -> Self {
		Self {
			domain: domain.into(),
			object: Some(object),
		}
	}

	/// The whole `domain`, regardless of object type.
	pub fn domain_wide(domain: impl Into<String>) -> Self {
		Self {
			domain: domain.into(),
			object: None,
		}
	}

	/// Type of the scoped object, or `""` when the scope is domain-wide.
	pub fn object_type(&self) -> &str {
		self.object.as_ref().map(|o| o.kind.as_str()).unwrap_or("")
	}

	/// Identifier of the scoped object, or `""` when absent.
	pub fn object_identifier(&self) -> &str {
		self
			.object
			.as_ref()
			.map(|o| o.identifier.as_str())
			.unwrap_or("")
	}

	/// The same domain, widened to every object of this object's type.
	pub fn object_type_scope(&self) -> Self {
		Self {
			domain: self.domain.clone(),
			object: self
				.object
				.as_ref()
				.map(|o| Noun::whole_type(o.kind.clone())),
		}
	}

	/// The same domain with the object dropped.
	pub fn domain_scope(&self) -> Self {
		Self::domain_wide(self.domain.clone())
	}

	/// True when no object is set, or the set object is empty.
	pub fn is_domain_wide(&self) -> bool {
		self.object.as_ref().map(Noun::is_empty).unwrap_or(true)
	}
}

impl fmt::Display for DomainObject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.object {
			Some(object) => write!(f, "{}/{}", self.domain, object),
			None => write!(f, "{}/*", self.domain),
		}
	}
}

// =============================================================================
// Reference
// =============================================================================

/// Denormalized snapshot of the actor behind a registration or update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
	#[serde(rename = "type")]
	pub kind: String,
	pub identifier: String,
}

impl Reference {
	pub fn new(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			identifier: identifier.into(),
		}
	}

	pub fn user(identifier: impl Into<String>) -> Self {
		Self::new(subject_types::USER, identifier)
	}
}

impl From<&Noun> for Reference {
	fn from(noun: &Noun) -> Self {
		Self::new(noun.kind.clone(), noun.identifier.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn noun_equality_is_structural() {
		assert_eq!(Noun::user("alice"), Noun::new("USER", "alice"));
		assert_ne!(Noun::user("alice"), Noun::group("alice"));
	}

	#[test]
	fn noun_serializes_kind_as_type() {
		let json = serde_json::to_value(Noun::group("USERS")).unwrap();
		assert_eq!(json["type"], "GROUP");
		assert_eq!(json["identifier"], "USERS");
	}

	#[test]
	fn object_type_scope_clears_identifier() {
		let object = DomainObject::new("crm", Noun::new("ACCOUNT", "42"));
		let widened = object.object_type_scope();
		assert_eq!(widened.domain, "crm");
		assert_eq!(widened.object, Some(Noun::whole_type("ACCOUNT")));
		assert_eq!(widened.object_identifier(), "");
	}

	#[test]
	fn domain_scope_drops_object() {
		let object = DomainObject::new("crm", Noun::new("ACCOUNT", "42"));
		let widened = object.domain_scope();
		assert!(widened.object.is_none());
		assert!(widened.is_domain_wide());
		assert_eq!(widened.object_type(), "");
	}

	#[test]
	fn empty_noun_is_domain_wide() {
		let object = DomainObject {
			domain: "crm".to_string(),
			object: Some(Noun::new("", "")),
		};
		assert!(object.is_domain_wide());
	}

	#[test]
	fn display_formats() {
		let object = DomainObject::new("crm", Noun::new("ACCOUNT", "42"));
		assert_eq!(object.to_string(), "crm/ACCOUNT:42");
		assert_eq!(DomainObject::domain_wide("crm").to_string(), "crm/*");
	}
}
