// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller identity and role membership.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The principal on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalIdentity {
	pub identifier: String,
	pub display_name: String,
	pub is_authenticated: bool,
}

impl PrincipalIdentity {
	pub fn authenticated(identifier: impl Into<String>) -> Self {
		let identifier = identifier.into();
		Self {
			display_name: identifier.clone(),
			identifier,
			is_authenticated: true,
		}
	}

	pub fn anonymous() -> Self {
		Self {
			identifier: String::new(),
			display_name: String::new(),
			is_authenticated: false,
		}
	}
}

/// Resolves the principal for the operation in progress.
pub trait IdentityAccessor: Send + Sync {
	fn current_identity(&self) -> PrincipalIdentity;
}

/// An accessor that always answers with the same principal.
#[derive(Debug, Clone)]
pub struct FixedIdentity(PrincipalIdentity);

impl FixedIdentity {
	pub fn new(identity: PrincipalIdentity) -> Self {
		Self(identity)
	}

	pub fn user(identifier: impl Into<String>) -> Self {
		Self(PrincipalIdentity::authenticated(identifier))
	}
}

impl IdentityAccessor for FixedIdentity {
	fn current_identity(&self) -> PrincipalIdentity {
		self.0.clone()
	}
}

/// Role and group membership lookups.
#[async_trait]
pub trait RoleProvider: Send + Sync {
	/// Roles `identifier` holds within `domain`.
	async fn user_roles(&self, identifier: &str, domain: &str) -> Vec<String>;

	async fn user_is_in_role(&self, identifier: &str, role: &str) -> bool;

	/// True when `identifier` holds every role in `roles`.
	async fn user_is_in_roles(&self, identifier: &str, roles: &[String]) -> bool;
}

#[derive(Debug, Clone)]
struct Assignment {
	domain: Option<String>,
	roles: BTreeSet<String>,
}

/// In-process role assignments.
///
/// An assignment without a domain applies in every domain and is the only
/// kind consulted by [`RoleProvider::user_is_in_role`].
#[derive(Debug, Clone, Default)]
pub struct StaticRoleProvider {
	assignments: HashMap<String, Vec<Assignment>>,
}

impl StaticRoleProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Assigns `roles` to `user` in every domain.
	pub fn with_roles<I, S>(self, user: impl Into<String>, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.assign(user.into(), None, roles)
	}

	/// Assigns `roles` to `user` within `domain` only.
	pub fn with_domain_roles<I, S>(self, user: impl Into<String>, domain: impl Into<String>, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.assign(user.into(), Some(domain.into()), roles)
	}

	fn assign<I, S>(mut self, user: String, domain: Option<String>, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.assignments.entry(user).or_default().push(Assignment {
			domain,
			roles: roles.into_iter().map(Into::into).collect(),
		});
		self
	}

	fn global_roles(&self, identifier: &str) -> BTreeSet<&str> {
		self
			.assignments
			.get(identifier)
			.into_iter()
			.flatten()
			.filter(|a| a.domain.is_none())
			.flat_map(|a| a.roles.iter().map(String::as_str))
			.collect()
	}
}

#[async_trait]
impl RoleProvider for StaticRoleProvider {
	async fn user_roles(&self, identifier: &str, domain: &str) -> Vec<String> {
		let roles: BTreeSet<&String> = self
			.assignments
			.get(identifier)
			.into_iter()
			.flatten()
			.filter(|a| a.domain.as_deref().map_or(true, |d| d == domain))
			.flat_map(|a| a.roles.iter())
			.collect();
		roles.into_iter().cloned().collect()
	}

	async fn user_is_in_role(&self, identifier: &str, role: &str) -> bool {
		self.global_roles(identifier).contains(role)
	}

	async fn user_is_in_roles(&self, identifier: &str, roles: &[String]) -> bool {
		let held = self.global_roles(identifier);
		!held.is_empty() && roles.iter().all(|r| held.contains(r.as_str()))
	}
}
