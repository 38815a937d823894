// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static role assignments.
//!
//! ```toml
//! [[roles.assignments]]
//! user = "alice"
//! roles = ["ADMINISTRATORS"]
//!
//! [[roles.assignments]]
//! user = "bob"
//! domain = "crm"
//! roles = ["SALES"]
//! ```

use serde::Deserialize;
use warrant_engine::StaticRoleProvider;

/// Roles granted to one user, optionally limited to one domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleAssignment {
	pub user: String,
	#[serde(default)]
	pub domain: Option<String>,
	#[serde(default)]
	pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolesConfig {
	pub assignments: Vec<RoleAssignment>,
}

impl RolesConfig {
	pub fn role_provider(&self) -> StaticRoleProvider {
		self
			.assignments
			.iter()
			.fold(StaticRoleProvider::new(), |provider, assignment| {
				match &assignment.domain {
					Some(domain) => provider.with_domain_roles(
						assignment.user.clone(),
						domain.clone(),
						assignment.roles.iter().cloned(),
					),
					None => provider.with_roles(assignment.user.clone(), assignment.roles.iter().cloned()),
				}
			})
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolesConfigLayer {
	#[serde(default)]
	pub assignments: Option<Vec<RoleAssignment>>,
}

impl RolesConfigLayer {
	/// Assignments from a later source replace earlier ones wholesale.
	pub fn merge(&mut self, other: Self) {
		if other.assignments.is_some() {
			self.assignments = other.assignments;
		}
	}

	pub fn finalize(self) -> RolesConfig {
		RolesConfig {
			assignments: self.assignments.unwrap_or_default(),
		}
	}
}
