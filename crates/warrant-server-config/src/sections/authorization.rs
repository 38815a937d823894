// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Administrative authorization policy.

use serde::Deserialize;
use warrant_engine::{AdministrativeActionGrantees, Options};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationConfig {
	pub administrator_role: String,
	pub administrative_user: Option<String>,
	pub management_domain: String,
	pub grantees: AdministrativeActionGrantees,
	pub view_permissions_action: String,
	pub manage_permissions_action: String,
}

impl Default for AuthorizationConfig {
	fn default() -> Self {
		Options::default().into()
	}
}

impl From<Options> for AuthorizationConfig {
	fn from(options: Options) -> Self {
		Self {
			administrator_role: options.administrator_role,
			administrative_user: options.administrative_user,
			management_domain: options.management_domain,
			grantees: options.grantees,
			view_permissions_action: options.view_permissions_action,
			manage_permissions_action: options.manage_permissions_action,
		}
	}
}

impl AuthorizationConfig {
	/// Engine options for this policy.
	pub fn options(&self) -> Options {
		Options {
			administrator_role: self.administrator_role.clone(),
			administrative_user: self.administrative_user.clone(),
			management_domain: self.management_domain.clone(),
			grantees: self.grantees,
			view_permissions_action: self.view_permissions_action.clone(),
			manage_permissions_action: self.manage_permissions_action.clone(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationConfigLayer {
	#[serde(default)]
	pub administrator_role: Option<String>,
	#[serde(default)]
	pub administrative_user: Option<String>,
	#[serde(default)]
	pub management_domain: Option<String>,
	/// `administrators`, `allowed_users` or `subject`.
	#[serde(default)]
	pub grantees: Option<String>,
	#[serde(default)]
	pub view_permissions_action: Option<String>,
	#[serde(default)]
	pub manage_permissions_action: Option<String>,
}

impl AuthorizationConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.administrator_role.is_some() {
			self.administrator_role = other.administrator_role;
		}
		if other.administrative_user.is_some() {
			self.administrative_user = other.administrative_user;
		}
		if other.management_domain.is_some() {
			self.management_domain = other.management_domain;
		}
		if other.grantees.is_some() {
			self.grantees = other.grantees;
		}
		if other.view_permissions_action.is_some() {
			self.view_permissions_action = other.view_permissions_action;
		}
		if other.manage_permissions_action.is_some() {
			self.manage_permissions_action = other.manage_permissions_action;
		}
	}

	pub fn finalize(self) -> Result<AuthorizationConfig, ConfigError> {
		let defaults = AuthorizationConfig::default();

		let grantees = match self.grantees {
			Some(mode) => mode
				.parse()
				.map_err(|message: String| ConfigError::invalid_value("authorization.grantees", message))?,
			None => defaults.grantees,
		};

		Ok(AuthorizationConfig {
			administrator_role: self.administrator_role.unwrap_or(defaults.administrator_role),
			administrative_user: self
				.administrative_user
				.filter(|user| !user.trim().is_empty()),
			management_domain: self.management_domain.unwrap_or(defaults.management_domain),
			grantees,
			view_permissions_action: self
				.view_permissions_action
				.unwrap_or(defaults.view_permissions_action),
			manage_permissions_action: self
				.manage_permissions_action
				.unwrap_or(defaults.manage_permissions_action),
		})
	}
}
