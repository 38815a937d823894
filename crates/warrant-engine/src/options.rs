// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved action checked before reading access control entries.
pub const VIEW_PERMISSIONS: &str = "VIEW_PERMISSIONS";

/// Reserved action checked before replacing access control entries.
pub const MANAGE_PERMISSIONS: &str = "MANAGE_PERMISSIONS";

/// Context keys synthesized for administrative checks. Entries granting
/// the view or manage actions may constrain on these.
pub mod admin_context_keys {
	pub const SUBJECT_TYPE: &str = "SUBJECT.TYPE";
	pub const SUBJECT_IDENTIFIER: &str = "SUBJECT.IDENTIFIER";
	pub const OBJECT_TYPE: &str = "OBJECT.TYPE";
	pub const OBJECT_IDENTIFIER: &str = "OBJECT.IDENTIFIER";
	pub const OBJECT_DOMAIN: &str = "OBJECT.DOMAIN";
	pub const PURPOSE: &str = "PURPOSE";
}

/// Who may read and replace access control entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrativeActionGrantees {
	/// The administrative user and holders of the administrator role.
	#[default]
	Administrators,
	/// Callers whose entries allow the view or manage action, plus
	/// administrators who are not explicitly denied.
	AllowedUsers,
	/// A user may read their own entries. Nobody may write.
	Subject,
}

impl fmt::Display for AdministrativeActionGrantees {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Administrators => "administrators",
			Self::AllowedUsers => "allowed_users",
			Self::Subject => "subject",
		};
		write!(f, "{name}")
	}
}

impl FromStr for AdministrativeActionGrantees {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
			"administrators" => Ok(Self::Administrators),
			"allowed_users" | "allowedusers" => Ok(Self::AllowedUsers),
			"subject" => Ok(Self::Subject),
			other => Err(format!("unknown administrative grantees mode: {other}")),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
	pub administrator_role: String,
	/// A user treated as an administrator regardless of roles.
	pub administrative_user: Option<String>,
	/// Domain whose roles extend every user's permissions elsewhere.
	pub management_domain: String,
	pub grantees: AdministrativeActionGrantees,
	pub view_permissions_action: String,
	pub manage_permissions_action: String,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			administrator_role: "ADMINISTRATORS".to_string(),
			administrative_user: None,
			management_domain: String::new(),
			grantees: AdministrativeActionGrantees::default(),
			view_permissions_action: VIEW_PERMISSIONS.to_string(),
			manage_permissions_action: MANAGE_PERMISSIONS.to_string(),
		}
	}
}
