// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::Deserialize;

use crate::sections::{
	AuthorizationConfigLayer, DatabaseConfigLayer, HttpConfigLayer, IdentityConfigLayer,
	LoggingConfigLayer, RolesConfigLayer,
};

/// One source's view of the server configuration. Every section is optional
/// so that higher-precedence sources only override what they set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub authorization: Option<AuthorizationConfigLayer>,
	#[serde(default)]
	pub identity: Option<IdentityConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub roles: Option<RolesConfigLayer>,
}

fn merge_section<T>(target: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T))
where
	T: Default,
{
	if let Some(other) = other {
		merge(target.get_or_insert_with(T::default), other);
	}
}

impl ServerConfigLayer {
	/// Overlays `other` on top of `self`.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(
			&mut self.authorization,
			other.authorization,
			AuthorizationConfigLayer::merge,
		);
		merge_section(&mut self.identity, other.identity, IdentityConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.roles, other.roles, RolesConfigLayer::merge);
	}
}
