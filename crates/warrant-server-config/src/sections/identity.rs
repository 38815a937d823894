// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller identity resolution.

use serde::Deserialize;

const DEFAULT_HEADER: &str = "x-warrant-user";

/// The server trusts an upstream proxy to authenticate callers and pass the
/// user identifier in `header`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityConfig {
	pub header: String,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			header: DEFAULT_HEADER.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfigLayer {
	#[serde(default)]
	pub header: Option<String>,
}

impl IdentityConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.header.is_some() {
			self.header = other.header;
		}
	}

	pub fn finalize(self) -> IdentityConfig {
		IdentityConfig {
			header: self
				.header
				.map(|h| h.trim().to_ascii_lowercase())
				.unwrap_or_else(|| DEFAULT_HEADER.to_string()),
		}
	}
}
