// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission flags carried by access control entries.
//!
//! [`Permissions`] is a bit set rather than a plain enum: role accumulation
//! ORs the results of several resolutions together, and aggregation keeps the
//! running maximum by ordinal (`NONE < DENIED < ALLOWED < GRANT`).

use serde::{Deserialize, Serialize};
use std::fmt;

bitflags::bitflags! {
	/// Flags granted or denied by an access control entry.
	///
	/// The empty set is [`Permissions::NONE`]: no applicable entry was found.
	/// It is distinct from [`Permissions::DENIED`], which is an explicit refusal.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
	pub struct Permissions: u8 {
		const DENIED = 1;
		const ALLOWED = 2;
		const GRANT = 4;
	}
}

impl Permissions {
	/// No applicable entry.
	pub const NONE: Self = Self::empty();

	/// True when the denied bit is set.
	pub fn is_denied(self) -> bool {
		self.contains(Self::DENIED)
	}

	/// True when the allowed bit is set and the denied bit is not.
	pub fn is_allowed(self) -> bool {
		self.contains(Self::ALLOWED) && !self.is_denied()
	}

	/// Collapses an effective permission into the answer given to callers:
	/// [`Permissions::ALLOWED`] or [`Permissions::DENIED`].
	pub fn decision(self) -> Self {
		if self.is_allowed() {
			Self::ALLOWED
		} else {
			Self::DENIED
		}
	}

	/// Lower-case names of the set flags, in bit order.
	pub fn flag_names(self) -> Vec<&'static str> {
		self
			.iter_names()
			.map(|(name, _)| match name {
				"DENIED" => "denied",
				"ALLOWED" => "allowed",
				_ => "grant",
			})
			.collect()
	}

	/// Parses a single lower- or upper-case flag name.
	pub fn from_flag_name(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"none" => Some(Self::NONE),
			"denied" => Some(Self::DENIED),
			"allowed" => Some(Self::ALLOWED),
			"grant" => Some(Self::GRANT),
			_ => None,
		}
	}
}

impl Default for Permissions {
	fn default() -> Self {
		Self::NONE
	}
}

impl fmt::Display for Permissions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return write!(f, "none");
		}
		write!(f, "{}", self.flag_names().join("|"))
	}
}
