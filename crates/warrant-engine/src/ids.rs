// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Produces identifiers for newly created access control entries.
///
/// Identifiers must be unique across the process and should increase
/// monotonically. A collision with a stored identifier fails the write.
pub trait IdentifierGenerator: Send + Sync {
	fn next_id(&self) -> String;
}

/// Time-ordered UUIDv7 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uuid7Generator;

impl IdentifierGenerator for Uuid7Generator {
	fn next_id(&self) -> String {
		uuid7::uuid7().to_string()
	}
}
