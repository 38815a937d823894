// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argument validation. Runs before any store access.

use std::collections::HashSet;

use crate::entry::AccessControlEntryDefinition;
use crate::error::{AuthorizationError, Result};
use crate::types::{DomainObject, Noun};

fn is_blank(value: &str) -> bool {
	value.trim().is_empty()
}

/// Subjects must carry both a type and an identifier.
pub fn validate_subject(subject: &Noun) -> Result<()> {
	if is_blank(&subject.kind) {
		return Err(AuthorizationError::validation("subject type is required"));
	}
	if is_blank(&subject.identifier) {
		return Err(AuthorizationError::validation(
			"subject identifier is required",
		));
	}
	Ok(())
}

pub fn validate_action(action: &str) -> Result<()> {
	if is_blank(action) {
		return Err(AuthorizationError::validation("action is required"));
	}
	Ok(())
}

/// A present object needs a type. Its identifier may be empty (whole type).
pub fn validate_domain_object(object: &DomainObject) -> Result<()> {
	if let Some(noun) = &object.object {
		if is_blank(&noun.kind) {
			return Err(AuthorizationError::validation("object type is required"));
		}
	}
	Ok(())
}

/// Every definition needs an action, and one submission may hold at most
/// one definition per action.
pub fn validate_definitions(definitions: &[AccessControlEntryDefinition]) -> Result<()> {
	let mut actions = HashSet::new();
	for definition in definitions {
		validate_action(&definition.action)?;
		if !actions.insert(definition.action.as_str()) {
			return Err(AuthorizationError::validation(format!(
				"duplicate definition for action {}",
				definition.action
			)));
		}
		for constraint in &definition.context {
			if is_blank(&constraint.key) {
				return Err(AuthorizationError::validation("context key is required"));
			}
		}
	}
	Ok(())
}
