// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wholesale replacement of a subject's entries within one scope.

use warrant_core::{
	AccessControlEntry, AccessControlEntryDefinition, ActionContext, AuthorizationError, DomainObject,
	Noun, Reference, Result,
};

use crate::ids::IdentifierGenerator;
use crate::store::AuthorizationSession;

/// Who is replacing entries, and where new identifiers come from.
pub struct Mutator<'a> {
	pub actor: Reference,
	pub ids: &'a dyn IdentifierGenerator,
}

impl Mutator<'_> {
	/// Replaces every entry `subject` holds within (purpose, object) with
	/// `definitions`.
	///
	/// A definition matching an existing entry on action and permissions keeps
	/// that entry's identifier and registration and records a fresh update.
	/// Anything else is registered under a newly generated identifier.
	#[tracing::instrument(
		skip(self, session, object, definitions),
		fields(subject = %subject, object = %object, definitions = definitions.len())
	)]
	pub async fn replace_entries(
		&self,
		session: &mut dyn AuthorizationSession,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		definitions: &[AccessControlEntryDefinition],
	) -> Result<Vec<AccessControlEntry>> {
		let mut existing = session
			.access_control_entries(purpose, object, subject, None)
			.await?;
		let removed = session
			.delete_access_control_entries(purpose, object, Some(subject))
			.await?;

		let mut written = Vec::with_capacity(definitions.len());
		for definition in definitions {
			let reused = existing
				.iter()
				.position(|e| e.definition.same_rule(definition))
				.map(|at| existing.swap_remove(at));

			let entry = match reused {
				Some(previous) => AccessControlEntry {
					identifier: previous.identifier,
					definition: definition.clone(),
					registration: previous.registration,
					last_update: Some(ActionContext::now(self.actor.clone())),
				},
				None => {
					let identifier = self.ids.next_id();
					if session.access_control_entry_exists(&identifier).await? {
						return Err(AuthorizationError::DuplicateIdentifier(identifier));
					}
					AccessControlEntry {
						identifier,
						definition: definition.clone(),
						registration: ActionContext::now(self.actor.clone()),
						last_update: None,
					}
				}
			};

			session.insert(purpose, object, subject, &entry).await?;
			written.push(entry);
		}

		tracing::info!(removed, written = written.len(), "access control entries replaced");
		Ok(written)
	}
}
