// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The [`Authorizer`] facade: permission checks and entry administration.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;
use warrant_core::validation::{
	validate_action, validate_definitions, validate_domain_object, validate_subject,
};
use warrant_core::{
	AccessControlContext, AccessControlEntry, AccessControlEntryDefinition, AccessControlList,
	AuthorizationError, DomainObject, Noun, Permissions, Reference, Result,
};

use crate::bootstrap::{AdministrativeCheck, AdministrativeOperation};
use crate::identity::{IdentityAccessor, PrincipalIdentity, RoleProvider};
use crate::ids::IdentifierGenerator;
use crate::mutation::Mutator;
use crate::options::Options;
use crate::resolve::{accumulated_permission, PermissionQuery};
use crate::store::{AuthorizationSession, AuthorizationStore, IsolationLevel};

/// Isolation for administrative writes.
const WRITE_ISOLATION: IsolationLevel = IsolationLevel::Serializable;

#[derive(Clone)]
pub struct Authorizer {
	options: Arc<Options>,
	store: Arc<dyn AuthorizationStore>,
	identity: Arc<dyn IdentityAccessor>,
	roles: Arc<dyn RoleProvider>,
	ids: Arc<dyn IdentifierGenerator>,
}

impl Authorizer {
	pub fn new(
		options: Options,
		store: Arc<dyn AuthorizationStore>,
		identity: Arc<dyn IdentityAccessor>,
		roles: Arc<dyn RoleProvider>,
		ids: Arc<dyn IdentifierGenerator>,
	) -> Self {
		Self {
			options: Arc::new(options),
			store,
			identity,
			roles,
			ids,
		}
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn store(&self) -> &Arc<dyn AuthorizationStore> {
		&self.store
	}

	// =========================================================================
	// Permission checks
	// =========================================================================

	/// Answers [`Permissions::ALLOWED`] or [`Permissions::DENIED`] for
	/// `subject` performing `action` on `object`.
	///
	/// A user subject's roles are looked up in the object's domain. Group
	/// subjects are resolved without roles.
	#[instrument(
		skip(self, object, context),
		fields(subject = %subject, object = %object)
	)]
	pub async fn is_authorized(
		&self,
		subject: &Noun,
		action: &str,
		object: &DomainObject,
		context: &AccessControlContext,
		purpose: &str,
	) -> Result<Permissions> {
		validate_subject(subject)?;
		validate_action(action)?;
		validate_domain_object(object)?;

		let roles = if subject.is_group() {
			Vec::new()
		} else {
			self.roles.user_roles(&subject.identifier, &object.domain).await
		};

		self.resolve_decision(subject, &roles, action, object, context, purpose).await
	}

	/// As [`Authorizer::is_authorized`], with the subject's roles supplied by
	/// the caller instead of the role provider.
	#[instrument(
		skip(self, roles, object, context),
		fields(subject = %subject, object = %object, roles = roles.len())
	)]
	pub async fn is_authorized_with_roles(
		&self,
		subject: &Noun,
		roles: &[String],
		action: &str,
		object: &DomainObject,
		context: &AccessControlContext,
		purpose: &str,
	) -> Result<Permissions> {
		validate_subject(subject)?;
		validate_action(action)?;
		validate_domain_object(object)?;

		self.resolve_decision(subject, roles, action, object, context, purpose).await
	}

	async fn resolve_decision(
		&self,
		subject: &Noun,
		roles: &[String],
		action: &str,
		object: &DomainObject,
		context: &AccessControlContext,
		purpose: &str,
	) -> Result<Permissions> {
		let query = PermissionQuery {
			subject,
			action,
			object,
			context,
			purpose,
		};

		let mut session = self.store.session(IsolationLevel::ReadCommitted).await?;
		let permissions = accumulated_permission(
			session.as_mut(),
			self.roles.as_ref(),
			&self.options.management_domain,
			roles,
			&query,
		)
		.await?;
		session.commit().await?;

		let decision = permissions.decision();
		tracing::debug!(%permissions, %decision, "authorization decided");
		Ok(decision)
	}

	// =========================================================================
	// Administration
	// =========================================================================

	/// Entries `subject` holds within (purpose, object).
	#[instrument(skip(self, object), fields(subject = %subject, object = %object))]
	pub async fn access_control_entries(
		&self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
	) -> Result<Vec<AccessControlEntry>> {
		validate_domain_object(object)?;
		validate_subject(subject)?;

		let caller = self.identity.current_identity();
		let mut session = self.store.session(IsolationLevel::ReadCommitted).await?;
		self
			.check(&caller)
			.authorize(
				session.as_mut(),
				AdministrativeOperation::ReadEntries { subject },
				purpose,
				object,
			)
			.await?;

		let entries = session
			.access_control_entries(purpose, object, subject, None)
			.await?;
		session.commit().await?;
		Ok(entries)
	}

	/// Entries for every subject within (purpose, object).
	#[instrument(skip(self, object), fields(object = %object))]
	pub async fn access_control_lists(
		&self,
		purpose: &str,
		object: &DomainObject,
	) -> Result<Vec<AccessControlList>> {
		validate_domain_object(object)?;

		let caller = self.identity.current_identity();
		let mut session = self.store.session(IsolationLevel::ReadCommitted).await?;
		self
			.check(&caller)
			.authorize(session.as_mut(), AdministrativeOperation::ReadLists, purpose, object)
			.await?;

		let lists = session.access_control_lists(purpose, object).await?;
		session.commit().await?;
		Ok(lists)
	}

	/// Replaces every entry `subject` holds within (purpose, object).
	#[instrument(skip(self, object, definitions), fields(subject = %subject, object = %object))]
	pub async fn set_access_control_entries(
		&self,
		purpose: &str,
		object: &DomainObject,
		subject: &Noun,
		definitions: &[AccessControlEntryDefinition],
	) -> Result<Vec<AccessControlEntry>> {
		validate_domain_object(object)?;
		validate_subject(subject)?;
		validate_definitions(definitions)?;

		let caller = self.identity.current_identity();
		let mut session = self.store.session(WRITE_ISOLATION).await?;
		self.authorize_write(session.as_mut(), &caller, purpose, object).await?;

		let written = self
			.mutator(&caller)
			.replace_entries(session.as_mut(), purpose, object, subject, definitions)
			.await?;
		session.commit().await?;
		Ok(written)
	}

	/// Replaces the entries of every listed subject within (purpose, object)
	/// under one authorization check and one transaction. Subjects not
	/// listed keep their entries.
	#[instrument(skip(self, object, lists), fields(object = %object, subjects = lists.len()))]
	pub async fn set_access_control_lists(
		&self,
		purpose: &str,
		object: &DomainObject,
		lists: &[(Noun, Vec<AccessControlEntryDefinition>)],
	) -> Result<Vec<AccessControlList>> {
		validate_domain_object(object)?;
		let mut seen = HashSet::new();
		for (subject, definitions) in lists {
			validate_subject(subject)?;
			validate_definitions(definitions)?;
			if !seen.insert(subject) {
				return Err(AuthorizationError::validation(format!(
					"{subject} is listed more than once"
				)));
			}
		}

		let caller = self.identity.current_identity();
		let mut session = self.store.session(WRITE_ISOLATION).await?;
		self.authorize_write(session.as_mut(), &caller, purpose, object).await?;

		let mutator = self.mutator(&caller);
		let mut written = Vec::with_capacity(lists.len());
		for (subject, definitions) in lists {
			let entries = mutator
				.replace_entries(session.as_mut(), purpose, object, subject, definitions)
				.await?;
			written.push(AccessControlList {
				subject: subject.clone(),
				entries,
			});
		}
		session.commit().await?;
		Ok(written)
	}

	fn check<'a>(&'a self, caller: &'a PrincipalIdentity) -> AdministrativeCheck<'a> {
		AdministrativeCheck {
			options: &self.options,
			roles: self.roles.as_ref(),
			caller,
		}
	}

	fn mutator(&self, caller: &PrincipalIdentity) -> Mutator<'_> {
		Mutator {
			actor: Reference::user(caller.identifier.as_str()),
			ids: self.ids.as_ref(),
		}
	}

	async fn authorize_write(
		&self,
		session: &mut dyn AuthorizationSession,
		caller: &PrincipalIdentity,
		purpose: &str,
		object: &DomainObject,
	) -> Result<()> {
		self
			.check(caller)
			.authorize(session, AdministrativeOperation::Write, purpose, object)
			.await
	}
}
