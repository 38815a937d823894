// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization for administering access control entries.
//!
//! Reading or replacing entries is itself an authorized action. Depending on
//! [`AdministrativeActionGrantees`], the check consults the configured
//! administrators, the resolution pipeline for the reserved view and manage
//! actions, or the identity of the subject being read.

use warrant_core::{AccessControlContext, AuthorizationError, DomainObject, Noun, Result};

use crate::identity::{PrincipalIdentity, RoleProvider};
use crate::options::{admin_context_keys, AdministrativeActionGrantees, Options};
use crate::resolve::{accumulated_permission, PermissionQuery};
use crate::store::AuthorizationSession;

/// The administrative operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdministrativeOperation<'a> {
	/// Reading one subject's entries.
	ReadEntries { subject: &'a Noun },
	/// Reading every subject's entries.
	ReadLists,
	/// Replacing entries.
	Write,
}

impl AdministrativeOperation<'_> {
	fn is_write(&self) -> bool {
		matches!(self, Self::Write)
	}

	fn subject(&self) -> Option<&Noun> {
		match self {
			Self::ReadEntries { subject } => Some(subject),
			_ => None,
		}
	}
}

impl std::fmt::Display for AdministrativeOperation<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ReadEntries { subject } => write!(f, "read entries of {subject}"),
			Self::ReadLists => write!(f, "read access control lists"),
			Self::Write => write!(f, "modify access control entries"),
		}
	}
}

/// Context exposed to entries granting the view or manage actions.
///
/// Subject keys are present only when a single subject is read. Object type
/// and identifier keys are present only when the scope names an object.
pub fn administrative_context(
	purpose: &str,
	object: &DomainObject,
	subject: Option<&Noun>,
) -> AccessControlContext {
	let mut context = AccessControlContext::new();
	context.insert(
		admin_context_keys::OBJECT_DOMAIN.to_string(),
		vec![object.domain.clone()],
	);
	context.insert(admin_context_keys::PURPOSE.to_string(), vec![purpose.to_string()]);

	if let Some(noun) = &object.object {
		context.insert(admin_context_keys::OBJECT_TYPE.to_string(), vec![noun.kind.clone()]);
		context.insert(
			admin_context_keys::OBJECT_IDENTIFIER.to_string(),
			vec![noun.identifier.clone()],
		);
	}

	if let Some(subject) = subject {
		context.insert(admin_context_keys::SUBJECT_TYPE.to_string(), vec![subject.kind.clone()]);
		context.insert(
			admin_context_keys::SUBJECT_IDENTIFIER.to_string(),
			vec![subject.identifier.clone()],
		);
	}

	context
}

/// Decides administrative operations for one caller.
pub struct AdministrativeCheck<'a> {
	pub options: &'a Options,
	pub roles: &'a dyn RoleProvider,
	pub caller: &'a PrincipalIdentity,
}

impl AdministrativeCheck<'_> {
	/// The administrative user, or a holder of the administrator role.
	pub async fn caller_is_administrator(&self) -> bool {
		let identifier = self.caller.identifier.as_str();
		if self.options.administrative_user.as_deref() == Some(identifier) {
			return true;
		}
		self
			.roles
			.user_is_in_role(identifier, &self.options.administrator_role)
			.await
	}

	/// Fails with [`AuthorizationError::NotAuthorized`] unless the caller may
	/// perform `operation` within the scope.
	#[tracing::instrument(
		skip(self, session, object),
		fields(caller = %self.caller.identifier, object = %object, grantees = %self.options.grantees)
	)]
	pub async fn authorize(
		&self,
		session: &mut dyn AuthorizationSession,
		operation: AdministrativeOperation<'_>,
		purpose: &str,
		object: &DomainObject,
	) -> Result<()> {
		let allowed = if !self.caller.is_authenticated || self.caller.identifier.trim().is_empty() {
			false
		} else {
			match self.options.grantees {
				AdministrativeActionGrantees::Administrators => self.caller_is_administrator().await,
				AdministrativeActionGrantees::AllowedUsers => {
					self.caller_is_granted(session, operation, purpose, object).await?
				}
				AdministrativeActionGrantees::Subject => match operation {
					AdministrativeOperation::ReadEntries { subject } => {
						subject.is_user()
							&& !subject.identifier.is_empty()
							&& subject.identifier == self.caller.identifier
					}
					_ => false,
				},
			}
		};

		if !allowed {
			tracing::warn!(%operation, "administrative operation refused");
			return Err(AuthorizationError::not_authorized(format!(
				"{} may not {operation} on {object}",
				self.caller.identifier
			)));
		}

		tracing::debug!(%operation, "administrative operation permitted");
		Ok(())
	}

	/// Resolves the reserved action for the caller. An explicit denial blocks
	/// even administrators.
	async fn caller_is_granted(
		&self,
		session: &mut dyn AuthorizationSession,
		operation: AdministrativeOperation<'_>,
		purpose: &str,
		object: &DomainObject,
	) -> Result<bool> {
		let action = if operation.is_write() {
			self.options.manage_permissions_action.as_str()
		} else {
			self.options.view_permissions_action.as_str()
		};

		let caller = Noun::user(self.caller.identifier.as_str());
		let context = administrative_context(purpose, object, operation.subject());
		let roles = self.roles.user_roles(&caller.identifier, &object.domain).await;
		let query = PermissionQuery {
			subject: &caller,
			action,
			object,
			context: &context,
			purpose,
		};

		let permissions = accumulated_permission(
			session,
			self.roles,
			&self.options.management_domain,
			&roles,
			&query,
		)
		.await?;

		Ok(permissions.is_allowed()
			|| (!permissions.is_denied() && self.caller_is_administrator().await))
	}
}
