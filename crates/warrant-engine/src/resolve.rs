// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission resolution.
//!
//! Resolution runs in three layers, each built on the one below:
//!
//! 1. [`permission`] aggregates the entries stored for one exact scope
//! 2. [`scoped_permission`] widens the object scope while nothing applies
//! 3. [`accumulated_permission`] adds the subject's roles and management roles
//!
//! [`Permissions::NONE`] means nothing applied and lets the next scope or
//! role be consulted. [`Permissions::DENIED`] ends resolution at every layer.

use tracing::instrument;
use warrant_core::{AccessControlContext, DomainObject, Noun, Permissions, Result};

use crate::identity::RoleProvider;
use crate::store::AuthorizationSession;

/// The question being resolved.
#[derive(Debug, Clone, Copy)]
pub struct PermissionQuery<'a> {
	pub subject: &'a Noun,
	pub action: &'a str,
	pub object: &'a DomainObject,
	pub context: &'a AccessControlContext,
	pub purpose: &'a str,
}

impl<'a> PermissionQuery<'a> {
	/// The same question asked on behalf of another subject.
	pub fn for_subject<'b>(&self, subject: &'b Noun) -> PermissionQuery<'b>
	where
		'a: 'b,
	{
		PermissionQuery {
			subject,
			action: self.action,
			object: self.object,
			context: self.context,
			purpose: self.purpose,
		}
	}

	/// The same question asked about another object scope.
	pub fn for_object<'b>(&self, object: &'b DomainObject) -> PermissionQuery<'b>
	where
		'a: 'b,
	{
		PermissionQuery {
			subject: self.subject,
			action: self.action,
			object,
			context: self.context,
			purpose: self.purpose,
		}
	}
}

/// Aggregates the entries stored for exactly this scope.
///
/// An entry whose context constraints do not hold is skipped. A matching
/// entry carrying the denied bit returns [`Permissions::DENIED`] at once;
/// otherwise the highest permission by ordinal wins.
#[instrument(
	level = "trace",
	skip(session, query),
	fields(subject = %query.subject, action = query.action, object = %query.object)
)]
pub async fn permission(
	session: &mut dyn AuthorizationSession,
	query: &PermissionQuery<'_>,
) -> Result<Permissions> {
	let entries = session
		.access_control_entries(query.purpose, query.object, query.subject, Some(query.action))
		.await?;

	let mut permissions = Permissions::NONE;
	for entry in &entries {
		if !entry.definition.applies_to(query.context) {
			continue;
		}
		if entry.permissions().is_denied() {
			tracing::trace!(entry = %entry.identifier, "denied by entry");
			return Ok(Permissions::DENIED);
		}
		permissions = permissions.max(entry.permissions());
	}

	Ok(permissions)
}

/// Resolves against the exact object, then every object of its type, then
/// the whole domain, stopping at the first scope with an applicable entry.
///
/// Widening needs an object type. A domain-wide query is answered by its
/// exact scope alone.
pub async fn scoped_permission(
	session: &mut dyn AuthorizationSession,
	query: &PermissionQuery<'_>,
) -> Result<Permissions> {
	let permissions = permission(session, query).await?;
	if permissions != Permissions::NONE {
		return Ok(permissions);
	}

	if query.object.object_type().trim().is_empty() {
		return Ok(Permissions::NONE);
	}

	if !query.object.object_identifier().trim().is_empty() {
		let type_scope = query.object.object_type_scope();
		let permissions = permission(session, &query.for_object(&type_scope)).await?;
		if permissions != Permissions::NONE {
			return Ok(permissions);
		}
	}

	let domain_scope = query.object.domain_scope();
	permission(session, &query.for_object(&domain_scope)).await
}

/// ORs together the permissions of every role, resolved as a group subject.
/// Any role resolving to denied denies the whole set.
pub async fn roles_permission(
	session: &mut dyn AuthorizationSession,
	roles: &[String],
	query: &PermissionQuery<'_>,
) -> Result<Permissions> {
	let mut permissions = Permissions::NONE;
	for role in roles {
		let group = Noun::group(role.as_str());
		let role_permissions = scoped_permission(session, &query.for_subject(&group)).await?;
		if role_permissions.is_denied() {
			tracing::trace!(role = %role, "denied by role");
			return Ok(Permissions::DENIED);
		}
		permissions |= role_permissions;
	}
	Ok(permissions)
}

/// Resolves the subject together with `roles`.
///
/// A user subject outside the management domain also picks up the
/// permissions of the roles it holds in the management domain. Group
/// subjects and queries inside the management domain stop before that step,
/// which keeps the lookup to a single extra layer.
#[instrument(
	level = "debug",
	skip(session, role_provider, roles, query),
	fields(subject = %query.subject, action = query.action, object = %query.object)
)]
pub async fn accumulated_permission(
	session: &mut dyn AuthorizationSession,
	role_provider: &dyn RoleProvider,
	management_domain: &str,
	roles: &[String],
	query: &PermissionQuery<'_>,
) -> Result<Permissions> {
	let subject_permissions = scoped_permission(session, query).await?;
	if subject_permissions.is_denied() {
		return Ok(Permissions::DENIED);
	}

	let role_permissions = roles_permission(session, roles, query).await?;
	if role_permissions.is_denied() {
		return Ok(Permissions::DENIED);
	}

	let mut permissions = subject_permissions | role_permissions;

	if query.subject.is_group() || query.object.domain == management_domain {
		tracing::debug!(%permissions, "resolved");
		return Ok(permissions);
	}

	let management_roles = role_provider
		.user_roles(&query.subject.identifier, management_domain)
		.await;
	if !management_roles.is_empty() {
		let management_permissions = roles_permission(session, &management_roles, query).await?;
		if management_permissions.is_denied() {
			return Ok(Permissions::DENIED);
		}
		permissions |= management_permissions;
	}

	tracing::debug!(%permissions, "resolved");
	Ok(permissions)
}
