// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end behaviour of [`Authorizer`] over the in-memory store.

use std::sync::Arc;
use warrant_core::{
	AccessControlContext, AccessControlContextEntry, AccessControlEntry, AccessControlEntryDefinition,
	ActionContext, DomainObject, MatchType, Noun, Permissions, Reference,
};
use warrant_engine::{
	admin_context_keys, AdministrativeActionGrantees, AuthorizationError, AuthorizationStore,
	Authorizer, FixedIdentity, IdentifierGenerator, IsolationLevel, MemoryStore, Options,
	StaticRoleProvider, Uuid7Generator, MANAGE_PERMISSIONS, VIEW_PERMISSIONS,
};

// =============================================================================
// Fixtures
// =============================================================================

fn default_object() -> DomainObject {
	DomainObject::new("", Noun::new("OBJECT", "DEFAULT"))
}

fn roles() -> StaticRoleProvider {
	StaticRoleProvider::new()
		.with_roles("administrator", ["USERS", "ADMINISTRATORS"])
		.with_roles("user", ["USERS"])
		.with_roles("poweruser", ["POWERUSERS", "ADMINISTRATORS"])
		.with_roles("sysadmin", ["SYSADMINS"])
}

async fn seeded_store() -> MemoryStore {
	let seeds = [
		(Noun::user("administrator"), MANAGE_PERMISSIONS, Permissions::ALLOWED),
		(Noun::group("USERS"), VIEW_PERMISSIONS, Permissions::ALLOWED),
		(Noun::user("adminuser"), MANAGE_PERMISSIONS, Permissions::ALLOWED),
		(Noun::group("POWERUSERS"), MANAGE_PERMISSIONS, Permissions::DENIED),
		(Noun::group("SYSADMINS"), MANAGE_PERMISSIONS, Permissions::ALLOWED),
	];

	let store = MemoryStore::new();
	let mut session = store.session(IsolationLevel::default()).await.unwrap();
	for (n, (subject, action, permissions)) in seeds.into_iter().enumerate() {
		let entry = AccessControlEntry {
			identifier: (n + 1).to_string(),
			definition: AccessControlEntryDefinition::new(action, permissions),
			registration: ActionContext::now(Reference::user("seeder")),
			last_update: None,
		};
		session
			.insert("", &default_object(), &subject, &entry)
			.await
			.unwrap();
	}
	session.commit().await.unwrap();
	store
}

fn authorizer(store: &MemoryStore, caller: &str, grantees: AdministrativeActionGrantees) -> Authorizer {
	let options = Options {
		grantees,
		..Options::default()
	};
	Authorizer::new(
		options,
		Arc::new(store.clone()),
		Arc::new(FixedIdentity::user(caller)),
		Arc::new(roles()),
		Arc::new(Uuid7Generator),
	)
}

fn view_for_user() -> Vec<AccessControlEntryDefinition> {
	vec![AccessControlEntryDefinition::new("VIEW", Permissions::ALLOWED)]
}

fn no_context() -> AccessControlContext {
	AccessControlContext::new()
}

// =============================================================================
// Permission checks
// =============================================================================

mod is_authorized {
	use super::*;

	#[tokio::test]
	async fn user_without_entry_is_denied() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let decision = authorizer
			.is_authorized(&Noun::user("user"), MANAGE_PERMISSIONS, &default_object(), &no_context(), "")
			.await
			.unwrap();
		assert_eq!(decision, Permissions::DENIED);
	}

	#[tokio::test]
	async fn user_with_entry_is_allowed() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let decision = authorizer
			.is_authorized(
				&Noun::user("administrator"),
				MANAGE_PERMISSIONS,
				&default_object(),
				&no_context(),
				"",
			)
			.await
			.unwrap();
		assert_eq!(decision, Permissions::ALLOWED);
	}

	#[tokio::test]
	async fn unknown_user_is_denied() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let decision = authorizer
			.is_authorized(&Noun::user("unknown"), MANAGE_PERMISSIONS, &default_object(), &no_context(), "")
			.await
			.unwrap();
		assert_eq!(decision, Permissions::DENIED);
	}

	#[tokio::test]
	async fn supplied_role_authorizes_unknown_user() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let decision = authorizer
			.is_authorized_with_roles(
				&Noun::user("unknown"),
				&["USERS".to_string()],
				VIEW_PERMISSIONS,
				&default_object(),
				&no_context(),
				"",
			)
			.await
			.unwrap();
		assert_eq!(decision, Permissions::ALLOWED);
	}

	#[tokio::test]
	async fn unknown_role_is_denied() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let decision = authorizer
			.is_authorized_with_roles(
				&Noun::user("user"),
				&["UNKNOWN".to_string()],
				MANAGE_PERMISSIONS,
				&default_object(),
				&no_context(),
				"",
			)
			.await
			.unwrap();
		assert_eq!(decision, Permissions::DENIED);
	}

	#[tokio::test]
	async fn denied_role_overrides_allowed_role() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let decision = authorizer
			.is_authorized_with_roles(
				&Noun::user("someone"),
				&["SYSADMINS".to_string(), "POWERUSERS".to_string()],
				MANAGE_PERMISSIONS,
				&default_object(),
				&no_context(),
				"",
			)
			.await
			.unwrap();
		assert_eq!(decision, Permissions::DENIED);
	}

	#[tokio::test]
	async fn provider_roles_are_looked_up() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let decision = authorizer
			.is_authorized(&Noun::user("sysadmin"), MANAGE_PERMISSIONS, &default_object(), &no_context(), "")
			.await
			.unwrap();
		assert_eq!(decision, Permissions::ALLOWED);
	}

	#[tokio::test]
	async fn blank_arguments_are_rejected() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);

		let blank_action = authorizer
			.is_authorized(&Noun::user("user"), " ", &default_object(), &no_context(), "")
			.await;
		assert!(matches!(blank_action, Err(AuthorizationError::Validation(_))));

		let blank_subject = authorizer
			.is_authorized(&Noun::user(""), "VIEW", &default_object(), &no_context(), "")
			.await;
		assert!(matches!(blank_subject, Err(AuthorizationError::Validation(_))));
	}
}

// =============================================================================
// Administration
// =============================================================================

mod allowed_users {
	use super::*;

	#[tokio::test]
	async fn administrator_may_set_entries() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		authorizer
			.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
			.await
			.unwrap();

		let decision = authorizer
			.is_authorized(&Noun::user("user"), "VIEW", &default_object(), &no_context(), "")
			.await
			.unwrap();
		assert_eq!(decision, Permissions::ALLOWED);
	}

	#[tokio::test]
	async fn permitted_group_member_may_set_entries() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "sysadmin", AdministrativeActionGrantees::AllowedUsers);
		let written = authorizer
			.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
			.await
			.unwrap();
		assert_eq!(written[0].registration.actor, Reference::user("sysadmin"));
	}

	#[tokio::test]
	async fn restricted_group_member_is_refused_despite_administrator_role() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "poweruser", AdministrativeActionGrantees::AllowedUsers);
		let result = authorizer
			.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
			.await;
		assert!(matches!(result, Err(AuthorizationError::NotAuthorized(_))));
		assert_eq!(store.len().await, 5);
	}

	#[tokio::test]
	async fn view_permission_does_not_grant_writes() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "user", AdministrativeActionGrantees::AllowedUsers);

		let lists = authorizer
			.access_control_lists("", &default_object())
			.await
			.unwrap();
		assert_eq!(lists.len(), 5);

		let result = authorizer
			.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
			.await;
		assert!(matches!(result, Err(AuthorizationError::NotAuthorized(_))));
	}

	#[tokio::test]
	async fn resubmitting_entries_is_idempotent() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let subject = Noun::user("user");

		let first = authorizer
			.set_access_control_entries("", &default_object(), &subject, &view_for_user())
			.await
			.unwrap();
		let second = authorizer
			.set_access_control_entries("", &default_object(), &subject, &view_for_user())
			.await
			.unwrap();

		assert_eq!(first[0].identifier, second[0].identifier);
		assert!(second[0].last_update.is_some());

		let stored = authorizer
			.access_control_entries("", &default_object(), &subject)
			.await
			.unwrap();
		assert_eq!(stored.len(), 1);
		assert_eq!(stored[0].identifier, first[0].identifier);
	}

	#[tokio::test]
	async fn lists_are_replaced_per_subject_in_one_write() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let object = DomainObject::new("crm", Noun::new("ACCOUNT", "42"));

		let lists = vec![
			(Noun::user("alice"), vec![AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)]),
			(Noun::group("SALES"), vec![AccessControlEntryDefinition::new("WRITE", Permissions::ALLOWED)]),
		];
		let result = authorizer.set_access_control_lists("", &object, &lists).await;
		// No MANAGE_PERMISSIONS entry exists in the crm domain, but the caller
		// is an administrator and nothing denies them.
		let written = result.unwrap();
		assert_eq!(written.len(), 2);

		let read_back = authorizer.access_control_lists("", &object).await.unwrap();
		assert_eq!(read_back.len(), 2);
	}

	#[tokio::test]
	async fn invalid_list_leaves_store_unchanged() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let lists = vec![
			(Noun::user("alice"), vec![AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)]),
			(Noun::user("bob"), vec![AccessControlEntryDefinition::new("", Permissions::ALLOWED)]),
		];
		let result = authorizer.set_access_control_lists("", &default_object(), &lists).await;
		assert!(matches!(result, Err(AuthorizationError::Validation(_))));
		assert_eq!(store.len().await, 5);
	}

	/// Hands out the same identifier every time.
	struct FixedIdGenerator;

	impl IdentifierGenerator for FixedIdGenerator {
		fn next_id(&self) -> String {
			"fixed".to_string()
		}
	}

	#[tokio::test]
	async fn store_failure_midway_through_lists_rolls_back_every_subject() {
		let store = seeded_store().await;
		let authorizer = Authorizer::new(
			Options {
				grantees: AdministrativeActionGrantees::AllowedUsers,
				..Options::default()
			},
			Arc::new(store.clone()),
			Arc::new(FixedIdentity::user("administrator")),
			Arc::new(roles()),
			Arc::new(FixedIdGenerator),
		);
		let object = DomainObject::new("crm", Noun::new("ACCOUNT", "42"));
		let lists = vec![
			(Noun::user("alice"), vec![AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)]),
			(Noun::user("bob"), vec![AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)]),
		];

		// alice takes "fixed", so bob's entry collides after alice was written.
		let result = authorizer.set_access_control_lists("", &object, &lists).await;
		assert!(matches!(result, Err(AuthorizationError::DuplicateIdentifier(ref id)) if id == "fixed"));

		assert_eq!(store.len().await, 5);
		let alice = authorizer
			.access_control_entries("", &object, &Noun::user("alice"))
			.await
			.unwrap();
		assert!(alice.is_empty());
	}

	#[tokio::test]
	async fn context_constrained_management_entry() {
		let store = seeded_store().await;
		let administrator = authorizer(&store, "administrator", AdministrativeActionGrantees::AllowedUsers);
		let crm = DomainObject::domain_wide("crm");

		// helpdesk may manage ticket entries anywhere in crm.
		let constrained = AccessControlEntryDefinition::new(MANAGE_PERMISSIONS, Permissions::ALLOWED)
			.with_context(AccessControlContextEntry::new(
				admin_context_keys::OBJECT_TYPE,
				MatchType::Equals,
				["TICKET"],
			));
		administrator
			.set_access_control_entries("", &crm, &Noun::user("helpdesk"), &[constrained])
			.await
			.unwrap();

		let helpdesk = authorizer(&store, "helpdesk", AdministrativeActionGrantees::AllowedUsers);
		helpdesk
			.set_access_control_entries(
				"",
				&DomainObject::new("crm", Noun::new("TICKET", "7")),
				&Noun::user("alice"),
				&[AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)],
			)
			.await
			.unwrap();

		let refused = helpdesk
			.set_access_control_entries(
				"",
				&DomainObject::new("crm", Noun::new("ACCOUNT", "7")),
				&Noun::user("alice"),
				&[AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)],
			)
			.await;
		assert!(matches!(refused, Err(AuthorizationError::NotAuthorized(_))));
	}
}

mod administrators {
	use super::*;

	#[tokio::test]
	async fn role_holders_may_write() {
		let store = seeded_store().await;
		for caller in ["administrator", "poweruser"] {
			let authorizer = authorizer(&store, caller, AdministrativeActionGrantees::Administrators);
			authorizer
				.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
				.await
				.unwrap();
		}
	}

	#[tokio::test]
	async fn poweruser_without_administrator_role_is_refused() {
		let store = seeded_store().await;
		let roles = StaticRoleProvider::new()
			.with_roles("administrator", ["ADMINISTRATORS"])
			.with_roles("poweruser", ["POWERUSERS"]);
		let authorizer_for = |caller: &str| {
			Authorizer::new(
				Options {
					grantees: AdministrativeActionGrantees::Administrators,
					administrator_role: "ADMINISTRATORS".to_string(),
					..Options::default()
				},
				Arc::new(store.clone()),
				Arc::new(FixedIdentity::user(caller)),
				Arc::new(roles.clone()),
				Arc::new(Uuid7Generator),
			)
		};

		authorizer_for("administrator")
			.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
			.await
			.unwrap();

		let result = authorizer_for("poweruser")
			.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
			.await;
		assert!(matches!(result, Err(AuthorizationError::NotAuthorized(_))));
	}

	#[tokio::test]
	async fn others_are_refused() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "sysadmin", AdministrativeActionGrantees::Administrators);
		let result = authorizer
			.set_access_control_entries("", &default_object(), &Noun::user("user"), &view_for_user())
			.await;
		assert!(matches!(result, Err(AuthorizationError::NotAuthorized(_))));

		let result = authorizer.access_control_lists("", &default_object()).await;
		assert!(matches!(result, Err(AuthorizationError::NotAuthorized(_))));
	}

	#[tokio::test]
	async fn administrative_user_needs_no_role() {
		let store = seeded_store().await;
		let options = Options {
			administrative_user: Some("root".to_string()),
			..Options::default()
		};
		let authorizer = Authorizer::new(
			options,
			Arc::new(store.clone()),
			Arc::new(FixedIdentity::user("root")),
			Arc::new(roles()),
			Arc::new(Uuid7Generator),
		);
		let lists = authorizer.access_control_lists("", &default_object()).await.unwrap();
		assert_eq!(lists.len(), 5);
	}
}

mod subject_mode {
	use super::*;

	#[tokio::test]
	async fn users_read_only_their_own_entries() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::Subject);

		let own = authorizer
			.access_control_entries("", &default_object(), &Noun::user("administrator"))
			.await
			.unwrap();
		assert_eq!(own.len(), 1);

		let other = authorizer
			.access_control_entries("", &default_object(), &Noun::user("adminuser"))
			.await;
		assert!(matches!(other, Err(AuthorizationError::NotAuthorized(_))));

		let group = authorizer
			.access_control_entries("", &default_object(), &Noun::group("administrator"))
			.await;
		assert!(matches!(group, Err(AuthorizationError::NotAuthorized(_))));
	}

	#[tokio::test]
	async fn lists_and_writes_are_refused() {
		let store = seeded_store().await;
		let authorizer = authorizer(&store, "administrator", AdministrativeActionGrantees::Subject);

		let lists = authorizer.access_control_lists("", &default_object()).await;
		assert!(matches!(lists, Err(AuthorizationError::NotAuthorized(_))));

		let write = authorizer
			.set_access_control_entries("", &default_object(), &Noun::user("administrator"), &view_for_user())
			.await;
		assert!(matches!(write, Err(AuthorizationError::NotAuthorized(_))));
	}
}
