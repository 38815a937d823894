// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The authorizer running against a file-backed SQLite database.

use std::sync::Arc;
use tempfile::TempDir;
use warrant_core::{AccessControlContext, AccessControlEntryDefinition, DomainObject, Noun, Permissions};
use warrant_engine::{
	AdministrativeActionGrantees, AuthorizationError, Authorizer, FixedIdentity, Options,
	StaticRoleProvider, Uuid7Generator,
};
use warrant_store_sqlite::{create_pool, run_migrations, AuthorizationRepository};

async fn setup(dir: &TempDir) -> AuthorizationRepository {
	let path = dir.path().join("warrant.db");
	let pool = create_pool(&format!("sqlite:{}?mode=rwc", path.display()))
		.await
		.unwrap();
	run_migrations(&pool).await.unwrap();
	AuthorizationRepository::new(pool)
}

fn authorizer(repo: &AuthorizationRepository, caller: &str) -> Authorizer {
	Authorizer::new(
		Options {
			grantees: AdministrativeActionGrantees::Administrators,
			..Options::default()
		},
		Arc::new(repo.clone()),
		Arc::new(FixedIdentity::user(caller)),
		Arc::new(StaticRoleProvider::new().with_roles("root", ["ADMINISTRATORS"])),
		Arc::new(Uuid7Generator),
	)
}

fn account() -> DomainObject {
	DomainObject::new("crm", Noun::new("ACCOUNT", "42"))
}

#[tokio::test]
async fn entries_survive_reopening_the_database() {
	let dir = TempDir::new().unwrap();
	let alice = Noun::user("alice");

	{
		let repo = setup(&dir).await;
		authorizer(&repo, "root")
			.set_access_control_entries(
				"",
				&DomainObject::new("crm", Noun::whole_type("ACCOUNT")),
				&alice,
				&[AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)],
			)
			.await
			.unwrap();
		repo.pool().close().await;
	}

	let repo = setup(&dir).await;
	assert_eq!(repo.count().await.unwrap(), 1);

	let decision = authorizer(&repo, "root")
		.is_authorized(&alice, "READ", &account(), &AccessControlContext::new(), "")
		.await
		.unwrap();
	assert_eq!(decision, Permissions::ALLOWED);
}

#[tokio::test]
async fn idempotent_replacement_keeps_identifiers() {
	let dir = TempDir::new().unwrap();
	let repo = setup(&dir).await;
	let authorizer = authorizer(&repo, "root");
	let alice = Noun::user("alice");
	let definitions = [
		AccessControlEntryDefinition::new("READ", Permissions::ALLOWED),
		AccessControlEntryDefinition::new("WRITE", Permissions::DENIED),
	];

	let first = authorizer
		.set_access_control_entries("", &account(), &alice, &definitions)
		.await
		.unwrap();
	let second = authorizer
		.set_access_control_entries("", &account(), &alice, &definitions)
		.await
		.unwrap();

	assert_eq!(repo.count().await.unwrap(), 2);
	for (before, after) in first.iter().zip(&second) {
		assert_eq!(before.identifier, after.identifier);
		assert!(after.last_update.is_some());
	}

	let stored = authorizer
		.access_control_entries("", &account(), &alice)
		.await
		.unwrap();
	assert_eq!(stored.len(), 2);
	assert!(stored.iter().all(|e| e.last_update.is_some()));
}

#[tokio::test]
async fn refused_write_changes_nothing() {
	let dir = TempDir::new().unwrap();
	let repo = setup(&dir).await;

	let result = authorizer(&repo, "mallory")
		.set_access_control_entries(
			"",
			&account(),
			&Noun::user("mallory"),
			&[AccessControlEntryDefinition::new("READ", Permissions::ALLOWED)],
		)
		.await;
	assert!(matches!(result, Err(AuthorizationError::NotAuthorized(_))));
	assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_to_one_scope_take_turns() {
	let dir = TempDir::new().unwrap();
	let repo = setup(&dir).await;
	let authorizer = Arc::new(authorizer(&repo, "root"));
	let alice = Noun::user("alice");

	for round in 0..5 {
		let writers: Vec<_> = (0..8)
			.map(|writer| {
				let authorizer = Arc::clone(&authorizer);
				let alice = alice.clone();
				tokio::spawn(async move {
					let definitions = [
						AccessControlEntryDefinition::new("READ", Permissions::ALLOWED),
						AccessControlEntryDefinition::new(
							format!("ACTION_{round}_{writer}"),
							Permissions::DENIED,
						),
					];
					authorizer
						.set_access_control_entries("", &account(), &alice, &definitions)
						.await
				})
			})
			.collect();

		for writer in writers {
			let written = writer.await.unwrap();
			assert!(written.is_ok(), "round {round}: {:?}", written.err());
		}
	}

	// The last writer's two entries replaced everything before them.
	assert_eq!(repo.count().await.unwrap(), 2);
	let stored = authorizer
		.access_control_entries("", &account(), &alice)
		.await
		.unwrap();
	assert_eq!(stored.len(), 2);
	assert!(stored.iter().any(|e| e.definition.action == "READ"));
}
