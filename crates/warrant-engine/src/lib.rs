// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Permission resolution and access control administration.
//!
//! [`Authorizer`] answers whether a subject may perform an action on a
//! domain object, and lets authorized callers read and replace the access
//! control entries behind those answers. Storage, identity, role membership
//! and identifier generation are injected through the traits in [`store`],
//! [`identity`] and [`ids`].

pub mod authorizer;
pub mod bootstrap;
pub mod identity;
pub mod ids;
pub mod memory;
pub mod mutation;
pub mod options;
pub mod resolve;
pub mod store;

pub use authorizer::Authorizer;
pub use bootstrap::{administrative_context, AdministrativeOperation};
pub use identity::{FixedIdentity, IdentityAccessor, PrincipalIdentity, RoleProvider, StaticRoleProvider};
pub use ids::{IdentifierGenerator, Uuid7Generator};
pub use memory::MemoryStore;
pub use options::{
	admin_context_keys, AdministrativeActionGrantees, Options, MANAGE_PERMISSIONS, VIEW_PERMISSIONS,
};
pub use store::{AuthorizationSession, AuthorizationStore, IsolationLevel};
pub use warrant_core::{AuthorizationError, Result, StoreError};
