// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Core model for the Warrant authorization engine.
//!
//! This crate holds everything that is independent of storage and transport:
//!
//! - [`Noun`], [`DomainObject`] and [`Reference`]: who and what an entry is about
//! - [`Permissions`]: the flag set an entry grants or denies
//! - [`AccessControlContextEntry`]: contextual constraints and their evaluation
//! - [`AccessControlEntryDefinition`] / [`AccessControlEntry`]: the stored rules
//! - [`AuthorizationError`] / [`StoreError`]: the failure taxonomy

pub mod context;
pub mod entry;
pub mod error;
pub mod permissions;
pub mod types;
pub mod validation;

pub use context::{context_matches, AccessControlContext, AccessControlContextEntry, MatchType};
pub use entry::{AccessControlEntry, AccessControlEntryDefinition, AccessControlList, ActionContext};
pub use error::{AuthorizationError, Result, StoreError};
pub use permissions::Permissions;
pub use types::{subject_types, DomainObject, Noun, Reference};
