// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Result type alias for authorization operations.
pub type Result<T> = std::result::Result<T, AuthorizationError>;

/// Top-level error type for authorization operations.
#[derive(Error, Debug)]
pub enum AuthorizationError {
	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Not authorized: {0}")]
	NotAuthorized(String),

	#[error("Duplicate identifier: {0}")]
	DuplicateIdentifier(String),

	#[error("Store error: {0}")]
	Store(#[from] StoreError),
}

impl AuthorizationError {
	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation(message.into())
	}

	pub fn not_authorized(message: impl Into<String>) -> Self {
		Self::NotAuthorized(message.into())
	}
}

/// Errors raised by a store backend, independent of the backend in use.
#[derive(Error, Debug)]
pub enum StoreError {
	#[error("Backend error: {0}")]
	Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal error: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl StoreError {
	pub fn backend<E>(err: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Backend(Box::new(err))
	}
}
