// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authorization HTTP handlers.
//!
//! Every route is scoped to one object:
//! `/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}`.
//! The caller identity is established by the identity layer before any
//! handler runs.

use axum::{
	extract::{Path, Query, State},
	Json,
};
use serde::Deserialize;
use warrant_core::{AccessControlEntryDefinition, DomainObject, Noun};

pub use warrant_server_api::authorizations::*;

use crate::{api::AppState, error::ServerError};

/// Path parameters naming the target object.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectPath {
	pub domain: String,
	pub purpose: String,
	pub object_type: String,
	pub object_identifier: String,
}

impl ObjectPath {
	fn object(&self) -> DomainObject {
		DomainObject::new(
			self.domain.clone(),
			Noun::new(self.object_type.clone(), self.object_identifier.clone()),
		)
	}
}

/// Path parameters naming the target object and one subject.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectPath {
	pub domain: String,
	pub purpose: String,
	pub object_type: String,
	pub object_identifier: String,
	pub subject_type: String,
	pub subject_identifier: String,
}

impl SubjectPath {
	fn object(&self) -> DomainObject {
		DomainObject::new(
			self.domain.clone(),
			Noun::new(self.object_type.clone(), self.object_identifier.clone()),
		)
	}

	fn subject(&self) -> Noun {
		Noun::new(self.subject_type.clone(), self.subject_identifier.clone())
	}
}

#[utoipa::path(
    get,
    path = "/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/effectivePermission",
    params(
        ("domain" = String, Path, description = "Domain of the object"),
        ("purpose" = String, Path, description = "Purpose the permission is evaluated for"),
        ("object_type" = String, Path, description = "Object type"),
        ("object_identifier" = String, Path, description = "Object identifier"),
        EffectivePermissionQuery
    ),
    responses(
        (status = 200, description = "Effective permission", body = EffectivePermissionResponse),
        (status = 400, description = "Invalid subject, action or context", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "authorizations"
)]
/// Resolve whether a subject may perform an action on an object.
#[tracing::instrument(
	skip(state, query),
	fields(domain = %path.domain, purpose = %path.purpose, action = %query.action)
)]
pub async fn get_effective_permission(
	State(state): State<AppState>,
	Path(path): Path<ObjectPath>,
	Query(query): Query<EffectivePermissionQuery>,
) -> Result<Json<EffectivePermissionResponse>, ServerError> {
	let context = query
		.context()
		.map_err(|e| ServerError::BadRequest(format!("context is not a JSON object of string lists: {e}")))?;

	let permission = state
		.authorizer
		.is_authorized(
			&query.subject(),
			&query.action,
			&path.object(),
			&context,
			&path.purpose,
		)
		.await?;

	Ok(Json(EffectivePermissionResponse {
		permission: permission.into(),
	}))
}

#[utoipa::path(
    get,
    path = "/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/accessControlLists",
    params(
        ("domain" = String, Path, description = "Domain of the object"),
        ("purpose" = String, Path, description = "Purpose of the entries"),
        ("object_type" = String, Path, description = "Object type"),
        ("object_identifier" = String, Path, description = "Object identifier")
    ),
    responses(
        (status = 200, description = "Entries grouped by subject", body = Vec<AccessControlListApi>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller may not view entries", body = ErrorResponse)
    ),
    tag = "authorizations"
)]
/// List the access control entries of every subject on an object.
#[tracing::instrument(skip(state), fields(domain = %path.domain, purpose = %path.purpose))]
pub async fn get_access_control_lists(
	State(state): State<AppState>,
	Path(path): Path<ObjectPath>,
) -> Result<Json<Vec<AccessControlListApi>>, ServerError> {
	let lists = state
		.authorizer
		.access_control_lists(&path.purpose, &path.object())
		.await?;

	Ok(Json(lists.iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/accessControlLists/subjects/{subject_type}/{subject_identifier}",
    params(
        ("domain" = String, Path, description = "Domain of the object"),
        ("purpose" = String, Path, description = "Purpose of the entries"),
        ("object_type" = String, Path, description = "Object type"),
        ("object_identifier" = String, Path, description = "Object identifier"),
        ("subject_type" = String, Path, description = "Subject type, USER or GROUP"),
        ("subject_identifier" = String, Path, description = "Subject identifier")
    ),
    responses(
        (status = 200, description = "The subject's entries", body = Vec<AccessControlEntryApi>),
        (status = 400, description = "Invalid subject", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller may not view entries", body = ErrorResponse)
    ),
    tag = "authorizations"
)]
/// List one subject's access control entries on an object.
#[tracing::instrument(
	skip(state),
	fields(domain = %path.domain, purpose = %path.purpose, subject = %path.subject_identifier)
)]
pub async fn get_access_control_entries(
	State(state): State<AppState>,
	Path(path): Path<SubjectPath>,
) -> Result<Json<Vec<AccessControlEntryApi>>, ServerError> {
	let entries = state
		.authorizer
		.access_control_entries(&path.purpose, &path.object(), &path.subject())
		.await?;

	Ok(Json(entries.iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/accessControlLists/subjects/{subject_type}/{subject_identifier}",
    params(
        ("domain" = String, Path, description = "Domain of the object"),
        ("purpose" = String, Path, description = "Purpose of the entries"),
        ("object_type" = String, Path, description = "Object type"),
        ("object_identifier" = String, Path, description = "Object identifier"),
        ("subject_type" = String, Path, description = "Subject type, USER or GROUP"),
        ("subject_identifier" = String, Path, description = "Subject identifier")
    ),
    request_body = Vec<AccessControlEntryDefinitionApi>,
    responses(
        (status = 200, description = "The subject's entries after replacement", body = Vec<AccessControlEntryApi>),
        (status = 400, description = "Invalid subject or definitions", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller may not manage entries", body = ErrorResponse),
        (status = 409, description = "Identifier collision", body = ErrorResponse)
    ),
    tag = "authorizations"
)]
/// Replace one subject's access control entries on an object.
///
/// Entries whose action and permissions are unchanged keep their identifiers.
#[tracing::instrument(
	skip(state, payload),
	fields(domain = %path.domain, purpose = %path.purpose, subject = %path.subject_identifier)
)]
pub async fn set_access_control_entries(
	State(state): State<AppState>,
	Path(path): Path<SubjectPath>,
	Json(payload): Json<Vec<AccessControlEntryDefinitionApi>>,
) -> Result<Json<Vec<AccessControlEntryApi>>, ServerError> {
	let definitions: Vec<AccessControlEntryDefinition> =
		payload.into_iter().map(Into::into).collect();

	let entries = state
		.authorizer
		.set_access_control_entries(&path.purpose, &path.object(), &path.subject(), &definitions)
		.await?;

	Ok(Json(entries.iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/authorizations/domains/{domain}/{purpose}/objects/{object_type}/{object_identifier}/accessControlLists",
    params(
        ("domain" = String, Path, description = "Domain of the object"),
        ("purpose" = String, Path, description = "Purpose of the entries"),
        ("object_type" = String, Path, description = "Object type"),
        ("object_identifier" = String, Path, description = "Object identifier")
    ),
    request_body = Vec<AccessControlListRequest>,
    responses(
        (status = 200, description = "The submitted subjects' entries after replacement", body = Vec<AccessControlListApi>),
        (status = 400, description = "Invalid subjects or definitions", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller may not manage entries", body = ErrorResponse),
        (status = 409, description = "Identifier collision", body = ErrorResponse)
    ),
    tag = "authorizations"
)]
/// Replace the entries of several subjects on an object in one transaction.
#[tracing::instrument(skip(state, payload), fields(domain = %path.domain, purpose = %path.purpose))]
pub async fn set_access_control_lists(
	State(state): State<AppState>,
	Path(path): Path<ObjectPath>,
	Json(payload): Json<Vec<AccessControlListRequest>>,
) -> Result<Json<Vec<AccessControlListApi>>, ServerError> {
	let lists: Vec<_> = payload
		.into_iter()
		.map(AccessControlListRequest::into_parts)
		.collect();

	let stored = state
		.authorizer
		.set_access_control_lists(&path.purpose, &path.object(), &lists)
		.await?;

	Ok(Json(stored.iter().map(Into::into).collect()))
}
