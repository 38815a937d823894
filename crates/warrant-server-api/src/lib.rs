// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod authorizations;
pub mod health;

pub use authorizations::{
	AccessControlEntryApi, AccessControlEntryDefinitionApi, AccessControlListApi,
	AccessControlListRequest, ContextEntryApi, DecisionApi, EffectivePermissionQuery,
	EffectivePermissionResponse, ErrorResponse, MatchTypeApi, NounApi, PermissionFlagApi,
	ReferenceApi,
};
pub use health::{HealthResponse, HealthStatus};
