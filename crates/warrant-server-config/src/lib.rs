// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Warrant server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`WARRANT_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use warrant_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub authorization: AuthorizationConfig,
	pub identity: IdentityConfig,
	pub logging: LoggingConfig,
	pub roles: RolesConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`WARRANT_SERVER_*`)
/// 2. Config file (`/etc/warrant/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let authorization = layer.authorization.unwrap_or_default().finalize()?;
	let identity = layer.identity.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let roles = layer.roles.unwrap_or_default().finalize();

	let config = ServerConfig {
		http,
		database,
		authorization,
		identity,
		logging,
		roles,
	};
	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		grantees = %config.authorization.grantees,
		management_domain = %config.authorization.management_domain,
		administrative_user_configured = config.authorization.administrative_user.is_some(),
		identity_header = %config.identity.header,
		role_assignments = config.roles.assignments.len(),
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	let authorization = &config.authorization;

	if authorization.administrator_role.trim().is_empty() {
		return Err(ConfigError::validation(
			"authorization.administrator_role must not be blank",
		));
	}
	if authorization.view_permissions_action.trim().is_empty()
		|| authorization.manage_permissions_action.trim().is_empty()
	{
		return Err(ConfigError::validation(
			"authorization view and manage actions must not be blank",
		));
	}
	if authorization.view_permissions_action == authorization.manage_permissions_action {
		return Err(ConfigError::validation(format!(
			"authorization view and manage actions must differ, both are '{}'",
			authorization.view_permissions_action
		)));
	}

	if config.database.busy_timeout_ms == 0 {
		return Err(ConfigError::invalid_value(
			"database.busy_timeout_ms",
			"must be greater than zero so concurrent writers can queue",
		));
	}

	let header = &config.identity.header;
	if header.is_empty()
		|| !header
			.bytes()
			.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
	{
		return Err(ConfigError::invalid_value(
			"identity.header",
			format!("'{header}' is not a valid header name"),
		));
	}

	if let Some(assignment) = config
		.roles
		.assignments
		.iter()
		.find(|a| a.user.trim().is_empty())
	{
		return Err(ConfigError::validation(format!(
			"role assignment for roles {:?} has a blank user",
			assignment.roles
		)));
	}

	Ok(())
}
