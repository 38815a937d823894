// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthorizationConfigLayer, DatabaseConfigLayer, HttpConfigLayer, IdentityConfigLayer,
	LoggingConfigLayer,
};

/// Default location of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/warrant/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: WARRANT_SERVER_<FIELD>. Role assignments are file-only.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()?),
			authorization: Some(load_authorization_from_env()),
			identity: Some(load_identity_from_env()),
			logging: Some(load_logging_from_env()),
			roles: None,
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::invalid_value(name, format!("invalid u16 value '{v}'"))),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("WARRANT_SERVER_HOST"),
		port: env_u16("WARRANT_SERVER_PORT")?,
	})
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::invalid_value(name, format!("invalid u64 value '{v}'"))),
		None => Ok(None),
	}
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	Ok(DatabaseConfigLayer {
		url: env_var("WARRANT_SERVER_DATABASE_URL"),
		busy_timeout_ms: env_u64("WARRANT_SERVER_DATABASE_BUSY_TIMEOUT_MS")?,
	})
}

fn load_authorization_from_env() -> AuthorizationConfigLayer {
	AuthorizationConfigLayer {
		administrator_role: env_var("WARRANT_SERVER_ADMINISTRATOR_ROLE"),
		administrative_user: env_var("WARRANT_SERVER_ADMINISTRATIVE_USER"),
		management_domain: env_var("WARRANT_SERVER_MANAGEMENT_DOMAIN"),
		grantees: env_var("WARRANT_SERVER_ADMINISTRATIVE_GRANTEES"),
		view_permissions_action: env_var("WARRANT_SERVER_VIEW_PERMISSIONS_ACTION"),
		manage_permissions_action: env_var("WARRANT_SERVER_MANAGE_PERMISSIONS_ACTION"),
	}
}

fn load_identity_from_env() -> IdentityConfigLayer {
	IdentityConfigLayer {
		header: env_var("WARRANT_SERVER_IDENTITY_HEADER"),
	}
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("WARRANT_SERVER_LOG_LEVEL"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let source = DefaultsSource;
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/config.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_sections() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[authorization]
administrative_user = "root"
grantees = "allowed_users"

[[roles.assignments]]
user = "alice"
roles = ["ADMINISTRATORS"]
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let authorization = layer.authorization.unwrap();
		assert_eq!(authorization.administrative_user.as_deref(), Some("root"));
		assert_eq!(authorization.grantees.as_deref(), Some("allowed_users"));
		assert_eq!(layer.roles.unwrap().assignments.unwrap().len(), 1);
	}

	#[test]
	fn test_toml_source_reads_busy_timeout() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[database]\nbusy_timeout_ms = 750").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let database = layer.database.unwrap();
		assert!(database.url.is_none());
		assert_eq!(database.busy_timeout_ms, Some(750));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[http]\nport = \"not a number\"").unwrap();

		let result = TomlSource::new(file.path()).load();
		assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
	}
}
