// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration loading before the process-wide subscriber exists.
//!
//! The log level comes from the configuration itself, so loading runs under a
//! scoped bootstrap subscriber and its summary is not dropped.

use std::path::Path;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use warrant_server_config::{ConfigError, ServerConfig};

/// Loads the server configuration, logging through a stderr bootstrap
/// subscriber filtered by `RUST_LOG` (default `info`).
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
	let bootstrap = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.finish();
	load_config_with_subscriber(path, bootstrap)
}

/// Loads the server configuration with `subscriber` as the default for the
/// duration of the load.
pub fn load_config_with_subscriber<S>(
	path: Option<&Path>,
	subscriber: S,
) -> Result<ServerConfig, ConfigError>
where
	S: Subscriber + Send + Sync + 'static,
{
	tracing::subscriber::with_default(subscriber, || match path {
		Some(path) => warrant_server_config::load_config_with_file(path),
		None => warrant_server_config::load_config(),
	})
}
