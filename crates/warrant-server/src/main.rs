// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Warrant authorization server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warrant_server::{create_app_state, create_router, startup, version};
use warrant_store_sqlite::{create_pool_with_busy_timeout, run_migrations, AuthorizationRepository};

/// Warrant server - HTTP server for the Warrant authorization engine.
#[derive(Parser, Debug)]
#[command(
	name = "warrant-server",
	about = "Warrant authorization server",
	version
)]
struct Args {
	/// Config file to load instead of /etc/warrant/server.toml
	#[arg(long, env = "WARRANT_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for warrant-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Load .env file if present
	dotenvy::dotenv().ok();

	let args = Args::parse();

	// Handle subcommands that should not start the server
	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	let config = startup::load_config(args.config.as_deref())?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		grantees = %config.authorization.grantees,
		"starting warrant-server"
	);

	if config.database.is_in_memory() {
		tracing::warn!("in-memory database configured, access control entries will not persist");
	}
	let pool = create_pool_with_busy_timeout(&config.database.url, config.database.busy_timeout()).await?;
	run_migrations(&pool).await?;

	let store = Arc::new(AuthorizationRepository::new(pool));
	let state = create_app_state(&config, store);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %e, "Failed to listen for shutdown signal");
			}
			tracing::info!("Received shutdown signal");
		})
		.await?;

	tracing::info!("Server shutdown complete");
	Ok(())
}
