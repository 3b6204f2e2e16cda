//! mscope-server - MicroScope AI analysis and specimen library server
//!
//! Startup order: arguments, bootstrap TOML, tracing, root folder,
//! database, remote model client, HTTP server.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mscope_common::config::{
    config_file_path, load_toml_config, RootFolderInitializer, RootFolderResolver,
};
use mscope_common::db::init::init_database;
use mscope_server::api::BuildInfo;
use mscope_server::services::GeminiClient;
use mscope_server::{
    build_router, AppState, CredentialSources, CredentialStore, ServerArgs, ServerConfig,
};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();

    let config_path = args.config.clone().unwrap_or_else(config_file_path);
    let toml_config = load_toml_config(&config_path);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=info", toml_config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let build = BuildInfo::CURRENT;
    info!(
        "Starting MicroScope server (mscope-server) v{} [{}] built {} ({})",
        build.version, build.git_hash, build.built_at, build.profile
    );
    info!("Config file: {}", config_path.display());

    let config = ServerConfig::resolve(&args, &toml_config);

    let root_folder = RootFolderResolver::new("mscope-server")
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&toml_config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let model = GeminiClient::new(&config.model_base_url, &config.model)
        .context("Failed to create remote model client")?;
    info!("Remote model: {} at {}", config.model, config.model_base_url);

    let credentials = CredentialSources::from_env(CredentialStore::load(&config_path));
    match credentials.active_source().await {
        Some(source) => info!("API key available ({})", source.as_str()),
        None => warn!("No API key configured; analysis requests must supply one"),
    }

    if let Some(dir) = &config.static_assets {
        info!("Serving frontend from {}", dir.display());
    }

    let state = AppState::new(pool, Arc::new(model), credentials)
        .with_static_assets(config.static_assets.clone());
    let app = build_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mscope-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
