//! mscope-server library - MicroScope AI analysis and specimen library
//!
//! Exposes the specimen store over HTTP and proxies image analysis, lab
//! report generation and credential probing to the remote model.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use config::{CredentialSources, CredentialStore, ServerArgs, ServerConfig};
pub use error::{ApiError, ApiResult};

/// JSON request bodies carry base64 images
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Remote generative model
    pub model: Arc<dyn services::GenerativeModel>,
    /// Explicit / stored / process-default credential sources
    pub credentials: CredentialSources,
    /// Startup timestamp for uptime
    pub startup_time: DateTime<Utc>,
    /// Built frontend served at `/`
    pub static_assets: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        model: Arc<dyn services::GenerativeModel>,
        credentials: CredentialSources,
    ) -> Self {
        Self {
            db,
            model,
            credentials,
            startup_time: Utc::now(),
            static_assets: None,
        }
    }

    pub fn with_static_assets(mut self, dir: Option<PathBuf>) -> Self {
        self.static_assets = dir;
        self
    }
}

/// Build application router
///
/// API routes first; everything else falls through to the frontend
/// directory (with `index.html` for client-side routes) when one is set.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .merge(api::specimen_routes())
        .merge(api::analysis_routes())
        .merge(api::settings_routes())
        .merge(api::health_routes());

    let router = match &state.static_assets {
        Some(dir) => {
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            routes.fallback_service(spa)
        }
        None => routes.route("/", axum::routing::get(api::serve_index)),
    };

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
