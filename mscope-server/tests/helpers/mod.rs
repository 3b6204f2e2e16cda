//! Shared helpers for mscope-server integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use mscope_common::db::init::create_specimens_table;
use mscope_server::services::GenerativeModel;
use mscope_server::{build_router, AppState, CredentialSources, CredentialStore};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

/// In-memory database with the specimens schema
///
/// One connection so every query sees the same in-memory database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    create_specimens_table(&pool).await.unwrap();
    pool
}

/// Credential sources with nothing stored and no process default
pub fn empty_credentials() -> CredentialSources {
    CredentialSources::new(CredentialStore::in_memory(None), None)
}

pub fn setup_app(db: SqlitePool, model: Arc<dyn GenerativeModel>, credentials: CredentialSources) -> Router {
    build_router(AppState::new(db, model, credentials))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST with a body sent exactly as given
pub fn post_raw(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
