//! Settings endpoints
//!
//! Credential storage, connection test and the analysis option presets.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use mscope_common::api::{
    AnalysisOptions, ApiKeyRequest, ConnectionTestResponse, CredentialStatus,
    SettingsUpdateResponse,
};
use mscope_common::credential::CREDENTIAL_PREFIX;
use mscope_common::Credential;
use tracing::{debug, info};

use crate::api::ApiJson;
use crate::services::probe_credential;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(state.credentials.status(state.model.model_name()).await)
}

/// GET /api/settings/options
pub async fn get_options() -> Json<AnalysisOptions> {
    Json(AnalysisOptions::presets())
}

/// POST /api/settings/api_key
///
/// **Request:** `{"api_key": "AIza..."}`
///
/// **Errors:**
/// - 400: key does not start with `AIza` after trimming
/// - 500: config file write failure
pub async fn set_api_key(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ApiKeyRequest>,
) -> ApiResult<Json<SettingsUpdateResponse>> {
    let credential = Credential::parse(&payload.api_key).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "API key must be a Gemini API key starting with '{}'",
            CREDENTIAL_PREFIX
        ))
    })?;

    state.credentials.store().set(&credential).await?;
    info!("API key configured via settings");

    Ok(Json(SettingsUpdateResponse {
        success: true,
        message: "API key saved".to_string(),
    }))
}

/// DELETE /api/settings/api_key
pub async fn clear_api_key(
    State(state): State<AppState>,
) -> ApiResult<Json<SettingsUpdateResponse>> {
    state.credentials.store().clear().await?;

    Ok(Json(SettingsUpdateResponse {
        success: true,
        message: "API key removed".to_string(),
    }))
}

/// POST /api/settings/test_connection
///
/// Never fails: every problem, an unreadable body included, is reported as
/// `{"connected": false}`.
pub async fn test_connection(
    State(state): State<AppState>,
    payload: Result<Json<ApiKeyRequest>, JsonRejection>,
) -> Json<ConnectionTestResponse> {
    let connected = match payload {
        Ok(Json(payload)) => probe_credential(state.model.as_ref(), &payload.api_key).await,
        Err(rejection) => {
            debug!("Connection test body rejected: {}", rejection.body_text());
            false
        }
    };
    Json(ConnectionTestResponse { connected })
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(get_settings))
        .route("/api/settings/options", get(get_options))
        .route("/api/settings/api_key", post(set_api_key).delete(clear_api_key))
        .route("/api/settings/test_connection", post(test_connection))
}
