//! Error types for mscope-server
//!
//! Every failure is scoped to the request that raised it; none stops the
//! process.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mscope_common::api::ErrorResponse;
use mscope_common::CredentialError;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::{ModelError, ServiceError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// No usable credential (400)
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Remote model refused the credential (401)
    #[error("The API key you provided is invalid. Please double-check it in Settings.")]
    CredentialRejected,

    /// Remote model failure (502)
    #[error("{0}")]
    Upstream(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// mscope-common error (500)
    #[error("{0}")]
    Common(#[from] mscope_common::Error),
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError::NotFound("Not found".to_string())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Credential(_) => (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL"),
            ApiError::CredentialRejected => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIAL"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::Common(_) => (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Credential(e) => ApiError::Credential(e),
            ServiceError::CredentialRejected => ApiError::CredentialRejected,
            ServiceError::Model(e) => ApiError::from(e),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidCredential => ApiError::CredentialRejected,
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            error!(code, "Request failed: {}", self);
        } else if status != StatusCode::NOT_FOUND {
            warn!(code, "Request rejected: {}", self);
        }

        // The 404 body stays exactly {"error":"Not found"}
        let code = match self {
            ApiError::NotFound(_) => None,
            _ => Some(code.to_string()),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code,
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::not_found().status_and_code().0, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(CredentialError::Missing).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ServiceError::CredentialRejected).status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(ModelError::Network("refused".to_string()))
                .status_and_code()
                .0,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_credential_messages_are_user_facing() {
        assert!(ApiError::from(CredentialError::Missing)
            .to_string()
            .starts_with("Missing or Invalid API Key."));
        assert_eq!(
            ApiError::CredentialRejected.to_string(),
            "The API key you provided is invalid. Please double-check it in Settings."
        );
    }
}
