//! Remote generative model abstraction
//!
//! The remote model is an opaque external collaborator: it takes text and
//! inline images plus a system instruction and sampling parameters, and
//! returns free-form text. [`GeminiClient`](super::gemini_client::GeminiClient)
//! is the production implementation; [`MockModel`] stands in for tests.

use async_trait::async_trait;
use mscope_common::Credential;
use std::sync::Mutex;
use thiserror::Error;

/// Text the remote service puts in its error body for a rejected key
pub const INVALID_KEY_MARKER: &str = "API key not valid";

/// One piece of request content
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Base64 payload tagged with its MIME type
    InlineData { mime_type: String, data: String },
}

/// Sampling parameters; `None` leaves the service default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl SamplingConfig {
    pub fn is_default(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.max_output_tokens.is_none()
    }
}

/// A single-turn generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub parts: Vec<Part>,
    pub system_instruction: Option<String>,
    pub sampling: SamplingConfig,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text(prompt.into())],
            system_instruction: None,
            sampling: SamplingConfig::default(),
        }
    }
}

/// Remote model failures
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The service rejected the credential
    #[error("Remote model rejected the API key")]
    InvalidCredential,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote model error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse remote model response: {0}")]
    ResponseParsing(String),
}

impl ModelError {
    /// Classify a non-success response from the service
    pub fn from_status(status: u16, body: String) -> Self {
        if body.contains(INVALID_KEY_MARKER) {
            ModelError::InvalidCredential
        } else {
            ModelError::Upstream { status, body }
        }
    }
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, e.g. `gemini-2.0-flash`
    fn model_name(&self) -> &str;

    /// Run one request; the call either fully succeeds or fully fails
    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, ModelError>;
}

/// Mock model for testing: returns a configured reply and records requests
pub struct MockModel {
    reply: Result<String, ModelError>,
    calls: Mutex<Vec<(String, GenerationRequest)>>,
}

impl MockModel {
    pub fn new(response: &str) -> Self {
        Self {
            reply: Ok(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ModelError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Credential and request of every call so far
    pub fn calls(&self) -> Vec<(String, GenerationRequest)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, ModelError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((credential.as_str().to_string(), request.clone()));
        }
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_body_is_classified() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            ModelError::from_status(400, body.to_string()),
            ModelError::InvalidCredential
        ));
    }

    #[test]
    fn test_other_errors_are_upstream() {
        let err = ModelError::from_status(503, "overloaded".to_string());
        assert!(matches!(err, ModelError::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let model = MockModel::new("hello");
        let credential = Credential::parse("AIzaMock").unwrap();

        let reply = model
            .generate(&credential, &GenerationRequest::text("hi"))
            .await
            .unwrap();

        assert_eq!(reply, "hello");
        assert_eq!(model.call_count(), 1);
        assert_eq!(model.calls()[0].0, "AIzaMock");
    }
}
