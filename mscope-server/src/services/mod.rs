//! Remote model services: specimen analysis, lab reports and credential probing

pub mod connection_probe;
pub mod gemini_client;
pub mod lab_report;
pub mod model;
pub mod prompts;
pub mod vision_analysis;

pub use connection_probe::probe_credential;
pub use gemini_client::GeminiClient;
pub use lab_report::generate_lab_report;
pub use model::{GenerationRequest, GenerativeModel, MockModel, ModelError, Part, SamplingConfig};
pub use vision_analysis::{analyze_specimen, AnalysisResult};

use mscope_common::CredentialError;
use thiserror::Error;

/// Failures of an analysis or report request
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No well-formed credential; raised before any network call
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The remote service refused the credential
    #[error("The API key you provided is invalid. Please double-check it in Settings.")]
    CredentialRejected,

    #[error(transparent)]
    Model(ModelError),
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidCredential => ServiceError::CredentialRejected,
            other => ServiceError::Model(other),
        }
    }
}
