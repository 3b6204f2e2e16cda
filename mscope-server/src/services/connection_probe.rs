//! Credential probe
//!
//! Tells the settings screen whether a pasted key works. Every failure,
//! including malformed input, collapses to `false`.

use mscope_common::Credential;
use tracing::{info, warn};

use super::model::{GenerationRequest, GenerativeModel, SamplingConfig};
use super::prompts::{PROBE_MAX_OUTPUT_TOKENS, PROBE_PROMPT};

pub fn build_probe_request() -> GenerationRequest {
    GenerationRequest {
        sampling: SamplingConfig {
            max_output_tokens: Some(PROBE_MAX_OUTPUT_TOKENS),
            ..Default::default()
        },
        ..GenerationRequest::text(PROBE_PROMPT)
    }
}

/// `true` only when a well-formed key completes a minimal request
///
/// Malformed keys return `false` without touching the network.
pub async fn probe_credential(model: &dyn GenerativeModel, raw_key: &str) -> bool {
    let Some(credential) = Credential::parse(raw_key) else {
        info!("Connection test skipped: key is not a Gemini API key");
        return false;
    };

    match model.generate(&credential, &build_probe_request()).await {
        Ok(_) => {
            info!(model = model.model_name(), "Connection test succeeded");
            true
        }
        Err(e) => {
            warn!("Connection test failed: {}", e);
            false
        }
    }
}
