//! Gemini `generateContent` client
//!
//! Single request/response call, no retry and no client-side timeout
//! override: the request runs until the service answers or the connection
//! fails.

use async_trait::async_trait;
use mscope_common::Credential;
use serde::{Deserialize, Serialize};

use super::model::{GenerationRequest, GenerativeModel, ModelError, Part, SamplingConfig};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const USER_AGENT: &str = concat!("mscope-server/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Gemini API
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str) -> Result<Self, ModelError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: WireBlob<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireBlob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl From<&SamplingConfig> for WireGenerationConfig {
    fn from(sampling: &SamplingConfig) -> Self {
        Self {
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_output_tokens: sampling.max_output_tokens,
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate joined; empty when there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn build_body(request: &GenerationRequest) -> GenerateContentBody<'_> {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => WirePart::Text { text },
            Part::InlineData { mime_type, data } => WirePart::Inline {
                inline_data: WireBlob { mime_type, data },
            },
        })
        .collect();

    GenerateContentBody {
        contents: vec![WireContent { parts }],
        system_instruction: request.system_instruction.as_deref().map(|text| WireContent {
            parts: vec![WirePart::Text { text }],
        }),
        generation_config: if request.sampling.is_default() {
            None
        } else {
            Some(WireGenerationConfig::from(&request.sampling))
        },
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, ModelError> {
        let body = build_body(request);

        tracing::debug!(
            model = %self.model,
            parts = request.parts.len(),
            "Sending generateContent request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, credential.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status_code = status.as_u16(), "generateContent request failed");
            return Err(ModelError::from_status(status.as_u16(), error_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::ResponseParsing(e.to_string()))?;

        let text = parsed.text();
        tracing::info!(model = %self.model, chars = text.len(), "generateContent succeeded");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_wire_shape() {
        let request = GenerationRequest {
            parts: vec![
                Part::InlineData {
                    mime_type: "image/jpeg".to_string(),
                    data: "AAA=".to_string(),
                },
                Part::Text("Analyze".to_string()),
            ],
            system_instruction: Some("You are a microscope".to_string()),
            sampling: SamplingConfig {
                temperature: Some(0.5),
                top_p: Some(0.25),
                max_output_tokens: None,
            },
        };

        let value = serde_json::to_value(build_body(&request)).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {"mimeType": "image/jpeg", "data": "AAA="}},
                        {"text": "Analyze"}
                    ]
                }],
                "systemInstruction": {"parts": [{"text": "You are a microscope"}]},
                "generationConfig": {"temperature": 0.5, "topP": 0.25}
            })
        );
    }

    #[test]
    fn test_body_omits_empty_config_and_system() {
        let value = serde_json::to_value(build_body(&GenerationRequest::text("hi"))).unwrap();

        assert_eq!(value, json!({"contents": [{"parts": [{"text": "hi"}]}]}));
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.text(), "Hello world");

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:9999/v1beta/", "gemini-2.0-flash").unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
