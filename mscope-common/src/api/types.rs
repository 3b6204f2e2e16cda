//! Shared API request/response types

use serde::{Deserialize, Serialize};

// ========================================
// Specimen Types
// ========================================

/// Response to `POST /api/specimens`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSpecimenResponse {
    pub id: i64,
}

/// Response to `DELETE /api/specimens/:id`
///
/// Always `{"success": true}`, whether or not the row existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSpecimenResponse {
    pub success: bool,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable error identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// ========================================
// Remote Model Types
// ========================================

/// Request body for `POST /api/analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 JPEG without data-URI prefix
    pub image_data: String,
    pub magnification: String,
    pub microscope_type: String,
    #[serde(default = "default_student_level")]
    pub student_level: String,
    /// Overrides the stored and process-default credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_student_level() -> String {
    crate::context::DEFAULT_STUDENT_LEVEL.to_string()
}

/// Response body for `POST /api/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Raw model output
    pub text: String,
    /// Extracted display name, or the fallback label
    pub specimen_name: String,
}

/// Request body for `POST /api/report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Response body for `POST /api/report`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
}

// ========================================
// Settings Types
// ========================================

/// Request body for `POST /api/settings/api_key` and
/// `POST /api/settings/test_connection`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRequest {
    pub api_key: String,
}

/// Generic settings mutation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdateResponse {
    pub success: bool,
    pub message: String,
}

/// Response body for `POST /api/settings/test_connection`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTestResponse {
    pub connected: bool,
}

/// Response body for `GET /api/settings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStatus {
    /// A well-formed key is saved in the config file
    pub stored_key: bool,
    /// A well-formed `GEMINI_API_KEY` was present at startup
    pub process_default_key: bool,
    /// Remote model identifier
    pub model: String,
}

/// Response body for `GET /api/settings/options`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub magnifications: Vec<String>,
    pub microscope_types: Vec<String>,
    pub student_levels: Vec<String>,
    pub defaults: crate::context::AnalysisContext,
}

impl AnalysisOptions {
    /// The presets offered by the settings screen
    pub fn presets() -> Self {
        use crate::context::{MicroscopeType, MAGNIFICATION_PRESETS, STUDENT_LEVELS};

        Self {
            magnifications: MAGNIFICATION_PRESETS.iter().map(|s| s.to_string()).collect(),
            microscope_types: MicroscopeType::ALL.iter().map(|t| t.to_string()).collect(),
            student_levels: STUDENT_LEVELS.iter().map(|s| s.to_string()).collect(),
            defaults: Default::default(),
        }
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_defaults_student_level() {
        let json = r#"{"image_data": "AAA=", "magnification": "40x", "microscope_type": "darkfield"}"#;
        let request: AnalyzeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.student_level, "Grade 10");
        assert!(request.api_key.is_none());
    }

    #[test]
    fn test_error_response_omits_missing_code() {
        let body = ErrorResponse {
            error: "Not found".to_string(),
            code: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"error":"Not found"}"#);
    }

    #[test]
    fn test_options_presets() {
        let options = AnalysisOptions::presets();
        assert_eq!(options.magnifications, vec!["40x", "100x", "400x", "1000x"]);
        assert_eq!(options.microscope_types, vec!["brightfield", "darkfield", "fluorescence"]);
        assert_eq!(options.student_levels.len(), 6);
        assert_eq!(options.defaults.magnification, "400x");
    }
}
