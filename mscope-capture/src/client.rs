//! HTTP client for the mscope-server API

use mscope_common::api::{
    AnalysisOptions, AnalyzeRequest, AnalyzeResponse, ApiKeyRequest, ConnectionTestResponse,
    CreateSpecimenResponse, CredentialStatus, DeleteSpecimenResponse, ErrorResponse,
    ReportRequest, ReportResponse, SettingsUpdateResponse,
};
use mscope_common::{NewSpecimen, Specimen};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
const USER_AGENT: &str = concat!("mscope-capture/", env!("CARGO_PKG_VERSION"));

pub struct ScopeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ScopeClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================
    // Specimen library
    // ========================================

    pub async fn list_specimens(&self) -> Result<Vec<Specimen>, ClientError> {
        let response = self.http_client.get(self.url("/api/specimens")).send().await?;
        parse(response).await
    }

    pub async fn get_specimen(&self, id: i64) -> Result<Specimen, ClientError> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/specimens/{}", id)))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn create_specimen(&self, specimen: &NewSpecimen) -> Result<i64, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/specimens"))
            .json(specimen)
            .send()
            .await?;
        let created: CreateSpecimenResponse = parse(response).await?;
        Ok(created.id)
    }

    pub async fn delete_specimen(&self, id: i64) -> Result<bool, ClientError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/specimens/{}", id)))
            .send()
            .await?;
        let deleted: DeleteSpecimenResponse = parse(response).await?;
        Ok(deleted.success)
    }

    // ========================================
    // Remote model
    // ========================================

    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, ClientError> {
        debug!(bytes = request.image_data.len(), "Submitting frame for analysis");
        let response = self
            .http_client
            .post(self.url("/api/analyze"))
            .json(request)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn report(&self, analysis: &str, api_key: Option<&str>) -> Result<String, ClientError> {
        let request = ReportRequest {
            analysis: analysis.to_string(),
            api_key: api_key.map(|k| k.to_string()),
        };
        let response = self
            .http_client
            .post(self.url("/api/report"))
            .json(&request)
            .send()
            .await?;
        let report: ReportResponse = parse(response).await?;
        Ok(report.report)
    }

    // ========================================
    // Settings
    // ========================================

    pub async fn settings(&self) -> Result<CredentialStatus, ClientError> {
        let response = self.http_client.get(self.url("/api/settings")).send().await?;
        parse(response).await
    }

    pub async fn options(&self) -> Result<AnalysisOptions, ClientError> {
        let response = self
            .http_client
            .get(self.url("/api/settings/options"))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn set_api_key(&self, api_key: &str) -> Result<SettingsUpdateResponse, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/settings/api_key"))
            .json(&ApiKeyRequest {
                api_key: api_key.to_string(),
            })
            .send()
            .await?;
        parse(response).await
    }

    pub async fn clear_api_key(&self) -> Result<SettingsUpdateResponse, ClientError> {
        let response = self
            .http_client
            .delete(self.url("/api/settings/api_key"))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn test_connection(&self, api_key: &str) -> Result<bool, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/settings/test_connection"))
            .json(&ApiKeyRequest {
                api_key: api_key.to_string(),
            })
            .send()
            .await?;
        let result: ConnectionTestResponse = parse(response).await?;
        Ok(result.connected)
    }
}

/// Decode a success body, or turn the server's error body into a `ClientError`
async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| format!("Server returned {}: {}", status, text));

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
