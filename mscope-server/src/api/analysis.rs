//! Remote model endpoints: specimen analysis and lab reports

use axum::{extract::State, routing::post, Json, Router};
use mscope_common::api::{AnalyzeRequest, AnalyzeResponse, ReportRequest, ReportResponse};
use mscope_common::context::AnalysisContext;

use crate::api::ApiJson;
use crate::services::{analyze_specimen, generate_lab_report};
use crate::{ApiResult, AppState};

/// POST /api/analyze
///
/// **Request:** `{"image_data", "magnification", "microscope_type", "student_level"?, "api_key"?}`
/// **Response:** `{"text": "...", "specimen_name": "..."}`
///
/// **Errors:**
/// - 400: no well-formed credential (no remote call is made)
/// - 401: remote model rejected the credential
/// - 502: any other remote failure
pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let credential = state.credentials.resolve(request.api_key.as_deref()).await?;

    let ctx = AnalysisContext {
        magnification: request.magnification,
        microscope_type: request.microscope_type,
        student_level: request.student_level,
    };

    let result = analyze_specimen(state.model.as_ref(), &credential, &request.image_data, &ctx).await?;

    Ok(Json(AnalyzeResponse {
        text: result.text,
        specimen_name: result.specimen_name,
    }))
}

/// POST /api/report
///
/// **Request:** `{"analysis": "...", "api_key"?}`
/// **Response:** `{"report": "..."}`
pub async fn report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> ApiResult<Json<ReportResponse>> {
    let credential = state.credentials.resolve(request.api_key.as_deref()).await?;
    let report = generate_lab_report(state.model.as_ref(), &credential, &request.analysis).await?;
    Ok(Json(ReportResponse { report }))
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/report", post(report))
}
