//! Lab report generation from a prior analysis

use mscope_common::Credential;
use tracing::info;

use super::model::{GenerationRequest, GenerativeModel, Part, SamplingConfig};
use super::prompts::{report_prompt, SYSTEM_INSTRUCTION};
use super::ServiceError;

/// Text-only request reusing the analysis system instruction, service-default sampling
pub fn build_report_request(analysis: &str) -> GenerationRequest {
    GenerationRequest {
        parts: vec![Part::Text(report_prompt(analysis))],
        system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
        sampling: SamplingConfig::default(),
    }
}

pub async fn generate_lab_report(
    model: &dyn GenerativeModel,
    credential: &Credential,
    analysis: &str,
) -> Result<String, ServiceError> {
    let report = model
        .generate(credential, &build_report_request(analysis))
        .await?;

    info!(chars = report.len(), "Lab report generated");
    Ok(report)
}
