//! Specimen image analysis

use mscope_common::analysis_text::extract_specimen_name;
use mscope_common::context::AnalysisContext;
use mscope_common::Credential;
use tracing::info;

use super::model::{GenerationRequest, GenerativeModel, Part, SamplingConfig};
use super::prompts::{analysis_prompt, ANALYSIS_TEMPERATURE, ANALYSIS_TOP_P, SYSTEM_INSTRUCTION};
use super::ServiceError;

pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Analysis text plus the display name pulled out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub text: String,
    pub specimen_name: String,
}

/// Image part first, then the context prompt
pub fn build_analysis_request(image_base64: &str, ctx: &AnalysisContext) -> GenerationRequest {
    GenerationRequest {
        parts: vec![
            Part::InlineData {
                mime_type: IMAGE_MIME_TYPE.to_string(),
                data: image_base64.to_string(),
            },
            Part::Text(analysis_prompt(ctx)),
        ],
        system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
        sampling: SamplingConfig {
            temperature: Some(ANALYSIS_TEMPERATURE),
            top_p: Some(ANALYSIS_TOP_P),
            max_output_tokens: None,
        },
    }
}

/// Send one captured frame to the model and extract the specimen name
///
/// The credential is resolved by the caller; a missing one never reaches here.
pub async fn analyze_specimen(
    model: &dyn GenerativeModel,
    credential: &Credential,
    image_base64: &str,
    ctx: &AnalysisContext,
) -> Result<AnalysisResult, ServiceError> {
    let request = build_analysis_request(image_base64, ctx);
    let text = model.generate(credential, &request).await?;
    let specimen_name = extract_specimen_name(&text);

    info!(
        specimen = %specimen_name,
        magnification = %ctx.magnification,
        microscope_type = %ctx.microscope_type,
        "Specimen analyzed"
    );

    Ok(AnalysisResult { text, specimen_name })
}
