//! Capture → analyze → (optionally) persist and report
//!
//! One user action, strictly sequential. A failure at any step ends the
//! action; nothing already done is rolled back.

use mscope_common::api::{AnalyzeRequest, AnalyzeResponse};
use mscope_common::context::AnalysisContext;
use mscope_common::NewSpecimen;
use thiserror::Error;
use tracing::info;

use crate::client::ScopeClient;
use crate::controller::CaptureController;
use crate::error::{CaptureError, ClientError};
use crate::frame_source::FrameSource;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// What to do after the frame is analyzed
#[derive(Debug, Clone, Default)]
pub struct SnapOptions {
    pub context: AnalysisContext,
    /// Overrides the server's stored and default credential
    pub api_key: Option<String>,
    pub save: bool,
    pub report: bool,
}

#[derive(Debug, Clone)]
pub struct SnapOutcome {
    /// Bare base64 JPEG that was analyzed
    pub image_data: String,
    pub analysis: AnalyzeResponse,
    pub saved_id: Option<i64>,
    pub report: Option<String>,
}

/// The record saved for an analyzed frame
pub fn specimen_from_analysis(
    image_data: &str,
    analysis: &AnalyzeResponse,
    context: &AnalysisContext,
) -> NewSpecimen {
    NewSpecimen {
        name: Some(analysis.specimen_name.clone()),
        image_data: Some(image_data.to_string()),
        analysis: Some(analysis.text.clone()),
        magnification: Some(context.magnification.clone()),
        microscope_type: Some(context.microscope_type.clone()),
    }
}

pub async fn snap<S: FrameSource>(
    controller: &mut CaptureController<S>,
    client: &ScopeClient,
    options: &SnapOptions,
) -> Result<SnapOutcome, PipelineError> {
    controller.start()?;
    let image_data = controller.capture()?;

    let request = AnalyzeRequest {
        image_data: image_data.clone(),
        magnification: options.context.magnification.clone(),
        microscope_type: options.context.microscope_type.clone(),
        student_level: options.context.student_level.clone(),
        api_key: options.api_key.clone(),
    };
    let analysis = client.analyze(&request).await?;
    info!(specimen = %analysis.specimen_name, "Analysis received");

    let saved_id = if options.save {
        let specimen = specimen_from_analysis(&image_data, &analysis, &options.context);
        let id = client.create_specimen(&specimen).await?;
        info!(id, "Specimen saved to library");
        Some(id)
    } else {
        None
    };

    let report = if options.report {
        Some(client.report(&analysis.text, options.api_key.as_deref()).await?)
    } else {
        None
    };

    Ok(SnapOutcome {
        image_data,
        analysis,
        saved_id,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specimen_from_analysis_copies_context() {
        let analysis = AnalyzeResponse {
            text: "🔬 **Specimen**: Stentor".to_string(),
            specimen_name: "Stentor".to_string(),
        };
        let context = AnalysisContext {
            magnification: "100x".to_string(),
            microscope_type: "darkfield".to_string(),
            student_level: "Grade 11".to_string(),
        };

        let specimen = specimen_from_analysis("QUJD", &analysis, &context);

        assert_eq!(specimen.name.as_deref(), Some("Stentor"));
        assert_eq!(specimen.image_data.as_deref(), Some("QUJD"));
        assert_eq!(specimen.analysis.as_deref(), Some("🔬 **Specimen**: Stentor"));
        assert_eq!(specimen.magnification.as_deref(), Some("100x"));
        assert_eq!(specimen.microscope_type.as_deref(), Some("darkfield"));
    }
}
