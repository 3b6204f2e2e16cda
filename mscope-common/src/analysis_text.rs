//! Best-effort parsing of free-text model output
//!
//! The remote model is asked to answer in emoji-prefixed sections, but the
//! response is an untyped text blob. Nothing here fails: absent headings
//! produce the fallback name or an empty section list.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name used when the analysis has no `🔬 **Specimen**:` line
pub const FALLBACK_SPECIMEN_NAME: &str = "Unknown Specimen";

static SPECIMEN_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"🔬 \*\*Specimen\*\*: (.*)").expect("specimen pattern is valid"));

// "- 🧬 **Structures Identified**: rest of line"
static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*]\s+)?(\S+)\s+\*\*([^*]+)\*\*:?\s*(.*)$")
        .expect("section pattern is valid")
});

/// Pull the display name out of an analysis
pub fn extract_specimen_name(analysis: &str) -> String {
    SPECIMEN_LINE
        .captures(analysis)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| FALLBACK_SPECIMEN_NAME.to_string())
}

/// One heading of the analysis and the text under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSection {
    /// Leading marker, usually an emoji
    pub marker: String,
    pub heading: String,
    pub body: String,
}

/// Split an analysis into its headed sections
///
/// Text before the first heading is dropped. Continuation lines are appended
/// to the current section body.
pub fn split_sections(analysis: &str) -> Vec<AnalysisSection> {
    let mut sections: Vec<AnalysisSection> = Vec::new();

    for line in analysis.lines() {
        if let Some(caps) = SECTION_HEADING.captures(line) {
            sections.push(AnalysisSection {
                marker: caps[1].to_string(),
                heading: caps[2].trim().to_string(),
                body: caps[3].trim().to_string(),
            });
            continue;
        }

        if let Some(current) = sections.last_mut() {
            let trimmed = line.trim_end();
            if trimmed.is_empty() && current.body.is_empty() {
                continue;
            }
            if !current.body.is_empty() {
                current.body.push('\n');
            }
            current.body.push_str(trimmed);
        }
    }

    for section in &mut sections {
        let trimmed = section.body.trim_end().to_string();
        section.body = trimmed;
    }

    sections
}
