//! Analysis context labels
//!
//! Magnification, microscope type and student level are free-text labels
//! passed through to the prompt and stored with the specimen. The presets
//! below are what the settings screen offers; nothing validates against them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAGNIFICATION_PRESETS: &[&str] = &["40x", "100x", "400x", "1000x"];

pub const STUDENT_LEVELS: &[&str] = &[
    "Middle School",
    "Grade 9",
    "Grade 10",
    "Grade 11",
    "Grade 12",
    "University",
];

pub const DEFAULT_MAGNIFICATION: &str = "400x";
pub const DEFAULT_STUDENT_LEVEL: &str = "Grade 10";

/// Illumination technique of the microscope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MicroscopeType {
    #[default]
    Brightfield,
    Darkfield,
    Fluorescence,
}

impl MicroscopeType {
    pub const ALL: [MicroscopeType; 3] = [
        MicroscopeType::Brightfield,
        MicroscopeType::Darkfield,
        MicroscopeType::Fluorescence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MicroscopeType::Brightfield => "brightfield",
            MicroscopeType::Darkfield => "darkfield",
            MicroscopeType::Fluorescence => "fluorescence",
        }
    }
}

impl fmt::Display for MicroscopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MicroscopeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brightfield" => Ok(MicroscopeType::Brightfield),
            "darkfield" => Ok(MicroscopeType::Darkfield),
            "fluorescence" => Ok(MicroscopeType::Fluorescence),
            other => Err(format!(
                "unknown microscope type '{}', expected brightfield, darkfield or fluorescence",
                other
            )),
        }
    }
}

/// Labels attached to one analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub magnification: String,
    pub microscope_type: String,
    pub student_level: String,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self {
            magnification: DEFAULT_MAGNIFICATION.to_string(),
            microscope_type: MicroscopeType::default().to_string(),
            student_level: DEFAULT_STUDENT_LEVEL.to_string(),
        }
    }
}
