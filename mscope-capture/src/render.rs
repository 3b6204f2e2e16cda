//! Terminal rendering for the shell subcommands

use mscope_common::analysis_text::split_sections;
use mscope_common::api::AnalysisOptions;
use mscope_common::Specimen;
use std::fmt::Write as _;

const UNNAMED: &str = "(unnamed)";

/// One line per specimen: id, name, magnification, type, timestamp
pub fn specimen_table(specimens: &[&Specimen]) -> String {
    if specimens.is_empty() {
        return "No specimens in the library.".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:<32} {:<7} {:<13} {}", "ID", "NAME", "MAG", "TYPE", "CAPTURED");
    for s in specimens {
        let _ = writeln!(
            out,
            "{:>5}  {:<32} {:<7} {:<13} {}",
            s.id,
            truncate(s.name.as_deref().unwrap_or(UNNAMED), 32),
            s.magnification.as_deref().unwrap_or("-"),
            s.microscope_type.as_deref().unwrap_or("-"),
            s.created_at
        );
    }
    out
}

/// Analysis text laid out by section; raw text when it has no headings
pub fn analysis(text: &str) -> String {
    let sections = split_sections(text);
    if sections.is_empty() {
        return text.to_string();
    }

    let mut out = String::new();
    for section in sections {
        let _ = writeln!(out, "{} {}", section.marker, section.heading);
        for line in section.body.lines() {
            let _ = writeln!(out, "    {}", line);
        }
        out.push('\n');
    }
    out
}

pub fn specimen_detail(specimen: &Specimen) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", specimen.id, specimen.name.as_deref().unwrap_or(UNNAMED));
    let _ = writeln!(
        out,
        "Magnification: {}  Type: {}  Captured: {}",
        specimen.magnification.as_deref().unwrap_or("-"),
        specimen.microscope_type.as_deref().unwrap_or("-"),
        specimen.created_at
    );
    if let Some(image) = &specimen.image_data {
        let _ = writeln!(out, "Image: {} bytes base64", image.len());
    }
    out.push('\n');
    out.push_str(&analysis(specimen.analysis.as_deref().unwrap_or("")));
    out
}

pub fn options(options: &AnalysisOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Magnifications:   {}", options.magnifications.join(", "));
    let _ = writeln!(out, "Microscope types: {}", options.microscope_types.join(", "));
    let _ = writeln!(out, "Student levels:   {}", options.student_levels.join(", "));
    let _ = writeln!(
        out,
        "Defaults:         {} / {} / {}",
        options.defaults.magnification, options.defaults.microscope_type, options.defaults.student_level
    );
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max - 1).collect();
        t.push('…');
        t
    }
}
