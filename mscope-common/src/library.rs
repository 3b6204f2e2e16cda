//! Client-side library filtering
//!
//! The server never filters; the library view narrows the full listing
//! locally by name or magnification.

use crate::models::Specimen;

/// Case-insensitive match of `term` against name or magnification
///
/// An empty term matches everything. NULL fields never match a non-empty term.
pub fn matches_search(specimen: &Specimen, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .map(|value| value.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };

    contains(&specimen.name) || contains(&specimen.magnification)
}

/// Keep the specimens matching `term`, preserving order
pub fn filter_specimens<'a>(specimens: &'a [Specimen], term: &str) -> Vec<&'a Specimen> {
    specimens
        .iter()
        .filter(|specimen| matches_search(specimen, term))
        .collect()
}
