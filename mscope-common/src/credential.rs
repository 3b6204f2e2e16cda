//! Remote-model credential parsing and resolution
//!
//! A credential is the Gemini API key. Only strings starting with
//! [`CREDENTIAL_PREFIX`] (after trimming) are accepted.
//!
//! Resolution order is fixed for every remote call site:
//! 1. Explicit argument (request body, CLI flag)
//! 2. Stored configuration (written by the settings API)
//! 3. Process default (`GEMINI_API_KEY` captured at startup)

use std::fmt;
use thiserror::Error;

/// Required prefix of a Gemini API key
pub const CREDENTIAL_PREFIX: &str = "AIza";

/// Environment variable holding the process-level fallback credential
pub const PROCESS_CREDENTIAL_ENV: &str = "GEMINI_API_KEY";

/// Raised before any network call when no usable credential exists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error(
        "Missing or Invalid API Key. Please go to Settings and paste a valid Gemini API key starting with 'AIza'."
    )]
    Missing,
}

/// A well-formed API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim and validate a candidate key; `None` when it lacks the prefix
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with(CREDENTIAL_PREFIX) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({}…, len={})", CREDENTIAL_PREFIX, self.0.len())
    }
}

/// Where a resolved credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    Stored,
    ProcessDefault,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Explicit => "explicit",
            CredentialSource::Stored => "stored",
            CredentialSource::ProcessDefault => "process default",
        }
    }
}

/// Resolve a credential from the three sources in precedence order
///
/// Malformed candidates are skipped, not reported: a bad explicit key falls
/// through to the stored key.
pub fn resolve_credential(
    explicit: Option<&str>,
    stored: Option<&str>,
    process_default: Option<&str>,
) -> Result<(Credential, CredentialSource), CredentialError> {
    let candidates = [
        (explicit, CredentialSource::Explicit),
        (stored, CredentialSource::Stored),
        (process_default, CredentialSource::ProcessDefault),
    ];

    candidates
        .into_iter()
        .find_map(|(candidate, source)| candidate.and_then(Credential::parse).map(|c| (c, source)))
        .ok_or(CredentialError::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_requires_prefix() {
        let credential = Credential::parse("  AIzaSyExample \n").unwrap();
        assert_eq!(credential.as_str(), "AIzaSyExample");

        assert!(Credential::parse("sk-not-a-gemini-key").is_none());
        assert!(Credential::parse("").is_none());
        assert!(Credential::parse("   ").is_none());
    }

    #[test]
    fn test_explicit_wins() {
        let (credential, source) =
            resolve_credential(Some("AIzaExplicit"), Some("AIzaStored"), Some("AIzaEnv")).unwrap();
        assert_eq!(credential.as_str(), "AIzaExplicit");
        assert_eq!(source, CredentialSource::Explicit);
    }

    #[test]
    fn test_malformed_explicit_falls_through_to_stored() {
        let (credential, source) =
            resolve_credential(Some("bogus"), Some("AIzaStored"), Some("AIzaEnv")).unwrap();
        assert_eq!(credential.as_str(), "AIzaStored");
        assert_eq!(source, CredentialSource::Stored);
    }

    #[test]
    fn test_process_default_is_last_resort() {
        let (credential, source) = resolve_credential(None, None, Some("AIzaEnv")).unwrap();
        assert_eq!(credential.as_str(), "AIzaEnv");
        assert_eq!(source, CredentialSource::ProcessDefault);
    }

    #[test]
    fn test_nothing_usable_is_missing() {
        let err = resolve_credential(Some("nope"), None, Some("also-nope")).unwrap_err();
        assert_eq!(err, CredentialError::Missing);
        assert!(err.to_string().contains("starting with 'AIza'"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let credential = Credential::parse("AIzaSuperSecretValue").unwrap();
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("SuperSecret"));
    }
}
