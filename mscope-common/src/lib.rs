//! # MicroScope Common Library
//!
//! Shared code for the MicroScope server and capture client:
//! - Specimen model and database initialization
//! - API request/response types
//! - Bootstrap configuration loading
//! - Credential parsing and resolution
//! - Analysis context labels and free-text analysis parsing

pub mod analysis_text;
pub mod api;
pub mod config;
pub mod context;
pub mod credential;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod library;
pub mod models;

pub use credential::{Credential, CredentialError};
pub use error::{Error, Result};
pub use models::{NewSpecimen, Specimen};
