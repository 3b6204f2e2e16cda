//! API module for shared HTTP API types
//!
//! Request and response bodies exchanged between the MicroScope server and
//! its clients (capture CLI, browser frontend).
//!
//! # Design Principle
//!
//! This module contains ONLY plain serde types, no HTTP framework
//! dependencies. The server wraps them in axum extractors; the capture
//! client sends them with reqwest.

pub mod types;

pub use types::*;
