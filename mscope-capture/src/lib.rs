//! mscope-capture library - capture client for MicroScope AI
//!
//! Drives a frame source, encodes frames for analysis and talks to
//! mscope-server for analysis, reports and the specimen library.

pub mod client;
pub mod config;
pub mod controller;
pub mod encode;
pub mod error;
pub mod frame_source;
pub mod pipeline;
pub mod render;

pub use client::ScopeClient;
pub use controller::{CaptureController, StreamState};
pub use error::{CaptureError, ClientError, SourceError, CAMERA_UNAVAILABLE_MESSAGE};
pub use frame_source::{Facing, FrameSource, PatternSource, StillImageSource, StreamConstraints};
pub use pipeline::{snap, PipelineError, SnapOptions, SnapOutcome};
