//! Error types for mscope-capture

use thiserror::Error;

/// Shown whenever the frame source cannot be opened
pub const CAMERA_UNAVAILABLE_MESSAGE: &str =
    "Could not access camera. Please ensure permissions are granted.";

/// Frame source failures
///
/// The detail is logged; the user only ever sees
/// [`CAMERA_UNAVAILABLE_MESSAGE`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Frame source I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Frame source is not open")]
    NotOpen,
}

/// Capture controller failures
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The stream could not be opened or is in the failed state
    #[error("{}", CAMERA_UNAVAILABLE_MESSAGE)]
    CameraUnavailable,

    /// `capture()` called with no active stream
    #[error("Camera is not streaming")]
    NotStreaming,

    #[error("Failed to grab frame: {0}")]
    Grab(#[source] SourceError),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

/// Server API failures
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not reach server: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Not found")]
    NotFound,
}
