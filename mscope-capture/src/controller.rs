//! Capture controller
//!
//! Owns the frame source for the lifetime of the live view. Opening is
//! idempotent; a failed open parks the controller in [`StreamState::Failed`]
//! until the user retries. There is no automatic retry and no fallback
//! source.

use tracing::{info, warn};

use crate::encode::encode_frame;
use crate::error::{CaptureError, CAMERA_UNAVAILABLE_MESSAGE};
use crate::frame_source::{FrameSource, StreamConstraints};

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Streaming,
    /// Carries the message shown in place of the live view
    Failed(String),
}

pub struct CaptureController<S: FrameSource> {
    source: S,
    constraints: StreamConstraints,
    state: StreamState,
    zoom: f32,
}

impl<S: FrameSource> CaptureController<S> {
    pub fn new(source: S) -> Self {
        Self::with_constraints(source, StreamConstraints::default())
    }

    pub fn with_constraints(source: S, constraints: StreamConstraints) -> Self {
        Self {
            source,
            constraints,
            state: StreamState::Idle,
            zoom: MIN_ZOOM,
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.state == StreamState::Streaming
    }

    /// Open the stream; a no-op while already streaming
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.is_streaming() {
            return Ok(());
        }

        match self.source.open(&self.constraints) {
            Ok(()) => {
                info!("Camera stream started");
                self.state = StreamState::Streaming;
                Ok(())
            }
            Err(e) => {
                warn!("Camera stream failed to open: {}", e);
                self.source.release();
                self.state = StreamState::Failed(CAMERA_UNAVAILABLE_MESSAGE.to_string());
                Err(CaptureError::CameraUnavailable)
            }
        }
    }

    /// User-initiated retry after a failure
    pub fn retry(&mut self) -> Result<(), CaptureError> {
        self.start()
    }

    pub fn stop(&mut self) {
        self.source.release();
        self.state = StreamState::Idle;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    // Rounded to one decimal so repeated steps land exactly on 1.0 and 3.0
    fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.zoom = ((zoom * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom
    }

    /// Label for the live view overlay, e.g. `1.4x`
    pub fn zoom_label(&self) -> String {
        format!("{:.1}x", self.zoom)
    }

    /// Grab the current frame and return it as bare base64 JPEG
    ///
    /// Zoom is a display transform only; the full frame is captured.
    pub fn capture(&mut self) -> Result<String, CaptureError> {
        match &self.state {
            StreamState::Streaming => {}
            StreamState::Failed(_) => return Err(CaptureError::CameraUnavailable),
            StreamState::Idle => return Err(CaptureError::NotStreaming),
        }

        let frame = self.source.grab().map_err(CaptureError::Grab)?;
        let payload = encode_frame(&frame)?;
        info!(
            width = frame.width(),
            height = frame.height(),
            bytes = payload.len(),
            "Frame captured"
        );
        Ok(payload)
    }
}

impl<S: FrameSource> Drop for CaptureController<S> {
    fn drop(&mut self) {
        self.source.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::frame_source::PatternSource;
    use image::RgbImage;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts opens and releases; fails to open while `fail` is set
    struct CountingSource {
        opens: Rc<Cell<u32>>,
        releases: Rc<Cell<u32>>,
        fail: Rc<Cell<bool>>,
        open: bool,
    }

    impl FrameSource for CountingSource {
        fn open(&mut self, _: &StreamConstraints) -> Result<(), SourceError> {
            self.opens.set(self.opens.get() + 1);
            if self.fail.get() {
                return Err(SourceError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                )));
            }
            self.open = true;
            Ok(())
        }

        fn grab(&mut self) -> Result<RgbImage, SourceError> {
            Ok(RgbImage::new(8, 8))
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    fn counting(fail: bool) -> (CountingSource, Rc<Cell<u32>>, Rc<Cell<u32>>, Rc<Cell<bool>>) {
        let opens = Rc::new(Cell::new(0));
        let releases = Rc::new(Cell::new(0));
        let fail = Rc::new(Cell::new(fail));
        let source = CountingSource {
            opens: opens.clone(),
            releases: releases.clone(),
            fail: fail.clone(),
            open: false,
        };
        (source, opens, releases, fail)
    }

    fn small_pattern() -> CaptureController<PatternSource> {
        CaptureController::with_constraints(
            PatternSource::new(),
            StreamConstraints {
                ideal_width: 32,
                ideal_height: 24,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_start_is_idempotent() {
        let (source, opens, _, _) = counting(false);
        let mut controller = CaptureController::new(source);

        controller.start().unwrap();
        controller.start().unwrap();
        controller.retry().unwrap();

        assert_eq!(opens.get(), 1);
        assert!(controller.is_streaming());
    }

    #[test]
    fn test_failed_open_sets_static_message() {
        let (source, _, _, fail) = counting(true);
        let mut controller = CaptureController::new(source);

        let err = controller.start().unwrap_err();

        assert_eq!(err.to_string(), CAMERA_UNAVAILABLE_MESSAGE);
        assert_eq!(
            controller.state(),
            &StreamState::Failed("Could not access camera. Please ensure permissions are granted.".to_string())
        );
        assert!(matches!(controller.capture(), Err(CaptureError::CameraUnavailable)));

        fail.set(false);
        controller.retry().unwrap();
        assert!(controller.is_streaming());
    }

    #[test]
    fn test_stop_and_drop_release_source() {
        let (source, _, releases, _) = counting(false);
        let mut controller = CaptureController::new(source);
        controller.start().unwrap();

        controller.stop();
        assert_eq!(controller.state(), &StreamState::Idle);
        let after_stop = releases.get();
        assert!(after_stop >= 1);

        drop(controller);
        assert_eq!(releases.get(), after_stop + 1);
    }

    #[test]
    fn test_capture_requires_stream() {
        let mut controller = small_pattern();
        assert!(matches!(controller.capture(), Err(CaptureError::NotStreaming)));
    }

    #[test]
    fn test_zoom_bounds() {
        let mut controller = small_pattern();
        assert_eq!(controller.zoom(), 1.0);

        assert_eq!(controller.zoom_out(), 1.0);
        for _ in 0..20 {
            controller.zoom_in();
        }
        assert_eq!(controller.zoom(), 3.0);
        assert_eq!(controller.zoom_label(), "3.0x");

        controller.zoom_out();
        assert_eq!(controller.zoom_label(), "2.8x");
    }

    #[test]
    fn test_zoom_does_not_crop_capture() {
        let mut controller = small_pattern();
        controller.start().unwrap();
        controller.zoom_in();
        controller.zoom_in();

        let payload = controller.capture().unwrap();
        let bytes = crate::encode::decode_base64(&payload).unwrap();
        let frame = image::load_from_memory(&bytes).unwrap();

        assert_eq!((frame.width(), frame.height()), (32, 24));
    }
}
