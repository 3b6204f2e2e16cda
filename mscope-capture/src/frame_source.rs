//! Frame sources
//!
//! A [`FrameSource`] is the camera stream as the controller sees it: open it
//! with constraints, grab RGB frames, release it. Two implementations:
//!
//! - [`StillImageSource`] reads the newest frame a microscope camera adapter
//!   writes to an image file
//! - [`PatternSource`] renders a deterministic synthetic slide

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SourceError;

/// Which way the camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Rear camera, pointed into the eyepiece
    #[default]
    Environment,
    User,
}

/// Requested stream properties; sources honor them when they can
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            ideal_width: 1920,
            ideal_height: 1080,
        }
    }
}

pub trait FrameSource {
    fn open(&mut self, constraints: &StreamConstraints) -> Result<(), SourceError>;

    /// Current frame at native resolution
    fn grab(&mut self) -> Result<RgbImage, SourceError>;

    /// Stop the stream; safe to call when not open
    fn release(&mut self);

    fn is_open(&self) -> bool;
}

/// Reads frames from an image file that an external adapter keeps updating
pub struct StillImageSource {
    path: PathBuf,
    open: bool,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for StillImageSource {
    fn open(&mut self, constraints: &StreamConstraints) -> Result<(), SourceError> {
        // Decode once so a missing or corrupt file fails here, not at capture
        let frame = image::open(&self.path)?;
        debug!(
            path = %self.path.display(),
            width = frame.width(),
            height = frame.height(),
            ideal_width = constraints.ideal_width,
            ideal_height = constraints.ideal_height,
            "Opened still image source"
        );
        self.open = true;
        Ok(())
    }

    fn grab(&mut self) -> Result<RgbImage, SourceError> {
        if !self.open {
            return Err(SourceError::NotOpen);
        }
        Ok(image::open(&self.path)?.to_rgb8())
    }

    fn release(&mut self) {
        if self.open {
            debug!(path = %self.path.display(), "Released still image source");
        }
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Synthetic slide: a field of cell-like rings on a bright background
///
/// Same constraints always render the same pixels.
#[derive(Debug, Default)]
pub struct PatternSource {
    size: Option<(u32, u32)>,
}

impl PatternSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSource for PatternSource {
    fn open(&mut self, constraints: &StreamConstraints) -> Result<(), SourceError> {
        self.size = Some((constraints.ideal_width.max(1), constraints.ideal_height.max(1)));
        Ok(())
    }

    fn grab(&mut self) -> Result<RgbImage, SourceError> {
        let (width, height) = self.size.ok_or(SourceError::NotOpen)?;
        Ok(render_pattern(width, height))
    }

    fn release(&mut self) {
        self.size = None;
    }

    fn is_open(&self) -> bool {
        self.size.is_some()
    }
}

fn render_pattern(width: u32, height: u32) -> RgbImage {
    let cell = (width.min(height) / 6).max(8);
    let radius = cell as f32 * 0.4;

    RgbImage::from_fn(width, height, |x, y| {
        let cx = (x % cell) as f32 - cell as f32 / 2.0;
        let cy = (y % cell) as f32 - cell as f32 / 2.0;
        let d = (cx * cx + cy * cy).sqrt();

        if (d - radius).abs() < 2.0 {
            Rgb([40, 120, 60])
        } else if d < radius * 0.25 {
            Rgb([90, 40, 120])
        } else {
            Rgb([235, 240, 225])
        }
    })
}
