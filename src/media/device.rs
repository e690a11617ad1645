//! Camera-like frame sources.
//!
//! A [`VideoDevice`] is something that can be opened; the resulting [`FrameStream`] yields the
//! most recent frame until stopped. The booth never talks to real hardware directly: the CLI
//! feeds it a still image or a generated test pattern through the same seam.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::foundation::core::{PixelSize, Rgba8};
use crate::foundation::error::{BoothError, BoothResult};
use crate::media::frame::VideoFrame;

/// An open video feed.
pub trait FrameStream: Send {
    /// The most recent frame, or `None` once stopped or before the first frame arrives.
    fn latest_frame(&mut self) -> Option<VideoFrame>;
    /// Stop every underlying track. Calling it twice is harmless.
    fn stop(&mut self);
}

/// A source that can be opened into a [`FrameStream`].
pub trait VideoDevice {
    /// Human-readable device label, used in logs.
    fn name(&self) -> &str;
    /// Open the device; fails with `MediaUnavailable` when access is denied or nothing is there.
    fn open(&mut self) -> BoothResult<Box<dyn FrameStream>>;
}

/// Stream that keeps serving one frame until stopped.
#[derive(Debug)]
pub struct StaticFrameStream {
    frame: Option<VideoFrame>,
}

impl StaticFrameStream {
    /// Serve `frame`, mirrored when `mirror` is set.
    pub fn new(frame: VideoFrame, mirror: bool) -> Self {
        let frame = if mirror { frame.mirrored() } else { frame };
        Self { frame: Some(frame) }
    }
}

impl FrameStream for StaticFrameStream {
    fn latest_frame(&mut self) -> Option<VideoFrame> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}

/// Vertical colour bars at a fixed resolution.
#[derive(Clone, Debug)]
pub struct TestPatternDevice {
    size: PixelSize,
    mirror: bool,
}

const BARS: [Rgba8; 7] = [
    Rgba8::opaque(235, 235, 235),
    Rgba8::opaque(235, 235, 16),
    Rgba8::opaque(16, 235, 235),
    Rgba8::opaque(16, 235, 16),
    Rgba8::opaque(235, 16, 235),
    Rgba8::opaque(235, 16, 16),
    Rgba8::opaque(16, 16, 235),
];

impl TestPatternDevice {
    /// Pattern device producing frames of `size`.
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            mirror: false,
        }
    }

    /// Flip frames horizontally, as a front camera preview does.
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Render the pattern once.
    pub fn pattern(size: PixelSize) -> BoothResult<VideoFrame> {
        let width = size.width as usize;
        let mut row = Vec::with_capacity(width * 4);
        for x in 0..width {
            let bar = BARS[x * BARS.len() / width];
            row.extend_from_slice(&[bar.r, bar.g, bar.b, bar.a]);
        }
        let mut data = Vec::with_capacity(size.rgba_len());
        for _ in 0..size.height {
            data.extend_from_slice(&row);
        }
        VideoFrame::new(size, data)
    }
}

impl VideoDevice for TestPatternDevice {
    fn name(&self) -> &str {
        "test-pattern"
    }

    fn open(&mut self) -> BoothResult<Box<dyn FrameStream>> {
        debug!(width = self.size.width, height = self.size.height, "opening test pattern");
        let frame = Self::pattern(self.size)?;
        Ok(Box::new(StaticFrameStream::new(frame, self.mirror)))
    }
}

/// Virtual camera that serves a still image file as its only frame.
#[derive(Clone, Debug)]
pub struct ImageFileDevice {
    path: PathBuf,
    label: String,
    mirror: bool,
}

impl ImageFileDevice {
    /// Device backed by the image at `path`; the file is read on `open`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        Self {
            path,
            label,
            mirror: false,
        }
    }

    /// Flip frames horizontally.
    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }
}

impl VideoDevice for ImageFileDevice {
    fn name(&self) -> &str {
        &self.label
    }

    fn open(&mut self) -> BoothResult<Box<dyn FrameStream>> {
        let img = image::open(&self.path).map_err(|e| {
            BoothError::media_unavailable(format!("cannot open '{}': {e}", self.path.display()))
        })?;
        let frame = VideoFrame::from_image(img.to_rgba8())?;
        debug!(path = %self.path.display(), "opened image file source");
        Ok(Box::new(StaticFrameStream::new(frame, self.mirror)))
    }
}

/// A device slot with nothing behind it: every `open` fails.
#[derive(Clone, Debug)]
pub struct NoDevice {
    reason: String,
}

impl NoDevice {
    /// Device whose `open` fails with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for NoDevice {
    fn default() -> Self {
        Self::new("no camera present")
    }
}

impl VideoDevice for NoDevice {
    fn name(&self) -> &str {
        "none"
    }

    fn open(&mut self) -> BoothResult<Box<dyn FrameStream>> {
        Err(BoothError::media_unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/device.rs"]
mod tests;
