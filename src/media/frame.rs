use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::PixelSize;
use crate::foundation::error::{BoothError, BoothResult};

/// One live video frame: straight (non-premultiplied) RGBA8 at the device's native size.
///
/// Pixel storage is shared, so handing the latest frame to the capture engine is a refcount bump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    size: PixelSize,
    rgba: Arc<Vec<u8>>,
}

impl VideoFrame {
    /// Wrap a tightly packed RGBA8 buffer. Zero-sized frames are rejected.
    pub fn new(size: PixelSize, rgba: Vec<u8>) -> BoothResult<Self> {
        let size = PixelSize::new(size.width, size.height)?;
        if rgba.len() != size.rgba_len() {
            return Err(BoothError::validation(format!(
                "frame buffer is {} bytes, expected {} for {}x{}",
                rgba.len(),
                size.rgba_len(),
                size.width,
                size.height
            )));
        }
        Ok(Self {
            size,
            rgba: Arc::new(rgba),
        })
    }

    /// Take ownership of a decoded image.
    pub fn from_image(img: RgbaImage) -> BoothResult<Self> {
        let size = PixelSize::new(img.width(), img.height())?;
        Self::new(size, img.into_raw())
    }

    /// Native frame size.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.rgba
    }

    /// Copy into an owned image buffer.
    pub fn to_image(&self) -> BoothResult<RgbaImage> {
        RgbaImage::from_raw(self.size.width, self.size.height, self.rgba.as_ref().clone())
            .ok_or_else(|| BoothError::validation("frame buffer does not match its size"))
    }

    /// Horizontally flipped copy (selfie view).
    pub fn mirrored(&self) -> Self {
        let width = self.size.width as usize;
        let mut data = self.rgba.as_ref().clone();
        for row in data.chunks_exact_mut(width * 4) {
            for x in 0..width / 2 {
                let left = x * 4;
                let right = (width - 1 - x) * 4;
                for i in 0..4 {
                    row.swap(left + i, right + i);
                }
            }
        }
        Self {
            size: self.size,
            rgba: Arc::new(data),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/frame.rs"]
mod tests;
