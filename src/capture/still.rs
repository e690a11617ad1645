use std::io::Cursor;
use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::PixelSize;
use crate::foundation::error::{BoothError, BoothResult};

/// One captured photo: PNG-encoded pixels tagged with the filter expression baked into them.
///
/// Immutable; edits such as sticker baking produce a new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillImage {
    png: Arc<Vec<u8>>,
    size: PixelSize,
    filter_expression: String,
}

impl StillImage {
    /// Encode `img` as PNG.
    pub fn encode(img: &RgbaImage, filter_expression: impl Into<String>) -> BoothResult<Self> {
        let size = PixelSize::new(img.width(), img.height())?;
        Ok(Self {
            png: Arc::new(encode_png(img)?),
            size,
            filter_expression: filter_expression.into(),
        })
    }

    /// Wrap already encoded bytes (any format `image` can sniff); the header is read for the size.
    pub fn from_encoded(bytes: Vec<u8>, filter_expression: impl Into<String>) -> BoothResult<Self> {
        let img = decode_bytes(&bytes)?;
        Self::encode(&img, filter_expression)
    }

    /// Decode to straight RGBA8.
    pub fn decode(&self) -> BoothResult<RgbaImage> {
        let img = decode_bytes(&self.png)?;
        if img.width() != self.size.width || img.height() != self.size.height {
            return Err(BoothError::encode("decoded still does not match its recorded size"));
        }
        Ok(img)
    }

    /// A new still with `img` as pixels and the same filter tag.
    pub fn with_pixels(&self, img: &RgbaImage) -> BoothResult<Self> {
        Self::encode(img, self.filter_expression.clone())
    }

    /// Native pixel size.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Encoded PNG bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Filter expression that was applied when the still was captured.
    pub fn filter_expression(&self) -> &str {
        &self.filter_expression
    }
}

pub(crate) fn encode_png(img: &RgbaImage) -> BoothResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| BoothError::encode(format!("PNG encoding failed: {e}")))?;
    Ok(buf)
}

fn decode_bytes(bytes: &[u8]) -> BoothResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| BoothError::encode(format!("image decoding failed: {e}")))?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/still.rs"]
mod tests;
