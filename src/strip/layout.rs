use serde::{Deserialize, Serialize};

use crate::foundation::core::{PixelSize, Rect, Rgba8};
use crate::foundation::error::{BoothError, BoothResult};

/// Cosmetic rectangle drawn at a fixed offset from every photo's top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Decoration {
    /// Offset from the photo's left edge.
    pub x: f64,
    /// Offset from the photo's top edge.
    pub y: f64,
    /// Rectangle width.
    pub width: f64,
    /// Rectangle height.
    pub height: f64,
    /// Fill colour.
    pub color: Rgba8,
}

/// Fixed geometry of the exported strip.
///
/// Canvas height for `n` photos is `header_height + (photo_height + padding) * n + padding`;
/// photo `i` sits at `(padding, header_height + (photo_height + padding) * i + padding)` and
/// is stretched to `(width - 2 * padding) x photo_height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripLayout {
    /// Canvas width.
    pub width: u32,
    /// Height every photo is stretched to.
    pub photo_height: u32,
    /// Gap around and between photos.
    pub padding: u32,
    /// Height of the title band.
    pub header_height: u32,
    /// Header text.
    pub title: String,
    /// Title baseline, from the top of the canvas.
    pub title_baseline: f64,
    /// Title font size.
    pub title_px: f64,
    /// Title fill.
    pub title_color: Rgba8,
    /// Canvas fill.
    pub background: Rgba8,
    /// Per-photo cosmetic rectangles.
    pub decorations: Vec<Decoration>,
}

impl Default for StripLayout {
    fn default() -> Self {
        Self {
            width: 400,
            photo_height: 300,
            padding: 20,
            header_height: 60,
            title: "Photo Booth".to_owned(),
            title_baseline: 35.0,
            title_px: 20.0,
            title_color: Rgba8::opaque(0x64, 0x74, 0x8b),
            background: Rgba8::WHITE,
            decorations: Vec::new(),
        }
    }
}

impl StripLayout {
    /// Reject geometry that leaves no room for a photo.
    pub fn validate(&self) -> BoothResult<()> {
        if self.width <= self.padding.saturating_mul(2) {
            return Err(BoothError::validation(format!(
                "strip width {} must exceed twice the padding {}",
                self.width, self.padding
            )));
        }
        if self.photo_height == 0 {
            return Err(BoothError::validation("strip photo_height must be > 0"));
        }
        if !self.title_px.is_finite() || self.title_px <= 0.0 {
            return Err(BoothError::validation("strip title_px must be > 0"));
        }
        if !self.title_baseline.is_finite() {
            return Err(BoothError::validation("strip title_baseline must be finite"));
        }
        for (i, d) in self.decorations.iter().enumerate() {
            let finite = [d.x, d.y, d.width, d.height].iter().all(|v| v.is_finite());
            if !finite || d.width < 0.0 || d.height < 0.0 {
                return Err(BoothError::validation(format!(
                    "decoration #{i} has an invalid rectangle"
                )));
            }
        }
        Ok(())
    }

    /// Canvas height for `count` photos.
    pub fn canvas_height(&self, count: usize) -> u64 {
        u64::from(self.header_height)
            + (u64::from(self.photo_height) + u64::from(self.padding)) * count as u64
            + u64::from(self.padding)
    }

    /// Canvas size for `count` photos.
    pub fn canvas_size(&self, count: usize) -> BoothResult<PixelSize> {
        let height = u32::try_from(self.canvas_height(count))
            .map_err(|_| BoothError::validation(format!("strip of {count} photos is too tall")))?;
        PixelSize::new(self.width, height)
    }

    /// Destination rectangle of photo `index`.
    pub fn photo_rect(&self, index: usize) -> Rect {
        let pad = f64::from(self.padding);
        let y = f64::from(self.header_height)
            + (f64::from(self.photo_height) + pad) * index as f64
            + pad;
        Rect::new(
            pad,
            y,
            f64::from(self.width) - pad,
            y + f64::from(self.photo_height),
        )
    }

    /// Decorations of photo `index`, in canvas coordinates.
    pub fn decoration_rects(&self, index: usize) -> impl Iterator<Item = (Rect, Rgba8)> + '_ {
        let origin = self.photo_rect(index).origin();
        self.decorations.iter().map(move |d| {
            (
                Rect::new(
                    origin.x + d.x,
                    origin.y + d.y,
                    origin.x + d.x + d.width,
                    origin.y + d.y + d.height,
                ),
                d.color,
            )
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/layout.rs"]
mod tests;
