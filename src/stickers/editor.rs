//! Sticker placement over one captured still.
//!
//! Positions are stored as fractions of the on-screen display area, so the same sticker maps
//! onto any native resolution with a per-axis scale at bake time. Callers speak display pixels.

use image::RgbaImage;
use tracing::debug;

use crate::capture::still::StillImage;
use crate::foundation::core::{PixelSize, Point};
use crate::foundation::error::{BoothError, BoothResult};
use crate::stickers::glyphs::{GlyphRasterizer, TextItem};
use crate::stickers::palette::StickerPalette;

/// Unique sticker token, never reused within an editor.
pub type StickerId = u64;

/// A glyph placed on a still.
#[derive(Clone, Debug, PartialEq)]
pub struct Sticker {
    /// Identity for move/remove/drag.
    pub id: StickerId,
    /// Palette symbol.
    pub glyph: String,
    /// Top-left of the glyph as a fraction of the display area.
    pub position: Point,
    /// Index of the still this sticker belongs to.
    pub owner_image_index: usize,
}

/// On-screen geometry of the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorGeometry {
    /// Area the still is shown in.
    pub display: PixelSize,
    /// Glyph font size in display pixels.
    ///
    /// Baking scales it by the vertical display-to-native ratio, so a sticker keeps the size it
    /// had on screen relative to the photo rather than a fixed pixel size at native resolution.
    pub glyph_px: f64,
    /// Offset from the pointer to the glyph's top-left while dragging.
    pub drag_anchor_px: f64,
}

impl Default for EditorGeometry {
    fn default() -> Self {
        Self {
            display: PixelSize {
                width: 400,
                height: 300,
            },
            glyph_px: 24.0,
            drag_anchor_px: 12.0,
        }
    }
}

/// Editor session for exactly one still.
#[derive(Debug)]
pub struct StickerEditor {
    still: StillImage,
    owner_image_index: usize,
    palette: StickerPalette,
    geometry: EditorGeometry,
    stickers: Vec<Sticker>,
    next_id: StickerId,
    dragging: Option<StickerId>,
}

impl StickerEditor {
    /// Start editing `still`, the `owner_image_index`-th photo of the session.
    pub fn new(
        still: StillImage,
        owner_image_index: usize,
        palette: StickerPalette,
        geometry: EditorGeometry,
    ) -> Self {
        Self {
            still,
            owner_image_index,
            palette,
            geometry,
            stickers: Vec::new(),
            next_id: 1,
            dragging: None,
        }
    }

    /// The still being decorated.
    pub fn still(&self) -> &StillImage {
        &self.still
    }

    /// Glyphs available for placement.
    pub fn palette(&self) -> &StickerPalette {
        &self.palette
    }

    /// Display geometry.
    pub fn geometry(&self) -> EditorGeometry {
        self.geometry
    }

    /// Stickers in insertion (draw) order.
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Sticker currently bound to the pointer.
    pub fn dragging(&self) -> Option<StickerId> {
        self.dragging
    }

    /// Top-left of a sticker in display pixels.
    pub fn display_position(&self, id: StickerId) -> Option<Point> {
        self.find(id).map(|s| self.to_display(s.position))
    }

    /// Add a sticker at display coordinates. Positions are not clamped.
    pub fn place(&mut self, glyph: &str, x: f64, y: f64) -> BoothResult<Sticker> {
        if !self.palette.contains(glyph) {
            return Err(BoothError::validation(format!(
                "'{glyph}' is not in the sticker palette"
            )));
        }
        let position = self.to_fraction(x, y)?;
        let sticker = Sticker {
            id: self.next_id,
            glyph: glyph.to_owned(),
            position,
            owner_image_index: self.owner_image_index,
        };
        self.next_id += 1;
        self.stickers.push(sticker.clone());
        debug!(id = sticker.id, glyph, x, y, "sticker placed");
        Ok(sticker)
    }

    /// Move a sticker; unknown ids and non-finite coordinates are ignored.
    pub fn move_sticker(&mut self, id: StickerId, x: f64, y: f64) {
        let Ok(position) = self.to_fraction(x, y) else {
            return;
        };
        if let Some(s) = self.stickers.iter_mut().find(|s| s.id == id) {
            s.position = position;
        }
    }

    /// Remove a sticker; unknown ids are ignored.
    pub fn remove(&mut self, id: StickerId) {
        self.stickers.retain(|s| s.id != id);
        if self.dragging == Some(id) {
            self.dragging = None;
        }
    }

    /// Bind `id` to the pointer. Returns `false` (and binds nothing) for unknown ids.
    pub fn begin_drag(&mut self, id: StickerId) -> bool {
        if self.find(id).is_some() {
            self.dragging = Some(id);
            true
        } else {
            self.dragging = None;
            false
        }
    }

    /// Pointer moved to display `(x, y)`; moves the bound sticker so the pointer sits on its centre.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some(id) = self.dragging else {
            return;
        };
        let anchor = self.geometry.drag_anchor_px;
        self.move_sticker(id, x - anchor, y - anchor);
    }

    /// Pointer released: always clears the binding.
    pub fn pointer_up(&mut self) {
        self.dragging = None;
    }

    /// Glyph top-left in the still's native pixel space.
    pub fn native_anchor(&self, sticker: &Sticker, native: PixelSize) -> Point {
        Point::new(
            sticker.position.x * f64::from(native.width),
            sticker.position.y * f64::from(native.height),
        )
    }

    /// Bake every sticker into the still, in insertion order, at native resolution.
    #[tracing::instrument(skip_all, fields(stickers = self.stickers.len()))]
    pub fn finalize(self, glyphs: &GlyphRasterizer) -> BoothResult<StillImage> {
        if self.stickers.is_empty() {
            return Ok(self.still);
        }
        let mut img: RgbaImage = self.still.decode()?;
        let items = self.glyph_items(self.still.size());
        glyphs.draw_onto(&mut img, &items)?;
        self.still.with_pixels(&img)
    }

    pub(crate) fn glyph_items(&self, native: PixelSize) -> Vec<TextItem> {
        let scale = self.geometry.display.scale_to(native);
        let font_px = self.geometry.glyph_px * scale.y;
        self.stickers
            .iter()
            .map(|s| {
                let at = self.native_anchor(s, native);
                TextItem::glyph(s.glyph.clone(), at.x, at.y + font_px, font_px)
            })
            .collect()
    }

    fn find(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    fn to_fraction(&self, x: f64, y: f64) -> BoothResult<Point> {
        if !x.is_finite() || !y.is_finite() {
            return Err(BoothError::validation("sticker position must be finite"));
        }
        Ok(Point::new(
            x / f64::from(self.geometry.display.width),
            y / f64::from(self.geometry.display.height),
        ))
    }

    fn to_display(&self, p: Point) -> Point {
        Point::new(
            p.x * f64::from(self.geometry.display.width),
            p.y * f64::from(self.geometry.display.height),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stickers/editor.rs"]
mod tests;
