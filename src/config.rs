//! Booth configuration.
//!
//! Every field has a default matching the stock booth, so an empty JSON object (or no file at
//! all) is a valid configuration. Unknown keys are rejected to catch typos early.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::filters::registry::{FilterRegistry, FilterSpec, default_specs};
use crate::foundation::core::PixelSize;
use crate::foundation::error::{BoothError, BoothResult};
use crate::stickers::editor::EditorGeometry;
use crate::stickers::palette::{DEFAULT_GLYPHS, StickerPalette};
use crate::strip::compositor::DEFAULT_EXPORT_FILENAME;
use crate::strip::layout::StripLayout;

/// Tunables for a booth session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoothConfig {
    /// Photos per strip.
    pub target_photos: usize,
    /// Countdown length in ticks.
    pub countdown_seconds: u32,
    /// Countdown tick period in milliseconds.
    pub tick_ms: u64,
    /// Delay between the last capture and the strip screen, in milliseconds.
    pub transition_delay_ms: u64,
    /// Route each still through the sticker editor before it joins the strip.
    pub stickers_enabled: bool,
    /// On-screen area of the sticker editor.
    pub display: PixelSize,
    /// Sticker glyph size in display pixels.
    pub sticker_glyph_px: f64,
    /// Pointer offset to the glyph's top-left while dragging.
    pub drag_anchor_px: f64,
    /// Sticker glyphs, in picker order.
    pub palette: Vec<String>,
    /// Filters, in picker order. The first one is selected initially.
    pub filters: Vec<FilterSpec>,
    /// Strip geometry.
    pub strip: StripLayout,
    /// Name of the exported strip file.
    pub export_filename: String,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            target_photos: 3,
            countdown_seconds: 3,
            tick_ms: 1000,
            transition_delay_ms: 1000,
            stickers_enabled: true,
            display: PixelSize {
                width: 400,
                height: 300,
            },
            sticker_glyph_px: 24.0,
            drag_anchor_px: 12.0,
            palette: DEFAULT_GLYPHS.iter().map(|g| (*g).to_owned()).collect(),
            filters: default_specs(),
            strip: StripLayout::default(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_owned(),
        }
    }
}

impl BoothConfig {
    /// Parse from a JSON reader and validate.
    pub fn from_reader<R: std::io::Read>(r: R) -> BoothResult<Self> {
        let cfg: BoothConfig = serde_json::from_reader(r)
            .map_err(|e| BoothError::validation(format!("parse booth config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse from a JSON file on disk and validate.
    pub fn from_path(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BoothError::validation(format!("open booth config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> BoothResult<()> {
        if self.target_photos == 0 {
            return Err(BoothError::validation("target_photos must be >= 1"));
        }
        if self.countdown_seconds == 0 {
            return Err(BoothError::validation("countdown_seconds must be >= 1"));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(BoothError::validation("display size must be non-zero"));
        }
        if !self.sticker_glyph_px.is_finite() || self.sticker_glyph_px <= 0.0 {
            return Err(BoothError::validation("sticker_glyph_px must be > 0"));
        }
        if !self.drag_anchor_px.is_finite() {
            return Err(BoothError::validation("drag_anchor_px must be finite"));
        }
        if self.export_filename.trim().is_empty()
            || self.export_filename.contains(['/', '\\'])
        {
            return Err(BoothError::validation(
                "export_filename must be a plain file name",
            ));
        }
        self.palette()?;
        self.filter_registry()?;
        self.strip.validate()
    }

    /// Sticker palette built from `palette`.
    pub fn palette(&self) -> BoothResult<StickerPalette> {
        StickerPalette::new(self.palette.clone())
    }

    /// Filter registry built from `filters`.
    pub fn filter_registry(&self) -> BoothResult<FilterRegistry> {
        FilterRegistry::new(self.filters.clone())
    }

    /// Sticker editor geometry.
    pub fn editor_geometry(&self) -> EditorGeometry {
        EditorGeometry {
            display: self.display,
            glyph_px: self.sticker_glyph_px,
            drag_anchor_px: self.drag_anchor_px,
        }
    }

    /// Countdown tick period.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Delay before the strip screen appears.
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
