use crate::foundation::error::{BoothError, BoothResult};

/// Glyphs offered by the sticker picker, in display order.
pub const DEFAULT_GLYPHS: [&str; 10] = ["🧸", "🐰", "🎈", "🌸", "⭐", "💫", "🌟", "✨", "🦄", "🌈"];

/// Fixed set of decorative symbols a sticker may use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StickerPalette {
    glyphs: Vec<String>,
}

impl StickerPalette {
    /// Build a palette; every entry must be a single symbol and the list must not be empty.
    pub fn new(glyphs: Vec<String>) -> BoothResult<Self> {
        if glyphs.is_empty() {
            return Err(BoothError::validation("sticker palette must not be empty"));
        }
        for (i, g) in glyphs.iter().enumerate() {
            if !is_single_symbol(g) {
                return Err(BoothError::validation(format!(
                    "palette entry #{i} '{g}' is not a single symbol"
                )));
            }
            if glyphs[..i].contains(g) {
                return Err(BoothError::validation(format!(
                    "palette entry '{g}' is listed twice"
                )));
            }
        }
        Ok(Self { glyphs })
    }

    /// All glyphs in display order.
    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    /// `true` when `glyph` is offered by this palette.
    pub fn contains(&self, glyph: &str) -> bool {
        self.glyphs.iter().any(|g| g == glyph)
    }
}

impl Default for StickerPalette {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.iter().map(|g| (*g).to_owned()).collect(),
        }
    }
}

/// One visible code point, optionally followed by a variation selector.
pub(crate) fn is_single_symbol(s: &str) -> bool {
    let mut visible = s
        .chars()
        .filter(|c| !matches!(c, '\u{FE0E}' | '\u{FE0F}'));
    matches!((visible.next(), visible.next()), (Some(c), None) if !c.is_whitespace() && !c.is_control())
}

#[cfg(test)]
#[path = "../../tests/unit/stickers/palette.rs"]
mod tests;
