//! Text rasterization for sticker glyphs and the strip title.
//!
//! Text is laid out as SVG `<text>` and rendered with `resvg` against a shared font database.
//! With no usable fonts installed the layer stays transparent instead of failing.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::foundation::core::{
    PixelSize, Rgba8, premul_over_in_place, premultiply_rgba8_in_place,
    unpremultiply_rgba8_in_place,
};
use crate::foundation::error::{BoothError, BoothResult};

const EMOJI_FAMILIES: &str =
    "'Noto Color Emoji', 'Apple Color Emoji', 'Segoe UI Emoji', 'Twemoji Mozilla', sans-serif";
const TITLE_FAMILIES: &str = "system-ui, 'DejaVu Sans', Arial, sans-serif";

/// Horizontal alignment of a text run relative to its `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// `x` is the left edge.
    Start,
    /// `x` is the centre.
    Middle,
}

/// One positioned text run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    /// Text content.
    pub text: String,
    /// Anchor x in pixels.
    pub x: f64,
    /// Baseline y in pixels.
    pub baseline: f64,
    /// Font size in pixels.
    pub font_px: f64,
    /// Fill colour.
    pub fill: Rgba8,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Bold weight.
    pub bold: bool,
    families: &'static str,
}

impl TextItem {
    /// A sticker glyph with its left edge at `x`.
    pub fn glyph(text: impl Into<String>, x: f64, baseline: f64, font_px: f64) -> Self {
        Self {
            text: text.into(),
            x,
            baseline,
            font_px,
            fill: Rgba8::opaque(0, 0, 0),
            anchor: TextAnchor::Start,
            bold: false,
            families: EMOJI_FAMILIES,
        }
    }

    /// A bold heading centred on `x`.
    pub fn title(
        text: impl Into<String>,
        x: f64,
        baseline: f64,
        font_px: f64,
        fill: Rgba8,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            baseline,
            font_px,
            fill,
            anchor: TextAnchor::Middle,
            bold: true,
            families: TITLE_FAMILIES,
        }
    }
}

/// Renders [`TextItem`]s into RGBA layers. Cheap to clone; the font database is shared.
#[derive(Clone)]
pub struct GlyphRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl GlyphRasterizer {
    /// Rasterizer over the system fonts.
    pub fn system() -> Self {
        Self::with_font_dirs(&[])
    }

    /// System fonts plus any `.ttf`/`.otf`/`.ttc` files found directly in `dirs`.
    pub fn with_font_dirs(dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        debug!(faces = db.len(), "font database loaded");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Rasterizer with no fonts; every text layer is transparent.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Render `items` into a premultiplied RGBA8 layer of `size`.
    pub fn render_layer(&self, size: PixelSize, items: &[TextItem]) -> BoothResult<Vec<u8>> {
        let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width, size.height)
            .ok_or_else(|| BoothError::validation("failed to allocate text pixmap"))?;
        if items.is_empty() {
            return Ok(pixmap.data().to_vec());
        }

        let doc = svg_document(size, items);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(doc.as_bytes(), &opts).context("parse text layer svg")?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        let data = pixmap.data().to_vec();
        if self.face_count() > 0
            && !has_ink(&data)
            && items.iter().any(|i| !i.text.trim().is_empty())
        {
            warn!(
                items = items.len(),
                faces = self.face_count(),
                "text layer rendered without ink; no installed font covers these glyphs"
            );
        }
        Ok(data)
    }

    /// Draw `items` over a straight-alpha image in place.
    pub fn draw_onto(&self, img: &mut RgbaImage, items: &[TextItem]) -> BoothResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let size = PixelSize::new(img.width(), img.height())?;
        let layer = self.render_layer(size, items)?;
        let buf: &mut [u8] = img;
        premultiply_rgba8_in_place(buf);
        premul_over_in_place(buf, &layer)?;
        unpremultiply_rgba8_in_place(buf);
        Ok(())
    }
}

impl std::fmt::Debug for GlyphRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRasterizer")
            .field("faces", &self.face_count())
            .finish()
    }
}

pub(crate) fn svg_document(size: PixelSize, items: &[TextItem]) -> String {
    let (w, h) = (size.width, size.height);
    let mut doc = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for item in items {
        let anchor = match item.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        };
        let weight = if item.bold { "bold" } else { "normal" };
        let fill = item.fill;
        let _ = write!(
            doc,
            r##"<text x="{x}" y="{y}" font-size="{size}" font-family="{families}" font-weight="{weight}" text-anchor="{anchor}" fill="#{r:02x}{g:02x}{b:02x}" fill-opacity="{opacity}">{text}</text>"##,
            x = item.x,
            y = item.baseline,
            size = item.font_px,
            families = item.families,
            r = fill.r,
            g = fill.g,
            b = fill.b,
            opacity = f32::from(fill.a) / 255.0,
            text = xml_escape(&item.text),
        );
    }
    doc.push_str("</svg>");
    doc
}

fn has_ink(premul: &[u8]) -> bool {
    premul.chunks_exact(4).any(|px| px[3] != 0)
}

// Named families first, then the generic ones, then any face at all. Per-glyph fallback stays
// with usvg's default selector.
fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(name) => Family::Name(name),
                })
                .collect();
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let stretch = match font.stretch() {
                usvg::FontStretch::UltraCondensed => Stretch::UltraCondensed,
                usvg::FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
                usvg::FontStretch::Condensed => Stretch::Condensed,
                usvg::FontStretch::SemiCondensed => Stretch::SemiCondensed,
                usvg::FontStretch::Normal => Stretch::Normal,
                usvg::FontStretch::SemiExpanded => Stretch::SemiExpanded,
                usvg::FontStretch::Expanded => Stretch::Expanded,
                usvg::FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
                usvg::FontStretch::UltraExpanded => Stretch::UltraExpanded,
            };
            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };
            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch,
                style,
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
            let _ = db.load_font_file(&path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stickers/glyphs.rs"]
mod tests;
