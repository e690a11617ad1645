//! Multi-photo strip assembly.
//!
//! Sources are decoded in parallel and each completion is counted in a [`DecodeTracker`].
//! Drawing begins only once the count matches the number of photos; anything less is a
//! [`BoothError::CompositeIncomplete`], so an export can never observe a partially drawn strip.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use image::RgbaImage;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::capture::still::{StillImage, encode_png};
use crate::foundation::core::{
    Affine, PixelSize, Rect, Rgba8, premul_over_in_place, unpremultiply_rgba8_in_place,
};
use crate::foundation::error::{BoothError, BoothResult};
use crate::stickers::glyphs::{GlyphRasterizer, TextItem};
use crate::strip::layout::StripLayout;

/// Default export filename.
pub const DEFAULT_EXPORT_FILENAME: &str = "photo-booth-strip.png";

/// Counts decode completions against an expected total.
#[derive(Debug)]
pub struct DecodeTracker {
    expected: usize,
    completed: AtomicUsize,
}

impl DecodeTracker {
    /// Tracker waiting for `expected` decodes.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            completed: AtomicUsize::new(0),
        }
    }

    /// Record one finished decode.
    pub fn mark_decoded(&self) {
        self.completed.fetch_add(1, Ordering::AcqRel);
    }

    /// Decodes finished so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Total decodes required.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// `true` once every source has decoded.
    pub fn is_complete(&self) -> bool {
        self.completed() == self.expected
    }

    /// `Ok` only when complete.
    pub fn ensure_complete(&self) -> BoothResult<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(BoothError::CompositeIncomplete {
                decoded: self.completed(),
                expected: self.expected,
            })
        }
    }
}

/// The finished strip, ready to encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeStrip {
    image: RgbaImage,
    photo_count: usize,
    export_filename: String,
}

impl CompositeStrip {
    /// Composited pixels, straight alpha.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Canvas size.
    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.image.width(),
            height: self.image.height(),
        }
    }

    /// Number of photos drawn.
    pub fn photo_count(&self) -> usize {
        self.photo_count
    }

    /// Filename used by [`CompositeStrip::export`].
    pub fn export_filename(&self) -> &str {
        &self.export_filename
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> BoothResult<Vec<u8>> {
        encode_png(&self.image)
    }

    /// Write the PNG into `dir` under the export filename and return the path.
    pub fn export(&self, dir: &Path) -> BoothResult<PathBuf> {
        let bytes = self.encode_png()?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export dir '{}'", dir.display()))?;
        let path = dir.join(&self.export_filename);
        std::fs::write(&path, bytes)
            .with_context(|| format!("write strip to '{}'", path.display()))?;
        info!(path = %path.display(), photos = self.photo_count, "strip exported");
        Ok(path)
    }
}

/// Draws stills into a vertical strip with a title band.
#[derive(Clone, Debug)]
pub struct StripCompositor {
    layout: StripLayout,
    glyphs: GlyphRasterizer,
    export_filename: String,
}

impl StripCompositor {
    /// Compositor for `layout`; the title is drawn with `glyphs`.
    pub fn new(layout: StripLayout, glyphs: GlyphRasterizer) -> BoothResult<Self> {
        layout.validate()?;
        Ok(Self {
            layout,
            glyphs,
            export_filename: DEFAULT_EXPORT_FILENAME.to_owned(),
        })
    }

    /// Override the export filename.
    pub fn with_export_filename(mut self, name: impl Into<String>) -> Self {
        self.export_filename = name.into();
        self
    }

    /// Strip geometry.
    pub fn layout(&self) -> &StripLayout {
        &self.layout
    }

    /// Decode every photo, then draw them top to bottom in sequence order.
    #[tracing::instrument(skip_all, fields(photos = photos.len()))]
    pub fn compose(&self, photos: &[StillImage]) -> BoothResult<CompositeStrip> {
        let tracker = DecodeTracker::new(photos.len());
        let decoded: Vec<Option<RgbaImage>> = photos
            .par_iter()
            .enumerate()
            .map(|(i, still)| match still.decode() {
                Ok(img) => {
                    tracker.mark_decoded();
                    Some(img)
                }
                Err(err) => {
                    warn!(index = i, error = %err, "strip source failed to decode");
                    None
                }
            })
            .collect();
        tracker.ensure_complete()?;
        let images: Vec<RgbaImage> = decoded.into_iter().flatten().collect();
        self.draw(&images)
    }

    /// Draw already decoded images. Callers must have awaited every decode.
    pub(crate) fn draw(&self, images: &[RgbaImage]) -> BoothResult<CompositeStrip> {
        let size = self.layout.canvas_size(images.len())?;
        let (w, h) = size.as_u16()?;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_color(&mut ctx, self.layout.background);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));

        for (i, img) in images.iter().enumerate() {
            let dst = self.layout.photo_rect(i);
            draw_image(&mut ctx, img, dst)?;
            for (rect, color) in self.layout.decoration_rects(i) {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                set_color(&mut ctx, color);
                ctx.fill_rect(&rect_to_cpu(rect));
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let mut rgba = pixmap.data_as_u8_slice().to_vec();
        let title = TextItem::title(
            self.layout.title.clone(),
            f64::from(self.layout.width) / 2.0,
            self.layout.title_baseline,
            self.layout.title_px,
            self.layout.title_color,
        );
        let layer = self.glyphs.render_layer(size, &[title])?;
        premul_over_in_place(&mut rgba, &layer)?;
        unpremultiply_rgba8_in_place(&mut rgba);

        let image = RgbaImage::from_raw(size.width, size.height, rgba)
            .ok_or_else(|| BoothError::encode("strip buffer does not match canvas size"))?;
        Ok(CompositeStrip {
            image,
            photo_count: images.len(),
            export_filename: self.export_filename.clone(),
        })
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Stretch `img` onto `dst`.
fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    img: &RgbaImage,
    dst: Rect,
) -> BoothResult<()> {
    let (iw, ih) = (f64::from(img.width()), f64::from(img.height()));
    let pixmap = image_to_pixmap(img)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    let transform = Affine::translate((dst.x0, dst.y0))
        * Affine::scale_non_uniform(dst.width() / iw, dst.height() / ih);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
    Ok(())
}

fn image_to_pixmap(img: &RgbaImage) -> BoothResult<vello_cpu::Pixmap> {
    let size = PixelSize::new(img.width(), img.height())?;
    let (w, h) = size.as_u16()?;
    let mut may_have_opacities = false;
    let pixels = img
        .pixels()
        .map(|p| {
            let premul = Rgba8 {
                r: p.0[0],
                g: p.0[1],
                b: p.0[2],
                a: p.0[3],
            }
            .premultiplied();
            may_have_opacities |= premul[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: premul[0],
                g: premul[1],
                b: premul[2],
                a: premul[3],
            }
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/strip/compositor.rs"]
mod tests;
