//! Photobooth is a headless photo booth pipeline.
//!
//! A session runs intro, then capture (repeated until the strip is full), then the finished
//! strip:
//!
//! - Acquire a camera through a [`VideoDevice`] and hold it as a [`LiveStream`]
//! - Pick a filter from the [`FilterRegistry`] and let the [`CaptureEngine`] count down and
//!   rasterize a filtered [`StillImage`]
//! - Optionally decorate it with glyphs in a [`StickerEditor`]
//! - Stack the collected stills with the [`StripCompositor`] and export the PNG
//!
//! [`PhotoBooth`] owns all of the above and is driven by a [`Clock`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod capture;
/// Booth configuration.
pub mod config;
pub(crate) mod filters;
pub(crate) mod media;
pub(crate) mod session;
pub(crate) mod stickers;
pub(crate) mod strip;

pub use crate::foundation::clock::{Clock, ManualClock, SystemClock};
pub use crate::foundation::core::{Affine, PixelSize, Point, Rect, Rgba8, Size, Vec2};
pub use crate::foundation::error::{BoothError, BoothResult};

pub use crate::capture::countdown::{CancelToken, Countdown, CountdownStep};
pub use crate::capture::engine::{CaptureEngine, CaptureSession, CaptureState, TickOutcome};
pub use crate::capture::still::StillImage;
pub use crate::config::BoothConfig;
pub use crate::filters::expr::{FilterChain, FilterOp, parse_filter_expression};
pub use crate::filters::raster::apply_filter;
pub use crate::filters::registry::{FilterRegistry, FilterSpec, default_specs};
pub use crate::media::device::{
    FrameStream, ImageFileDevice, NoDevice, StaticFrameStream, TestPatternDevice, VideoDevice,
};
pub use crate::media::frame::VideoFrame;
pub use crate::media::stream::{LiveStream, MediaSourceAdapter};
pub use crate::session::booth::{BoothEvent, PhotoBooth, run_headless};
pub use crate::session::controller::{Screen, SessionController};
pub use crate::stickers::editor::{EditorGeometry, Sticker, StickerEditor, StickerId};
pub use crate::stickers::glyphs::{GlyphRasterizer, TextAnchor, TextItem};
pub use crate::stickers::palette::{DEFAULT_GLYPHS, StickerPalette};
pub use crate::strip::compositor::{
    CompositeStrip, DEFAULT_EXPORT_FILENAME, DecodeTracker, StripCompositor,
};
pub use crate::strip::layout::{Decoration, StripLayout};
