//! Headless booth: one state struct driving the whole capture-and-composite pipeline.
//!
//! Scheduling is cooperative. The booth keeps at most two deadlines (the next countdown tick
//! and the strip transition) against its [`Clock`]; [`PhotoBooth::poll`] handles whatever is
//! due and [`PhotoBooth::wait_next`] sleeps until the earliest deadline first.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::capture::countdown::CancelToken;
use crate::capture::engine::{CaptureEngine, TickOutcome};
use crate::capture::still::StillImage;
use crate::config::BoothConfig;
use crate::foundation::clock::Clock;
use crate::foundation::error::{BoothError, BoothResult};
use crate::media::device::VideoDevice;
use crate::media::stream::{LiveStream, MediaSourceAdapter};
use crate::session::controller::{Screen, SessionController};
use crate::stickers::editor::StickerEditor;
use crate::stickers::glyphs::GlyphRasterizer;
use crate::stickers::palette::StickerPalette;
use crate::strip::compositor::{CompositeStrip, StripCompositor};

/// Something observable that happened during [`PhotoBooth::poll`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoothEvent {
    /// Countdown advanced; ticks remaining.
    Countdown(u32),
    /// A still was captured and is open in the sticker editor.
    EditingStickers,
    /// A still joined the collection; collection size.
    PhotoAdded(usize),
    /// The countdown fired without a frame.
    CaptureAborted,
    /// The session moved to another screen.
    ScreenChanged(Screen),
}

#[derive(Debug)]
struct PendingTick {
    due: Duration,
    token: CancelToken,
}

/// The booth session state.
#[derive(Debug)]
pub struct PhotoBooth<C: Clock> {
    config: BoothConfig,
    clock: C,
    palette: StickerPalette,
    glyphs: GlyphRasterizer,
    engine: CaptureEngine,
    controller: SessionController,
    compositor: StripCompositor,
    stream: Option<LiveStream>,
    editor: Option<StickerEditor>,
    pending_tick: Option<PendingTick>,
}

impl<C: Clock> PhotoBooth<C> {
    /// Validate `config` and build a booth on the intro screen.
    pub fn new(config: BoothConfig, clock: C, glyphs: GlyphRasterizer) -> BoothResult<Self> {
        config.validate()?;
        let palette = config.palette()?;
        let engine = CaptureEngine::new(config.filter_registry()?, config.countdown_seconds)?;
        let controller =
            SessionController::new(config.target_photos, config.transition_delay())?;
        let compositor = StripCompositor::new(config.strip.clone(), glyphs.clone())?
            .with_export_filename(config.export_filename.clone());
        Ok(Self {
            config,
            clock,
            palette,
            glyphs,
            engine,
            controller,
            compositor,
            stream: None,
            editor: None,
            pending_tick: None,
        })
    }

    /// Validated configuration.
    pub fn config(&self) -> &BoothConfig {
        &self.config
    }

    /// Time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    /// Photos collected so far, in capture order.
    pub fn photos(&self) -> &[StillImage] {
        self.controller.photos()
    }

    /// Capture engine, for filter and countdown state.
    pub fn engine(&self) -> &CaptureEngine {
        &self.engine
    }

    /// The open sticker editor, if a still is being decorated.
    pub fn editor(&self) -> Option<&StickerEditor> {
        self.editor.as_ref()
    }

    /// Mutable access to the open sticker editor.
    pub fn editor_mut(&mut self) -> Option<&mut StickerEditor> {
        self.editor.as_mut()
    }

    /// `true` while a live stream is held.
    pub fn has_camera(&self) -> bool {
        self.stream.is_some()
    }

    /// Leave the intro screen.
    pub fn start(&mut self) -> Option<BoothEvent> {
        self.controller
            .start()
            .then_some(BoothEvent::ScreenChanged(Screen::Capture))
    }

    /// Acquire the camera for the capture screen.
    ///
    /// On failure the error is returned and the feed stays blank; the booth keeps working and a
    /// later capture aborts for lack of frames.
    pub fn open_camera(&mut self, device: &mut dyn VideoDevice) -> BoothResult<()> {
        self.close_camera();
        self.stream = Some(MediaSourceAdapter::acquire(device)?);
        Ok(())
    }

    /// Tear down the capture screen: cancel the countdown and release the camera.
    pub fn close_camera(&mut self) {
        self.cancel_countdown();
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
    }

    /// Select filter `index` for preview and capture.
    pub fn select_filter(&mut self, index: usize) -> BoothResult<()> {
        self.engine.select_filter(index)
    }

    /// Expression the preview is rendered with.
    pub fn preview_expression(&self) -> &str {
        self.engine.preview_expression()
    }

    /// Press the shutter. Ignored off the capture screen or while a countdown runs.
    pub fn trigger_capture(&mut self) -> bool {
        if self.screen() != Screen::Capture || self.controller.is_full() {
            return false;
        }
        if !self.engine.start_capture() {
            return false;
        }
        if let Some(token) = self.engine.countdown_token() {
            self.pending_tick = Some(PendingTick {
                due: self.clock.now() + self.config.tick_period(),
                token,
            });
        }
        true
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        let tick = self.pending_tick.as_ref().map(|t| t.due);
        match (tick, self.controller.transition_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Handle everything that is due now.
    pub fn poll(&mut self) -> BoothResult<Vec<BoothEvent>> {
        let now = self.clock.now();
        let mut events = Vec::new();

        if let Some(tick) = self.pending_tick.take_if(|t| t.due <= now) {
            if !tick.token.is_cancelled() {
                self.run_tick(now, &mut events)?;
            }
        }

        if let Some(screen) = self.controller.poll(now) {
            self.close_camera();
            self.editor = None;
            events.push(BoothEvent::ScreenChanged(screen));
        }
        Ok(events)
    }

    /// Sleep until the next deadline, then poll. Returns no events when nothing is pending.
    pub fn wait_next(&mut self) -> BoothResult<Vec<BoothEvent>> {
        let Some(due) = self.next_deadline() else {
            return Ok(Vec::new());
        };
        let now = self.clock.now();
        if due > now {
            self.clock.sleep(due - now);
        }
        self.poll()
    }

    /// Bake the editor's stickers into its still and add it to the collection.
    pub fn finish_stickers(&mut self) -> BoothResult<Option<BoothEvent>> {
        let Some(editor) = self.editor.take() else {
            return Ok(None);
        };
        let still = editor.finalize(&self.glyphs)?;
        Ok(self.add_photo(still))
    }

    /// Discard the still in the editor.
    pub fn discard_stickers(&mut self) {
        if self.editor.take().is_some() {
            self.controller.cancel_stickers();
        }
    }

    /// Compose the strip from the collected photos.
    pub fn compose_strip(&self) -> BoothResult<CompositeStrip> {
        self.compositor.compose(self.controller.photos())
    }

    /// Compose and write the strip into `dir`.
    pub fn export(&self, dir: &Path) -> BoothResult<PathBuf> {
        self.compose_strip()?.export(dir)
    }

    /// Clear the collection and go back to the camera. The camera must be reopened by the caller.
    pub fn retake(&mut self) -> BoothEvent {
        self.cancel_countdown();
        self.editor = None;
        self.controller.on_retake();
        BoothEvent::ScreenChanged(Screen::Capture)
    }

    fn cancel_countdown(&mut self) {
        self.engine.teardown();
        self.pending_tick = None;
    }

    fn run_tick(&mut self, now: Duration, events: &mut Vec<BoothEvent>) -> BoothResult<()> {
        match self.engine.tick(self.stream.as_mut()) {
            TickOutcome::Idle => {}
            TickOutcome::Counting(n) => {
                if let Some(token) = self.engine.countdown_token() {
                    self.pending_tick = Some(PendingTick {
                        due: now + self.config.tick_period(),
                        token,
                    });
                }
                events.push(BoothEvent::Countdown(n));
            }
            TickOutcome::Aborted => events.push(BoothEvent::CaptureAborted),
            TickOutcome::Captured(still) => {
                if self.config.stickers_enabled {
                    let index = self.controller.photos().len();
                    if !self.controller.begin_stickers() {
                        warn!("sticker editor unavailable; still dropped");
                        return Ok(());
                    }
                    self.editor = Some(StickerEditor::new(
                        still,
                        index,
                        self.palette.clone(),
                        self.config.editor_geometry(),
                    ));
                    events.push(BoothEvent::EditingStickers);
                } else if let Some(ev) = self.add_photo(still) {
                    events.push(ev);
                }
            }
        }
        Ok(())
    }

    fn add_photo(&mut self, still: StillImage) -> Option<BoothEvent> {
        let now = self.clock.now();
        self.controller
            .on_photo_captured(still, now)
            .then(|| BoothEvent::PhotoAdded(self.controller.photos().len()))
    }
}

/// Run a complete session without user interaction: `target_photos` captures, each decorated
/// by `decorate` when stickers are enabled, then the strip.
pub fn run_headless<C: Clock>(
    booth: &mut PhotoBooth<C>,
    device: &mut dyn VideoDevice,
    mut decorate: impl FnMut(&mut StickerEditor) -> BoothResult<()>,
) -> BoothResult<CompositeStrip> {
    booth.start();
    booth.open_camera(device)?;
    let target = booth.config().target_photos;
    while booth.screen() != Screen::Strip {
        if booth.next_deadline().is_none() {
            if !booth.trigger_capture() {
                return Err(BoothError::capture_aborted(format!(
                    "booth stalled on {:?} with {} of {target} photos",
                    booth.screen(),
                    booth.photos().len()
                )));
            }
        }
        for event in booth.wait_next()? {
            match event {
                BoothEvent::Countdown(n) => info!(remaining = n, "countdown"),
                BoothEvent::CaptureAborted => {
                    booth.close_camera();
                    return Err(BoothError::capture_aborted("no live frame available"));
                }
                BoothEvent::EditingStickers => {
                    if let Some(editor) = booth.editor_mut() {
                        decorate(editor)?;
                    }
                    booth.finish_stickers()?;
                }
                BoothEvent::PhotoAdded(n) => info!(count = n, target, "photo added"),
                BoothEvent::ScreenChanged(screen) => info!(?screen, "screen changed"),
            }
        }
    }
    booth.compose_strip()
}

#[cfg(test)]
#[path = "../../tests/unit/session/booth.rs"]
mod tests;
