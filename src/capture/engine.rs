//! Countdown-triggered capture of a filtered still from the live stream.
//!
//! States: `Idle -> CountingDown(n) -> Capturing -> Idle`. One call to
//! [`CaptureEngine::tick`] is one elapsed countdown period; the caller owns the schedule and
//! holds the [`CancelToken`] returned by [`CaptureEngine::countdown_token`] so that a tick
//! scheduled before teardown is skipped.

use tracing::{info, warn};

use crate::capture::countdown::{CancelToken, Countdown, CountdownStep};
use crate::capture::still::StillImage;
use crate::filters::expr::FilterChain;
use crate::filters::raster::apply_filter;
use crate::filters::registry::{FilterRegistry, FilterSpec};
use crate::foundation::error::{BoothError, BoothResult};
use crate::media::frame::VideoFrame;
use crate::media::stream::LiveStream;

/// Transient per-screen capture state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureSession {
    /// Index into the filter registry; always in bounds.
    pub active_filter_index: usize,
    /// `0` when idle, otherwise ticks left before the shot.
    pub countdown_remaining: u32,
}

/// Observable engine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// Waiting for `start_capture`.
    Idle,
    /// Counting down; the value is the number displayed.
    CountingDown(u32),
}

/// What a single tick produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing pending.
    Idle,
    /// Still counting down.
    Counting(u32),
    /// The countdown fired and a still was rasterized.
    Captured(StillImage),
    /// The countdown fired but no frame was available; back to idle.
    Aborted,
}

/// Capture state machine over a filter registry.
#[derive(Debug)]
pub struct CaptureEngine {
    registry: FilterRegistry,
    countdown_seconds: u32,
    session: CaptureSession,
    countdown: Option<Countdown>,
}

impl CaptureEngine {
    /// Engine with the first filter active.
    pub fn new(registry: FilterRegistry, countdown_seconds: u32) -> BoothResult<Self> {
        if countdown_seconds == 0 {
            return Err(BoothError::validation("countdown_seconds must be >= 1"));
        }
        Ok(Self {
            registry,
            countdown_seconds,
            session: CaptureSession::default(),
            countdown: None,
        })
    }

    /// Filter catalog backing preview and capture.
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Snapshot of the per-screen state.
    pub fn session(&self) -> CaptureSession {
        self.session
    }

    /// Current state derived from the countdown.
    pub fn state(&self) -> CaptureState {
        match self.session.countdown_remaining {
            0 => CaptureState::Idle,
            n => CaptureState::CountingDown(n),
        }
    }

    /// Make filter `index` active for both preview and capture.
    pub fn select_filter(&mut self, index: usize) -> BoothResult<()> {
        self.registry.get(index)?;
        self.session.active_filter_index = index;
        Ok(())
    }

    /// The selected filter.
    pub fn active_filter(&self) -> BoothResult<&FilterSpec> {
        self.registry.get(self.session.active_filter_index)
    }

    /// Expression the live preview must render with.
    pub fn preview_expression(&self) -> &str {
        self.active_chain()
            .map(FilterChain::source)
            .unwrap_or("none")
    }

    /// Begin a countdown. Ignored (returns `false`) while one is already running.
    pub fn start_capture(&mut self) -> bool {
        if self.countdown.is_some() {
            return false;
        }
        let countdown = Countdown::start(self.countdown_seconds);
        self.session.countdown_remaining = countdown.remaining();
        self.countdown = Some(countdown);
        info!(seconds = self.countdown_seconds, "capture countdown started");
        true
    }

    /// Token of the running countdown, if any.
    pub fn countdown_token(&self) -> Option<CancelToken> {
        self.countdown.as_ref().map(Countdown::token)
    }

    /// Advance one countdown period; on the last tick rasterize the current frame.
    pub fn tick(&mut self, stream: Option<&mut LiveStream>) -> TickOutcome {
        let Some(countdown) = self.countdown.as_mut() else {
            return TickOutcome::Idle;
        };
        match countdown.tick() {
            CountdownStep::Remaining(n) => {
                self.session.countdown_remaining = n;
                TickOutcome::Counting(n)
            }
            CountdownStep::Cancelled => {
                self.reset_countdown();
                TickOutcome::Idle
            }
            CountdownStep::Fire => {
                self.reset_countdown();
                let frame = stream.and_then(|s| s.latest_frame());
                match self.capture_frame(frame) {
                    Ok(still) => TickOutcome::Captured(still),
                    Err(err) => {
                        warn!(error = %err, "capture aborted");
                        TickOutcome::Aborted
                    }
                }
            }
        }
    }

    /// Rasterize `frame` with the active filter at native resolution.
    pub fn capture_frame(&self, frame: Option<VideoFrame>) -> BoothResult<StillImage> {
        let frame = frame.ok_or_else(|| BoothError::capture_aborted("no live frame available"))?;
        let chain = self.active_chain()?;
        rasterize(&frame, chain)
    }

    /// Cancel any pending countdown; used when the capture screen goes away.
    pub fn teardown(&mut self) {
        if let Some(mut countdown) = self.countdown.take() {
            countdown.cancel();
            info!("capture countdown cancelled");
        }
        self.session.countdown_remaining = 0;
    }

    fn active_chain(&self) -> BoothResult<&FilterChain> {
        self.registry.chain(self.session.active_filter_index)
    }

    fn reset_countdown(&mut self) {
        self.countdown = None;
        self.session.countdown_remaining = 0;
    }
}

#[tracing::instrument(skip_all, fields(filter = chain.source(), width = frame.size().width, height = frame.size().height))]
fn rasterize(frame: &VideoFrame, chain: &FilterChain) -> BoothResult<StillImage> {
    let mut img = frame.to_image()?;
    apply_filter(chain, &mut img)?;
    StillImage::encode(&img, chain.source())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/engine.rs"]
mod tests;
