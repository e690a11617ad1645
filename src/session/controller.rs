use std::time::Duration;

use tracing::{debug, info};

use crate::capture::still::StillImage;
use crate::foundation::error::{BoothError, BoothResult};

/// Screens of a booth session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Opening animation.
    Intro,
    /// Live camera view with filters and the capture button.
    Capture,
    /// Sticker editor over the still just taken.
    Stickers,
    /// Finished strip with export and retake.
    Strip,
}

/// Screen sequencing and the photo collection.
///
/// Photos are append-only until a retake. Reaching the target schedules exactly one transition
/// to [`Screen::Strip`], fired by [`SessionController::poll`] once its delay has passed.
#[derive(Debug)]
pub struct SessionController {
    screen: Screen,
    photos: Vec<StillImage>,
    target: usize,
    transition_delay: Duration,
    transition_due: Option<Duration>,
}

impl SessionController {
    /// Controller on the intro screen.
    pub fn new(target: usize, transition_delay: Duration) -> BoothResult<Self> {
        if target == 0 {
            return Err(BoothError::validation("target photo count must be >= 1"));
        }
        Ok(Self {
            screen: Screen::Intro,
            photos: Vec::with_capacity(target),
            target,
            transition_delay,
            transition_due: None,
        })
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Collected photos in capture order.
    pub fn photos(&self) -> &[StillImage] {
        &self.photos
    }

    /// Photos per strip.
    pub fn target(&self) -> usize {
        self.target
    }

    /// `true` once the collection holds `target` photos.
    pub fn is_full(&self) -> bool {
        self.photos.len() >= self.target
    }

    /// When the pending strip transition fires, if one is scheduled.
    pub fn transition_due(&self) -> Option<Duration> {
        self.transition_due
    }

    /// Leave the intro. Returns `false` when not on the intro screen.
    pub fn start(&mut self) -> bool {
        if self.screen != Screen::Intro {
            return false;
        }
        self.screen = Screen::Capture;
        true
    }

    /// A still is waiting for stickers.
    pub fn begin_stickers(&mut self) -> bool {
        if self.screen != Screen::Capture || self.is_full() {
            return false;
        }
        self.screen = Screen::Stickers;
        true
    }

    /// Abandon the sticker step without keeping the still.
    pub fn cancel_stickers(&mut self) {
        if self.screen == Screen::Stickers {
            self.screen = Screen::Capture;
        }
    }

    /// Append a finished still at time `now`. Ignored (returns `false`) once the collection is full.
    pub fn on_photo_captured(&mut self, still: StillImage, now: Duration) -> bool {
        if self.is_full() || matches!(self.screen, Screen::Intro | Screen::Strip) {
            debug!(count = self.photos.len(), screen = ?self.screen, "photo ignored");
            return false;
        }
        self.photos.push(still);
        if self.screen == Screen::Stickers {
            self.screen = Screen::Capture;
        }
        info!(count = self.photos.len(), target = self.target, "photo added");
        if self.is_full() {
            self.transition_due = Some(now + self.transition_delay);
        }
        true
    }

    /// Fire the strip transition if it is due. Returns the new screen when it fires.
    pub fn poll(&mut self, now: Duration) -> Option<Screen> {
        let due = self.transition_due?;
        if now < due {
            return None;
        }
        self.transition_due = None;
        self.screen = Screen::Strip;
        info!("showing strip");
        Some(Screen::Strip)
    }

    /// Drop every photo and go back to the camera, cancelling a pending transition.
    pub fn on_retake(&mut self) {
        self.photos.clear();
        self.transition_due = None;
        self.screen = Screen::Capture;
        info!("retake");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
