use tracing::{debug, warn};

use crate::foundation::error::BoothResult;
use crate::media::device::{FrameStream, VideoDevice};
use crate::media::frame::VideoFrame;

/// Acquires live streams from devices and logs failures.
#[derive(Clone, Copy, Debug, Default)]
pub struct MediaSourceAdapter;

impl MediaSourceAdapter {
    /// Open `device`. A failure is logged and surfaced; there is no retry.
    pub fn acquire(device: &mut dyn VideoDevice) -> BoothResult<LiveStream> {
        match device.open() {
            Ok(inner) => {
                debug!(device = device.name(), "media stream acquired");
                Ok(LiveStream {
                    device: device.name().to_owned(),
                    inner: Some(inner),
                })
            }
            Err(err) => {
                warn!(device = device.name(), error = %err, "media unavailable");
                Err(err)
            }
        }
    }
}

/// Exclusive handle on an acquired stream.
///
/// Released exactly once: either by an explicit [`LiveStream::release`] or on drop.
pub struct LiveStream {
    device: String,
    inner: Option<Box<dyn FrameStream>>,
}

impl LiveStream {
    /// Label of the device this stream came from.
    pub fn device_name(&self) -> &str {
        &self.device
    }

    /// Latest frame, or `None` after release.
    pub fn latest_frame(&mut self) -> Option<VideoFrame> {
        self.inner.as_mut().and_then(|s| s.latest_frame())
    }

    /// Stop all tracks. Returns `true` only for the call that actually stopped them.
    pub fn release(&mut self) -> bool {
        match self.inner.take() {
            Some(mut stream) => {
                stream.stop();
                debug!(device = %self.device, "media stream released");
                true
            }
            None => false,
        }
    }

    /// `true` once the stream has been released.
    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }
}

impl std::fmt::Debug for LiveStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveStream")
            .field("device", &self.device)
            .field("released", &self.is_released())
            .finish()
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/stream.rs"]
mod tests;
