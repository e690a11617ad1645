/// Convenience result type used across the booth pipeline.
pub type BoothResult<T> = Result<T, BoothError>;

/// Top-level error taxonomy used by the capture-and-composite pipeline.
///
/// Every variant is non-fatal to the process: callers log it and reset to an idle state.
#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    /// Camera permission denied or no device present.
    #[error("media unavailable: {0}")]
    MediaUnavailable(String),

    /// A selection index fell outside `[0, len)`.
    #[error("index out of range: {index} is not in [0, {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of available entries.
        len: usize,
    },

    /// No live frame was available when the countdown fired.
    #[error("capture aborted: {0}")]
    CaptureAborted(String),

    /// A strip was requested before every source photo finished decoding.
    #[error("composite incomplete: {decoded} of {expected} photos decoded")]
    CompositeIncomplete {
        /// Photos whose decode completed.
        decoded: usize,
        /// Photos in the sequence.
        expected: usize,
    },

    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Raster encode/decode failures.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    /// Build a [`BoothError::MediaUnavailable`] value.
    pub fn media_unavailable(msg: impl Into<String>) -> Self {
        Self::MediaUnavailable(msg.into())
    }

    /// Build a [`BoothError::CaptureAborted`] value.
    pub fn capture_aborted(msg: impl Into<String>) -> Self {
        Self::CaptureAborted(msg.into())
    }

    /// Build a [`BoothError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoothError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BoothError::IndexOutOfRange`] value.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
