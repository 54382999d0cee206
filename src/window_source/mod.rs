//! Sources of training windows.
//!
//! - [`NegativeScanner`] – endless, deterministic multiscale scan over the
//!   background pool, driven by an explicit [`ScanState`].
//! - [`PositiveFeed`] – sequential, non-wrapping feed over pre-cropped
//!   positives.
//! - [`WindowSource`] – both of the above behind one `restart`, which the
//!   training-set builder calls once per stage.
//!
//! Destination buffers are caller-owned and must already have the window
//! dimensions; anything else is a programming error and panics.

mod negative;
mod options;
mod positive;

pub use negative::{NegativeScanner, ScanState};
pub use options::ScanOptions;
pub use positive::PositiveFeed;

use crate::image::GrayImageU8;
use crate::registry::WindowSize;

/// Reasons a window source cannot supply a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowSourceError {
    /// Every positive has already been handed out since the last restart.
    PositivePoolExhausted { available: usize },
    /// No background images were supplied.
    EmptyNegativePool,
    /// A supplied positive does not have the window dimensions.
    PositiveSizeMismatch {
        index: usize,
        width: usize,
        height: usize,
        expected: WindowSize,
    },
    /// A supplied background has zero width or height.
    EmptyBackgroundImage { index: usize },
}

impl std::fmt::Display for WindowSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowSourceError::PositivePoolExhausted { available } => {
                write!(f, "positive pool exhausted ({available} images available)")
            }
            WindowSourceError::EmptyNegativePool => write!(f, "negative pool is empty"),
            WindowSourceError::PositiveSizeMismatch {
                index,
                width,
                height,
                expected,
            } => write!(
                f,
                "positive #{index} is {width}x{height}, expected {expected}"
            ),
            WindowSourceError::EmptyBackgroundImage { index } => {
                write!(f, "background #{index} has no pixels")
            }
        }
    }
}

impl std::error::Error for WindowSourceError {}

/// Panics unless `dst` has exactly the window dimensions.
pub(crate) fn check_window_buffer(dst: &GrayImageU8, window: WindowSize) {
    assert!(
        dst.width() == window.width && dst.height() == window.height,
        "invalid window buffer: got {}x{}, expected {window}",
        dst.width(),
        dst.height()
    );
}

/// Positive feed and negative scan sharing one window size.
#[derive(Clone, Debug)]
pub struct WindowSource {
    window: WindowSize,
    positives: PositiveFeed,
    negatives: NegativeScanner,
}

impl WindowSource {
    pub fn new(
        positives: Vec<GrayImageU8>,
        negatives: Vec<GrayImageU8>,
        window: WindowSize,
        options: ScanOptions,
    ) -> Result<Self, WindowSourceError> {
        Ok(Self {
            window,
            positives: PositiveFeed::new(positives, window)?,
            negatives: NegativeScanner::new(negatives, window, options)?,
        })
    }

    pub fn window_size(&self) -> WindowSize {
        self.window
    }

    /// Rewind the positive feed and reset the negative scan to its initial
    /// state.
    pub fn restart(&mut self) {
        self.positives.restart();
        self.negatives.restart();
    }

    pub fn next_positive(&mut self, dst: &mut GrayImageU8) -> Result<(), WindowSourceError> {
        self.positives.next_window(dst)
    }

    pub fn next_negative(&mut self, dst: &mut GrayImageU8) -> Result<(), WindowSourceError> {
        self.negatives.next_window(dst)
    }

    pub fn positive_count(&self) -> usize {
        self.positives.len()
    }

    pub fn negative_pool_len(&self) -> usize {
        self.negatives.pool_len()
    }

    pub fn scan_state(&self) -> &ScanState {
        self.negatives.state()
    }
}
