//! Contract for the per-sample feature cache consumed by the trainer.
//!
//! The registry owns the feature representation: it turns a window into
//! whatever per-feature values the stage classifiers need and keeps them
//! addressable by sample index. The trainer only ever writes samples through
//! [`SampleRegistry::register_sample`]; stages read them back by index.

use crate::cascade::FeatureUsageMap;
use crate::image::GrayImageU8;
use serde::{Deserialize, Serialize};

/// Fixed training window dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: usize,
    pub height: usize,
}

impl WindowSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of pixels in one window.
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Zero-filled buffer with the window dimensions.
    pub fn blank_window(&self) -> GrayImageU8 {
        GrayImageU8::zeros(self.width, self.height)
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Class label attached to a registered sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleLabel {
    Negative,
    Positive,
}

/// Per-sample feature storage shared by the trainer and the stages.
pub trait SampleRegistry {
    /// Compute and store the features of `window` in slot `index`, replacing
    /// whatever was stored there before.
    fn register_sample(&mut self, window: &GrayImageU8, label: SampleLabel, index: usize);

    /// Size of the global feature index space.
    fn feature_count(&self) -> usize;

    /// Dimensions every registered window must have.
    fn window_size(&self) -> WindowSize;

    /// Feature-type tag written to the model header (e.g. `"LBP"`).
    fn feature_type(&self) -> &str;

    /// Feature-parameter block written to the model header.
    fn feature_params(&self) -> serde_json::Value;

    /// Definitions of the features marked used in `usage`, in compacted order.
    fn write_features(&self, usage: &FeatureUsageMap) -> serde_json::Value;
}
