//! Training of multi-stage rejection cascades with hard-negative mining.
//!
//! A cascade is an ordered chain of boosted stages; a window is accepted
//! only if every stage accepts it. Training proceeds one stage at a time:
//! the positives and the background windows that the cascade trained so far
//! still accepts form the training set of the next stage. Background windows
//! come from an endless, deterministic multiscale scan over a pool of
//! background images, so later stages see progressively harder negatives.
//!
//! The boosting algorithm and the feature representation are supplied by
//! the caller through [`StageClassifier`] and [`SampleRegistry`].

// Public modules (stable-ish surface)
pub mod cascade;
pub mod config;
pub mod diagnostics;
pub mod image;
pub mod registry;
pub mod stage;
pub mod training;
pub mod window_source;

// --- High-level re-exports -------------------------------------------------

pub use crate::cascade::{Cascade, CascadeModel, FeatureUsageMap};
pub use crate::diagnostics::{StageReport, StopReason, TrainingReport};
pub use crate::registry::{SampleLabel, SampleRegistry, WindowSize};
pub use crate::stage::{PrecalcBuffers, StageClassifier, StageParams};
pub use crate::training::{CascadeTrainer, TrainError, TrainingParams, TrainingSet};
pub use crate::window_source::{ScanOptions, WindowSource, WindowSourceError};

// --- Prelude ---------------------------------------------------------------

/// Items needed to implement the stage and registry contracts and run a
/// training loop.
pub mod prelude {
    pub use crate::image::GrayImageU8;
    pub use crate::{
        CascadeTrainer, FeatureUsageMap, PrecalcBuffers, SampleLabel, SampleRegistry,
        StageClassifier, StageParams, TrainingParams, TrainingSet, WindowSize, WindowSource,
    };
}
