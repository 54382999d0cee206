//! Contract for one trainable cascade stage and its hyperparameters.
//!
//! The boosting algorithm lives behind [`StageClassifier`]; the trainer only
//! trains a stage on an assembled [`TrainingSet`], asks it to accept or
//! reject samples, and serializes it.

use crate::cascade::FeatureUsageMap;
use crate::registry::SampleRegistry;
use crate::training::TrainingSet;
use serde::{Deserialize, Serialize};

/// Boosting variant used to fit a stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostType {
    #[serde(rename = "DAB")]
    Discrete,
    #[serde(rename = "RAB")]
    Real,
    #[serde(rename = "LB")]
    Logit,
    #[default]
    #[serde(rename = "GAB")]
    Gentle,
}

/// Hyperparameters handed to every stage and written to the model header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageParams {
    pub boost_type: BoostType,
    /// Minimal hit rate each stage must keep on its positives.
    pub min_hit_rate: f32,
    /// Maximal false-alarm rate each stage may keep on its negatives.
    pub max_false_alarm: f32,
    pub weight_trim_rate: f32,
    /// Depth of the weak trees.
    pub max_depth: usize,
    pub max_weak_count: usize,
}

impl Default for StageParams {
    fn default() -> Self {
        Self {
            boost_type: BoostType::Gentle,
            min_hit_rate: 0.995,
            max_false_alarm: 0.5,
            weight_trim_rate: 0.95,
            max_depth: 1,
            max_weak_count: 100,
        }
    }
}

impl StageParams {
    /// Leaf false-alarm rate at which a cascade of `num_stages` stages is
    /// considered converged: `max_false_alarm^num_stages / max_depth`.
    pub fn required_leaf_false_alarm(&self, num_stages: usize) -> f64 {
        let exponent = i32::try_from(num_stages).unwrap_or(i32::MAX);
        f64::from(self.max_false_alarm).powi(exponent) / self.max_depth.max(1) as f64
    }
}

/// Memory budget (in MB) for precomputed feature values and sorted indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrecalcBuffers {
    pub val_buf_mb: usize,
    pub idx_buf_mb: usize,
}

impl Default for PrecalcBuffers {
    fn default() -> Self {
        Self {
            val_buf_mb: 1024,
            idx_buf_mb: 1024,
        }
    }
}

/// One boosted stage of the cascade.
pub trait StageClassifier<R: SampleRegistry>: Sized {
    /// Stage-type tag written to the model header.
    const STAGE_TYPE: &'static str = "BOOST";

    /// Fit a new stage on `set`. `None` means the stage could not be trained.
    fn train(
        registry: &R,
        set: &TrainingSet,
        params: &StageParams,
        buffers: PrecalcBuffers,
    ) -> Option<Self>;

    /// `true` if the stage accepts (passes on) the sample at `sample_idx`.
    fn evaluate(&self, registry: &R, sample_idx: usize) -> bool;

    /// Flag every global feature index this stage references.
    fn mark_used_features(&self, usage: &mut FeatureUsageMap);

    /// Serialize the stage, addressing features through their compacted
    /// indices.
    fn write(&self, usage: &FeatureUsageMap) -> serde_json::Value;
}
