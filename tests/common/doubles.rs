//! Minimal implementations of the registry and stage contracts.
use cascade_trainer::image::{GrayImageU8, ImageView};
use cascade_trainer::prelude::*;
use serde_json::json;
use std::cell::Cell;

pub const FEATURE_NAMES: [&str; 5] = ["mean", "top-left", "top-right", "bottom-left", "bottom-right"];

/// Registry storing the window mean and the four quadrant means.
pub struct MeanRegistry {
    window: WindowSize,
    values: Vec<[f32; 5]>,
    labels: Vec<Option<SampleLabel>>,
    pub registered: usize,
}

impl MeanRegistry {
    pub fn new(window: WindowSize) -> Self {
        Self {
            window,
            values: Vec::new(),
            labels: Vec::new(),
            registered: 0,
        }
    }

    pub fn value(&self, sample_idx: usize, feature: usize) -> f32 {
        self.values[sample_idx][feature]
    }

    pub fn label(&self, sample_idx: usize) -> Option<SampleLabel> {
        self.labels.get(sample_idx).copied().flatten()
    }
}

fn mean_of(window: &GrayImageU8, x0: usize, y0: usize, w: usize, h: usize) -> f32 {
    let mut sum = 0u64;
    for row in window.rows().skip(y0).take(h) {
        sum += row[x0..x0 + w].iter().map(|&v| u64::from(v)).sum::<u64>();
    }
    sum as f32 / (w * h) as f32
}

impl SampleRegistry for MeanRegistry {
    fn register_sample(&mut self, window: &GrayImageU8, label: SampleLabel, index: usize) {
        assert_eq!(window.dimensions(), (self.window.width, self.window.height));
        if self.values.len() <= index {
            self.values.resize(index + 1, [0.0; 5]);
            self.labels.resize(index + 1, None);
        }
        let (w, h) = (self.window.width, self.window.height);
        let (hw, hh) = (w / 2, h / 2);
        self.values[index] = [
            mean_of(window, 0, 0, w, h),
            mean_of(window, 0, 0, hw, hh),
            mean_of(window, hw, 0, w - hw, hh),
            mean_of(window, 0, hh, hw, h - hh),
            mean_of(window, hw, hh, w - hw, h - hh),
        ];
        self.labels[index] = Some(label);
        self.registered += 1;
    }

    fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }

    fn window_size(&self) -> WindowSize {
        self.window
    }

    fn feature_type(&self) -> &str {
        "MEAN"
    }

    fn feature_params(&self) -> serde_json::Value {
        json!({ "quadrants": 4 })
    }

    fn write_features(&self, usage: &FeatureUsageMap) -> serde_json::Value {
        json!(usage
            .used_features()
            .map(|(global, _)| FEATURE_NAMES[global])
            .collect::<Vec<_>>())
    }
}

/// Single-feature threshold stage: accepts samples whose feature value is at
/// least the smallest value seen on a positive.
#[derive(Debug)]
pub struct ThresholdStage {
    pub feature: usize,
    pub threshold: f32,
    pub evaluations: Cell<usize>,
}

impl ThresholdStage {
    pub fn new(feature: usize, threshold: f32) -> Self {
        Self {
            feature,
            threshold,
            evaluations: Cell::new(0),
        }
    }
}

impl StageClassifier<MeanRegistry> for ThresholdStage {
    fn train(
        registry: &MeanRegistry,
        set: &TrainingSet,
        params: &StageParams,
        _: PrecalcBuffers,
    ) -> Option<Self> {
        if set.pos_count == 0 || set.neg_count == 0 {
            return None;
        }
        let mut best: Option<(f32, usize, f32)> = None;
        for feature in 0..registry.feature_count() {
            let threshold = set
                .positives()
                .map(|i| registry.value(i, feature))
                .fold(f32::INFINITY, f32::min);
            let false_alarms = set
                .negatives()
                .filter(|&i| registry.value(i, feature) >= threshold)
                .count();
            let rate = false_alarms as f32 / set.neg_count as f32;
            if best.map_or(true, |(r, _, _)| rate < r) {
                best = Some((rate, feature, threshold));
            }
        }
        let (rate, feature, threshold) = best?;
        (rate <= params.max_false_alarm).then(|| ThresholdStage::new(feature, threshold))
    }

    fn evaluate(&self, registry: &MeanRegistry, sample_idx: usize) -> bool {
        self.evaluations.set(self.evaluations.get() + 1);
        registry.value(sample_idx, self.feature) >= self.threshold
    }

    fn mark_used_features(&self, usage: &mut FeatureUsageMap) {
        usage.mark_used(self.feature);
    }

    fn write(&self, usage: &FeatureUsageMap) -> serde_json::Value {
        json!({
            "feature": usage.compacted_index(self.feature),
            "threshold": self.threshold,
        })
    }
}

/// Stage that always trains and accepts every sample.
pub struct PassThroughStage;

impl StageClassifier<MeanRegistry> for PassThroughStage {
    fn train(_: &MeanRegistry, _: &TrainingSet, _: &StageParams, _: PrecalcBuffers) -> Option<Self> {
        Some(PassThroughStage)
    }

    fn evaluate(&self, _: &MeanRegistry, _: usize) -> bool {
        true
    }

    fn mark_used_features(&self, _: &mut FeatureUsageMap) {}

    fn write(&self, _: &FeatureUsageMap) -> serde_json::Value {
        json!({})
    }
}

/// Stage whose training always fails.
pub struct UntrainableStage;

impl StageClassifier<MeanRegistry> for UntrainableStage {
    fn train(_: &MeanRegistry, _: &TrainingSet, _: &StageParams, _: PrecalcBuffers) -> Option<Self> {
        None
    }

    fn evaluate(&self, _: &MeanRegistry, _: usize) -> bool {
        true
    }

    fn mark_used_features(&self, _: &mut FeatureUsageMap) {}

    fn write(&self, _: &FeatureUsageMap) -> serde_json::Value {
        json!(null)
    }
}
