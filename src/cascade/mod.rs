//! The trained cascade: an append-only chain of stages evaluated with early
//! rejection, plus the helpers that persist it.
//!
//! - [`features`] – compaction of the used feature indices.
//! - [`writer`] – the serialized cascade document.

pub mod features;
pub mod writer;

pub use features::FeatureUsageMap;
pub use writer::{CascadeModel, StageBlock, CASCADE_FILENAME};

use crate::registry::SampleRegistry;
use crate::stage::StageClassifier;

/// Ordered list of trained stages.
#[derive(Clone, Debug)]
pub struct Cascade<S> {
    stages: Vec<S>,
}

impl<S> Default for Cascade<S> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<S> Cascade<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(stages: usize) -> Self {
        Self {
            stages: Vec::with_capacity(stages),
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[S] {
        &self.stages
    }

    /// Append a stage behind all existing ones.
    pub fn push(&mut self, stage: S) {
        self.stages.push(stage);
    }

    /// `true` if every stage accepts the sample. Evaluation stops at the
    /// first rejecting stage; an empty cascade accepts everything.
    pub fn predict<R>(&self, registry: &R, sample_idx: usize) -> bool
    where
        R: SampleRegistry,
        S: StageClassifier<R>,
    {
        self.stages.iter().all(|s| s.evaluate(registry, sample_idx))
    }

    /// Usage map over the registry's feature space, compacted to the
    /// features referenced by at least one stage.
    pub fn used_features<R>(&self, registry: &R) -> FeatureUsageMap
    where
        R: SampleRegistry,
        S: StageClassifier<R>,
    {
        let mut usage = FeatureUsageMap::new(registry.feature_count());
        for stage in &self.stages {
            stage.mark_used_features(&mut usage);
        }
        usage.compact();
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;
    use crate::registry::{SampleLabel, WindowSize};
    use crate::stage::{PrecalcBuffers, StageParams};
    use crate::training::TrainingSet;
    use serde_json::json;
    use std::cell::Cell;

    /// Registry whose samples are plain integers chosen by the test.
    struct ValueRegistry {
        values: Vec<i32>,
    }

    impl SampleRegistry for ValueRegistry {
        fn register_sample(&mut self, _: &GrayImageU8, _: SampleLabel, _: usize) {}
        fn feature_count(&self) -> usize {
            8
        }
        fn window_size(&self) -> WindowSize {
            WindowSize::new(4, 4)
        }
        fn feature_type(&self) -> &str {
            "TEST"
        }
        fn feature_params(&self) -> serde_json::Value {
            json!({})
        }
        fn write_features(&self, usage: &FeatureUsageMap) -> serde_json::Value {
            json!(usage.used_features().map(|(g, _)| g).collect::<Vec<_>>())
        }
    }

    /// Accepts samples whose value is at least `min`; counts evaluations.
    struct MinStage {
        min: i32,
        feature: usize,
        calls: Cell<usize>,
    }

    impl MinStage {
        fn new(min: i32, feature: usize) -> Self {
            Self {
                min,
                feature,
                calls: Cell::new(0),
            }
        }
    }

    impl StageClassifier<ValueRegistry> for MinStage {
        fn train(
            _: &ValueRegistry,
            _: &TrainingSet,
            _: &StageParams,
            _: PrecalcBuffers,
        ) -> Option<Self> {
            None
        }
        fn evaluate(&self, registry: &ValueRegistry, sample_idx: usize) -> bool {
            self.calls.set(self.calls.get() + 1);
            registry.values[sample_idx] >= self.min
        }
        fn mark_used_features(&self, usage: &mut FeatureUsageMap) {
            usage.mark_used(self.feature);
        }
        fn write(&self, usage: &FeatureUsageMap) -> serde_json::Value {
            json!({ "min": self.min, "feature": usage.compacted_index(self.feature) })
        }
    }

    #[test]
    fn empty_cascade_accepts_everything() {
        let registry = ValueRegistry {
            values: vec![i32::MIN, 0, i32::MAX],
        };
        let cascade: Cascade<MinStage> = Cascade::new();
        assert!((0..3).all(|i| cascade.predict(&registry, i)));
    }

    #[test]
    fn first_rejecting_stage_short_circuits() {
        let registry = ValueRegistry {
            values: vec![5, 15, 25],
        };
        let mut cascade = Cascade::new();
        cascade.push(MinStage::new(10, 1));
        cascade.push(MinStage::new(20, 2));
        cascade.push(MinStage::new(0, 3));

        assert!(!cascade.predict(&registry, 0));
        let calls: Vec<_> = cascade.stages().iter().map(|s| s.calls.get()).collect();
        assert_eq!(calls, vec![1, 0, 0]);

        assert!(!cascade.predict(&registry, 1));
        let calls: Vec<_> = cascade.stages().iter().map(|s| s.calls.get()).collect();
        assert_eq!(calls, vec![2, 1, 0]);

        assert!(cascade.predict(&registry, 2));
        let calls: Vec<_> = cascade.stages().iter().map(|s| s.calls.get()).collect();
        assert_eq!(calls, vec![3, 2, 1]);
    }

    #[test]
    fn model_lists_stages_in_order_with_compacted_features() {
        let registry = ValueRegistry { values: vec![] };
        let mut cascade = Cascade::new();
        cascade.push(MinStage::new(3, 6));
        cascade.push(MinStage::new(4, 2));
        cascade.push(MinStage::new(5, 6));

        let model = CascadeModel::from_cascade(&cascade, &registry, &StageParams::default());
        assert_eq!(model.stage_type, "BOOST");
        assert_eq!(model.feature_type, "TEST");
        assert_eq!((model.width, model.height), (4, 4));
        assert_eq!(model.stage_num, 3);
        let ordinals: Vec<_> = model.stages.iter().map(|b| b.stage).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(model.stages[0].classifier, json!({ "min": 3, "feature": 1 }));
        assert_eq!(model.stages[1].classifier, json!({ "min": 4, "feature": 0 }));
        assert_eq!(model.features, json!([2, 6]));

        let doc = serde_json::to_value(&model).unwrap();
        assert_eq!(doc["stageParams"]["maxFalseAlarm"], json!(0.5));
        assert_eq!(doc["stageNum"], json!(3));
    }
}
