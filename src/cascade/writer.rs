//! Serialized form of a trained cascade.
//!
//! The document mirrors the classic cascade layout: header values (stage and
//! feature type tags, window size, hyperparameter blocks), the stages in
//! training order, and finally the definitions of the features those stages
//! reference. Stages and features address features through the compacted
//! indices of a [`FeatureUsageMap`], so unused features never reach disk.
use super::{Cascade, FeatureUsageMap};
use crate::image::io::write_json_file;
use crate::registry::SampleRegistry;
use crate::stage::{StageClassifier, StageParams};
use serde::Serialize;
use std::path::Path;

/// File name of the cascade inside an output directory.
pub const CASCADE_FILENAME: &str = "cascade.json";

/// One serialized stage together with its position in the cascade.
#[derive(Clone, Debug, Serialize)]
pub struct StageBlock {
    pub stage: usize,
    pub classifier: serde_json::Value,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeModel {
    pub stage_type: String,
    pub feature_type: String,
    pub height: usize,
    pub width: usize,
    pub stage_params: StageParams,
    pub feature_params: serde_json::Value,
    pub stage_num: usize,
    pub stages: Vec<StageBlock>,
    pub features: serde_json::Value,
}

impl CascadeModel {
    /// Collect the header, stages and used features of `cascade`.
    pub fn from_cascade<R, S>(cascade: &Cascade<S>, registry: &R, params: &StageParams) -> Self
    where
        R: SampleRegistry,
        S: StageClassifier<R>,
    {
        let usage = cascade.used_features(registry);
        log::debug!(
            "writing cascade: {} stages, {}/{} features used",
            cascade.len(),
            usage.used_count(),
            usage.feature_count()
        );
        Self::with_usage(cascade, registry, params, &usage)
    }

    fn with_usage<R, S>(
        cascade: &Cascade<S>,
        registry: &R,
        params: &StageParams,
        usage: &FeatureUsageMap,
    ) -> Self
    where
        R: SampleRegistry,
        S: StageClassifier<R>,
    {
        let window = registry.window_size();
        let stages = cascade
            .stages()
            .iter()
            .enumerate()
            .map(|(stage, s)| StageBlock {
                stage,
                classifier: s.write(usage),
            })
            .collect();
        Self {
            stage_type: S::STAGE_TYPE.to_string(),
            feature_type: registry.feature_type().to_string(),
            height: window.height,
            width: window.width,
            stage_params: params.clone(),
            feature_params: registry.feature_params(),
            stage_num: cascade.len(),
            stages,
            features: registry.write_features(usage),
        }
    }

    /// Write the model as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        write_json_file(path, self)
    }
}
