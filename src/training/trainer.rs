//! The stage loop.
//!
//! Each iteration rebuilds the training set against the cascade trained so
//! far, stops once the measured false-alarm rate reaches the required leaf
//! rate, and otherwise fits and appends one more stage. Any stop after at
//! least one stage is a successful run; only an empty cascade is a failure.
use super::{TrainingParams, TrainingSetBuilder};
use crate::cascade::{Cascade, CascadeModel, CASCADE_FILENAME};
use crate::diagnostics::timing::millis;
use crate::diagnostics::{format_elapsed, StageReport, StopReason, TimingBreakdown, TrainingReport};
use crate::registry::SampleRegistry;
use crate::stage::StageClassifier;
use crate::window_source::WindowSource;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Failures of a training run.
#[derive(Clone, Debug, PartialEq)]
pub enum TrainError {
    /// Parameters or inputs that cannot start a run.
    InvalidParams(String),
    /// Training ended without a single stage.
    NoStagesTrained { reason: StopReason },
    /// The model could not be written.
    Write(String),
}

impl std::fmt::Display for TrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainError::InvalidParams(msg) => write!(f, "invalid training parameters: {msg}"),
            TrainError::NoStagesTrained { reason } => write!(
                f,
                "cascade classifier can't be trained ({reason}); check the training parameters"
            ),
            TrainError::Write(msg) => write!(f, "failed to write cascade: {msg}"),
        }
    }
}

impl std::error::Error for TrainError {}

/// Owns the registry, the window source and the growing cascade for the
/// duration of a run.
pub struct CascadeTrainer<R, S> {
    params: TrainingParams,
    registry: R,
    source: WindowSource,
    cascade: Cascade<S>,
}

impl<R, S> CascadeTrainer<R, S>
where
    R: SampleRegistry,
    S: StageClassifier<R>,
{
    pub fn new(params: TrainingParams, registry: R, source: WindowSource) -> Result<Self, TrainError> {
        params.validate().map_err(TrainError::InvalidParams)?;
        if registry.window_size() != source.window_size() {
            return Err(TrainError::InvalidParams(format!(
                "registry window {} differs from source window {}",
                registry.window_size(),
                source.window_size()
            )));
        }
        let cascade = Cascade::with_capacity(params.num_stages);
        Ok(Self {
            params,
            registry,
            source,
            cascade,
        })
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    pub fn cascade(&self) -> &Cascade<S> {
        &self.cascade
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Run the stage loop until `num_stages` stages exist or an earlier stop
    /// condition fires. Stages already in the cascade count toward the limit.
    pub fn train(&mut self) -> Result<TrainingReport, TrainError> {
        let run_start = Instant::now();
        let required = self.params.required_leaf_false_alarm();
        let builder = TrainingSetBuilder::new(&self.params);
        let mut timing = TimingBreakdown::default();
        let mut stages = Vec::new();
        let mut stop_reason = StopReason::StageCountReached;

        for index in self.cascade.len()..self.params.num_stages {
            info!("===== TRAINING {index}-stage =====");

            let build_start = Instant::now();
            let built = builder.build(&mut self.source, &mut self.registry, &self.cascade);
            let build_ms = millis(build_start.elapsed());
            timing.push(format!("stage {index} build"), build_ms);
            let outcome = match built {
                Ok(outcome) => outcome,
                Err(error) => {
                    info!("Train dataset for temp stage can not be filled ({error}). Branch training terminated.");
                    stop_reason = StopReason::TrainingSetUnfilled { error };
                    break;
                }
            };
            let mut report = StageReport::from_build(index, &outcome, build_ms);

            if outcome.acceptance_ratio <= required {
                info!("Required leaf false alarm rate achieved. Branch training terminated.");
                stop_reason = StopReason::Converged {
                    acceptance_ratio: outcome.acceptance_ratio,
                    required,
                };
                stages.push(report);
                break;
            }

            let train_start = Instant::now();
            let trained = S::train(&self.registry, &outcome.set, &self.params.stage, self.params.precalc);
            report.train_ms = millis(train_start.elapsed());
            timing.push(format!("stage {index} train"), report.train_ms);

            let Some(stage) = trained else {
                info!("Stage {index} could not be trained. Branch training terminated.");
                stop_reason = StopReason::StageTrainingFailed { stage: index };
                stages.push(report);
                break;
            };
            self.cascade.push(stage);
            report.trained = true;
            stages.push(report);

            info!(
                "Training until now has taken {}.",
                format_elapsed(run_start.elapsed())
            );
        }

        timing.total_ms = millis(run_start.elapsed());
        if self.cascade.is_empty() {
            return Err(TrainError::NoStagesTrained {
                reason: stop_reason,
            });
        }
        info!(
            "trained {} stages; stopped: {stop_reason}",
            self.cascade.len()
        );
        Ok(TrainingReport {
            stages_trained: self.cascade.len(),
            required_leaf_false_alarm: required,
            stop_reason,
            stages,
            timing,
        })
    }

    /// Serializable model of the current cascade.
    pub fn model(&self) -> CascadeModel {
        CascadeModel::from_cascade(&self.cascade, &self.registry, &self.params.stage)
    }

    /// Write the current cascade to `path`.
    pub fn save(&self, path: &Path) -> Result<(), TrainError> {
        debug!("saving cascade to {}", path.display());
        self.model().save(path).map_err(TrainError::Write)
    }

    /// Train and, if at least one stage was produced, write
    /// `<dir>/cascade.json`. A failed run writes nothing.
    pub fn train_to_dir(&mut self, dir: &Path) -> Result<TrainingReport, TrainError> {
        let report = self.train()?;
        self.save(&dir.join(CASCADE_FILENAME))?;
        Ok(report)
    }
}
