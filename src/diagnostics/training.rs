use super::TimingBreakdown;
use crate::training::{BuildError, BuildOutcome};
use serde::Serialize;

/// Why the stage loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StopReason {
    /// All requested stages were trained.
    StageCountReached,
    /// The measured false-alarm rate already met the required leaf rate.
    Converged {
        acceptance_ratio: f64,
        required: f64,
    },
    /// The training set for the next stage could not be filled.
    TrainingSetUnfilled { error: BuildError },
    /// The stage classifier failed to train.
    StageTrainingFailed { stage: usize },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::StageCountReached => write!(f, "requested stage count reached"),
            StopReason::Converged {
                acceptance_ratio,
                required,
            } => write!(
                f,
                "required leaf false alarm rate achieved ({acceptance_ratio:.6} <= {required:.6})"
            ),
            StopReason::TrainingSetUnfilled { error } => {
                write!(f, "training set could not be filled: {error}")
            }
            StopReason::StageTrainingFailed { stage } => {
                write!(f, "stage {stage} could not be trained")
            }
        }
    }
}

/// Per-stage record of one iteration of the stage loop.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    pub index: usize,
    pub pos_count: usize,
    pub pos_consumed: u64,
    pub neg_count: usize,
    pub neg_target: usize,
    pub neg_consumed: u64,
    pub acceptance_ratio: f64,
    /// Whether a stage was appended in this iteration.
    pub trained: bool,
    pub build_ms: f64,
    pub train_ms: f64,
}

impl StageReport {
    pub fn from_build(index: usize, outcome: &BuildOutcome, build_ms: f64) -> Self {
        Self {
            index,
            pos_count: outcome.set.pos_count,
            pos_consumed: outcome.pos_consumed,
            neg_count: outcome.set.neg_count,
            neg_target: outcome.neg_target,
            neg_consumed: outcome.neg_consumed,
            acceptance_ratio: outcome.acceptance_ratio,
            trained: false,
            build_ms,
            train_ms: 0.0,
        }
    }
}

/// Summary of a training run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    pub stages_trained: usize,
    pub required_leaf_false_alarm: f64,
    pub stop_reason: StopReason,
    pub stages: Vec<StageReport>,
    pub timing: TimingBreakdown,
}
