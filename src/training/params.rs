//! Parameters of a cascade training run.

use crate::stage::{PrecalcBuffers, StageParams};
use serde::{Deserialize, Serialize};

/// Counts and limits of a training run plus the hyperparameters handed to
/// every stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainingParams {
    /// Positives requested per stage.
    pub num_pos: usize,
    /// Negatives requested per stage when all `num_pos` positives pass.
    pub num_neg: usize,
    /// Upper bound on the number of stages.
    pub num_stages: usize,
    /// Upper bound on negative windows drawn per stage. `None` scans until
    /// the negative target is met.
    pub max_negative_draws: Option<u64>,
    pub precalc: PrecalcBuffers,
    pub stage: StageParams,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            num_pos: 2000,
            num_neg: 1000,
            num_stages: 20,
            max_negative_draws: None,
            precalc: PrecalcBuffers::default(),
            stage: StageParams::default(),
        }
    }
}

impl TrainingParams {
    /// Check the values a run cannot start without.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_pos == 0 {
            return Err("numPos must be positive".to_string());
        }
        if self.num_stages == 0 {
            return Err("numStages must be positive".to_string());
        }
        let fa = self.stage.max_false_alarm;
        if !(fa > 0.0 && fa <= 1.0) {
            return Err(format!("maxFalseAlarm must lie in (0, 1], got {fa}"));
        }
        if self.stage.max_depth == 0 {
            return Err("maxDepth must be positive".to_string());
        }
        Ok(())
    }

    /// Leaf false-alarm rate at which training stops early.
    pub fn required_leaf_false_alarm(&self) -> f64 {
        self.stage.required_leaf_false_alarm(self.num_stages)
    }

    /// Negatives to collect when only `pos_count` positives passed. Halves
    /// round to even.
    pub fn negative_target(&self, pos_count: usize) -> usize {
        if self.num_pos == 0 {
            return 0;
        }
        (self.num_neg as f64 * pos_count as f64 / self.num_pos as f64).round_ties_even() as usize
    }
}
