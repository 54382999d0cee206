//! Assembly of the labeled sample set for the next stage.
//!
//! Candidates are pulled from the window source one at a time, registered,
//! and kept only if the current partial cascade accepts them. For negatives
//! this is hard-negative mining: the kept windows are exactly the background
//! patches the existing stages still mistake for the target. The share of
//! negatives kept is the cascade's measured false-alarm rate.
use super::TrainingParams;
use crate::cascade::Cascade;
use crate::registry::{SampleLabel, SampleRegistry};
use crate::stage::StageClassifier;
use crate::window_source::WindowSource;
use log::{debug, trace, warn};
use serde::Serialize;
use std::ops::Range;

/// Samples available to the next stage. Registry slots `0..pos_count` hold
/// positives, the following `neg_count` slots hold negatives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSet {
    pub pos_count: usize,
    pub neg_count: usize,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.pos_count + self.neg_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positives(&self) -> Range<usize> {
        0..self.pos_count
    }

    pub fn negatives(&self) -> Range<usize> {
        self.pos_count..self.len()
    }

    /// Label of registry slot `sample_idx`; `None` outside the set.
    pub fn label(&self, sample_idx: usize) -> Option<SampleLabel> {
        if sample_idx < self.pos_count {
            Some(SampleLabel::Positive)
        } else if sample_idx < self.len() {
            Some(SampleLabel::Negative)
        } else {
            None
        }
    }
}

/// Result of a successful build.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutcome {
    pub set: TrainingSet,
    pub pos_consumed: u64,
    pub neg_consumed: u64,
    /// Negatives requested after scaling by the positive yield.
    pub neg_target: usize,
    /// Accepted negatives over consumed negatives, in `[0, 1]`.
    pub acceptance_ratio: f64,
}

/// Reasons a training set cannot be filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BuildError {
    /// No positive passed the current cascade.
    NoPositives { consumed: u64 },
    /// No negative passed the current cascade.
    NoNegatives { consumed: u64 },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::NoPositives { consumed } => {
                write!(f, "no positive passed the cascade ({consumed} consumed)")
            }
            BuildError::NoNegatives { consumed } => {
                write!(f, "no negative passed the cascade ({consumed} consumed)")
            }
        }
    }
}

impl std::error::Error for BuildError {}

#[derive(Clone, Copy, Debug)]
struct Fill {
    accepted: usize,
    consumed: u64,
}

/// Builds per-stage training sets according to [`TrainingParams`].
#[derive(Clone, Copy, Debug)]
pub struct TrainingSetBuilder<'a> {
    params: &'a TrainingParams,
}

impl<'a> TrainingSetBuilder<'a> {
    pub fn new(params: &'a TrainingParams) -> Self {
        Self { params }
    }

    /// Restart `source` and fill `registry` with samples `cascade` accepts.
    pub fn build<R, S>(
        &self,
        source: &mut WindowSource,
        registry: &mut R,
        cascade: &Cascade<S>,
    ) -> Result<BuildOutcome, BuildError>
    where
        R: SampleRegistry,
        S: StageClassifier<R>,
    {
        source.restart();

        let pos = self.fill_passed_samples(
            source,
            registry,
            cascade,
            0,
            self.params.num_pos,
            SampleLabel::Positive,
        );
        if pos.accepted == 0 {
            return Err(BuildError::NoPositives {
                consumed: pos.consumed,
            });
        }
        debug!("POS count : consumed {} : {}", pos.accepted, pos.consumed);

        let neg_target = self.params.negative_target(pos.accepted);
        if pos.accepted < self.params.num_pos {
            warn!(
                "only {} of {} positives passed; negative target scaled to {}",
                pos.accepted, self.params.num_pos, neg_target
            );
        }

        let neg = self.fill_passed_samples(
            source,
            registry,
            cascade,
            pos.accepted,
            neg_target,
            SampleLabel::Negative,
        );
        if neg.accepted == 0 {
            return Err(BuildError::NoNegatives {
                consumed: neg.consumed,
            });
        }

        let acceptance_ratio = if neg.consumed == 0 {
            0.0
        } else {
            neg.accepted as f64 / neg.consumed as f64
        };
        debug!(
            "NEG count : acceptanceRatio {} : {:.6}",
            neg.accepted, acceptance_ratio
        );

        Ok(BuildOutcome {
            set: TrainingSet {
                pos_count: pos.accepted,
                neg_count: neg.accepted,
            },
            pos_consumed: pos.consumed,
            neg_consumed: neg.consumed,
            neg_target,
            acceptance_ratio,
        })
    }

    /// Pull candidates into slots `first..first + count` until `count` of
    /// them pass the cascade or the source runs dry. A rejected candidate's
    /// slot is overwritten by the next one.
    fn fill_passed_samples<R, S>(
        &self,
        source: &mut WindowSource,
        registry: &mut R,
        cascade: &Cascade<S>,
        first: usize,
        count: usize,
        label: SampleLabel,
    ) -> Fill
    where
        R: SampleRegistry,
        S: StageClassifier<R>,
    {
        let mut window = registry.window_size().blank_window();
        let draw_limit = match label {
            SampleLabel::Positive => None,
            SampleLabel::Negative => self.params.max_negative_draws,
        };
        let mut fill = Fill {
            accepted: 0,
            consumed: 0,
        };

        while fill.accepted < count {
            if draw_limit.is_some_and(|limit| fill.consumed >= limit) {
                warn!(
                    "negative search stopped after {} draws with {} of {} accepted",
                    fill.consumed, fill.accepted, count
                );
                break;
            }
            let pulled = match label {
                SampleLabel::Positive => source.next_positive(&mut window),
                SampleLabel::Negative => source.next_negative(&mut window),
            };
            if let Err(err) = pulled {
                debug!("{label:?} source stopped after {} draws: {err}", fill.consumed);
                break;
            }
            fill.consumed += 1;

            let slot = first + fill.accepted;
            registry.register_sample(&window, label, slot);
            if cascade.predict(&*registry, slot) {
                fill.accepted += 1;
                trace!("{label:?} current samples: {}", fill.accepted);
            }
        }
        fill
    }
}
