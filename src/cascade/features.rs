//! Compaction of the global feature index space to the features the trained
//! stages actually reference.

/// Map from global feature index to a dense index over used features.
///
/// Built in two phases: stages flag the indices they reference through
/// [`mark_used`](Self::mark_used), then [`compact`](Self::compact) assigns
/// `0..k` to the flagged indices in ascending global order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureUsageMap {
    used: Vec<bool>,
    compacted: Vec<Option<usize>>,
}

impl FeatureUsageMap {
    /// Empty map over `feature_count` features, none of them used.
    pub fn new(feature_count: usize) -> Self {
        Self {
            used: vec![false; feature_count],
            compacted: vec![None; feature_count],
        }
    }

    pub fn feature_count(&self) -> usize {
        self.used.len()
    }

    /// Flag `feature_idx` as referenced. Panics when the index lies outside
    /// the feature space.
    pub fn mark_used(&mut self, feature_idx: usize) {
        assert!(
            feature_idx < self.used.len(),
            "feature index {feature_idx} outside feature space of {}",
            self.used.len()
        );
        self.used[feature_idx] = true;
    }

    pub fn is_used(&self, feature_idx: usize) -> bool {
        self.used.get(feature_idx).copied().unwrap_or(false)
    }

    /// Assign dense indices to the used features, preserving their order.
    pub fn compact(&mut self) {
        let mut next = 0;
        for (slot, &used) in self.compacted.iter_mut().zip(&self.used) {
            *slot = if used {
                next += 1;
                Some(next - 1)
            } else {
                None
            };
        }
    }

    /// Dense index of `feature_idx`, or `None` if it is unused (or the map
    /// has not been compacted yet).
    pub fn compacted_index(&self, feature_idx: usize) -> Option<usize> {
        self.compacted.get(feature_idx).copied().flatten()
    }

    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }

    /// `(global, compacted)` pairs of every used feature, in ascending order.
    pub fn used_features(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.compacted
            .iter()
            .enumerate()
            .filter_map(|(global, dense)| dense.map(|d| (global, d)))
    }
}
