//! Group aggregation.
//!
//! The shared substrate for every ANOVA variant: observations grouped by a
//! caller-supplied key function, with per-group count, sum, sum of squared
//! deviations, and mean. `BTreeMap` keeps group iteration deterministic,
//! which makes repeated runs over identical input bit-identical.

use std::collections::BTreeMap;

use crate::types::Observation;

/// Summary statistics for one group of observations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupSummary {
    /// Number of observations in the group.
    pub count: usize,
    /// Sum of the group's values.
    pub sum: f64,
    /// Sum of squared deviations from the group mean, Σ(x − mean)².
    pub sum_of_squares: f64,
    /// Group mean.
    pub mean: f64,
}

/// Group observations by a key function and summarize each group.
///
/// Sums of squares use the deviation form Σ(x − mean)² rather than
/// Σx² − (Σx)²/n, which avoids catastrophic cancellation for data with
/// large means.
pub fn group_by<K, F>(observations: &[Observation], key: F) -> BTreeMap<K, GroupSummary>
where
    K: Ord + Copy,
    F: Fn(&Observation) -> K,
{
    let mut groups: BTreeMap<K, GroupSummary> = BTreeMap::new();

    for obs in observations {
        let entry = groups.entry(key(obs)).or_default();
        entry.count += 1;
        entry.sum += obs.value;
    }
    for group in groups.values_mut() {
        group.mean = group.sum / group.count as f64;
    }
    for obs in observations {
        if let Some(group) = groups.get_mut(&key(obs)) {
            group.sum_of_squares += (obs.value - group.mean).powi(2);
        }
    }

    groups
}

/// Summarize all observations as a single group.
///
/// The resulting `sum_of_squares` is the total sum of squares around the
/// grand mean.
pub fn grand_summary(observations: &[Observation]) -> GroupSummary {
    group_by(observations, |_| ())
        .remove(&())
        .unwrap_or_default()
}

/// Minimum observation count over all (row, col) cells.
///
/// A minimum above 1 means the design is replicated and an interaction
/// term can be estimated. Returns 0 for an empty observation set.
#[must_use]
pub fn min_cell_count(observations: &[Observation]) -> usize {
    group_by(observations, |o| (o.row, o.col))
        .values()
        .map(|g| g.count)
        .min()
        .unwrap_or(0)
}
