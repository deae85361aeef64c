//! Per-group summary statistics for charting.
//!
//! Independent of the ANOVA table: produces one point per distinct group
//! with the group's mean and maximum, labeled with a 1-based index.

use std::collections::BTreeMap;

use crate::types::{AnalysisKind, Axis, ChartPoint, Observation};

/// Compute one chart point per group.
///
/// The grouping axis follows the original charting rule: group by row only
/// for a one-way analysis over rows, otherwise group by column. Group keys
/// are 0-based; labels are the 1-based form "G1", "G2", ...
#[must_use]
pub fn chart_points(
    observations: &[Observation],
    kind: AnalysisKind,
    axis: Axis,
) -> Vec<ChartPoint> {
    let by_row = kind == AnalysisKind::OneWay && axis == Axis::Rows;

    // (count, sum, max) per group, accumulated in one pass.
    let mut accumulators: BTreeMap<usize, (usize, f64, f64)> = BTreeMap::new();
    for obs in observations {
        let key = if by_row { obs.row } else { obs.col };
        let entry = accumulators
            .entry(key)
            .or_insert((0, 0.0, f64::NEG_INFINITY));
        entry.0 += 1;
        entry.1 += obs.value;
        entry.2 = entry.2.max(obs.value);
    }

    accumulators
        .into_iter()
        .map(|(key, (count, sum, max))| ChartPoint {
            group_label: format!("G{}", key + 1),
            mean: sum / count as f64,
            max,
        })
        .collect()
}
