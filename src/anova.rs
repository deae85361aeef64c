//! ANOVA table construction.
//!
//! Decomposes the total sum of squares into source-labeled components for
//! one-way and two-way designs, attaches mean squares, F-statistics,
//! p-values, and a significance verdict, and closes the table with a
//! TOTAL row. Replication in two-way designs is detected from the minimum
//! per-cell observation count.

use crate::error::{Error, Result};
use crate::group::{self, GroupSummary};
use crate::stats;
use crate::types::{Axis, Observation, SourceRow};

use std::collections::BTreeMap;

/// Significance threshold applied to every p-value.
const ALPHA: f64 = 0.05;

/// Label of the closing row.
const TOTAL_LABEL: &str = "TOTAL";

/// A variance source before the table is assembled.
struct Source {
    label: String,
    sum_of_squares: f64,
    degrees_of_freedom: usize,
}

impl Source {
    fn new(label: impl Into<String>, sum_of_squares: f64, degrees_of_freedom: usize) -> Self {
        Self {
            label: label.into(),
            sum_of_squares,
            degrees_of_freedom,
        }
    }
}

/// One-way ANOVA along the selected axis.
///
/// Emits a "Between Rows"/"Between Cols" row, a "Within Groups (Error)"
/// row, and the TOTAL row.
///
/// # Errors
/// * [`Error::EmptyDataset`] if there are no observations.
pub fn one_way(observations: &[Observation], axis: Axis) -> Result<Vec<SourceRow>> {
    if observations.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let grand = group::grand_summary(observations);
    let groups = match axis {
        Axis::Rows => group::group_by(observations, |o| o.row),
        Axis::Cols => group::group_by(observations, |o| o.col),
    };

    let n = grand.count;
    let num_groups = groups.len();
    let ss_total = grand.sum_of_squares;
    let ss_between = between_ss(&groups, grand.mean);
    let ss_within = ss_total - ss_between;

    let between_label = match axis {
        Axis::Rows => "Between Rows",
        Axis::Cols => "Between Cols",
    };

    Ok(build_table(
        vec![Source::new(between_label, ss_between, num_groups - 1)],
        Source::new("Within Groups (Error)", ss_within, n - num_groups),
        ss_total,
    ))
}

/// Two-way ANOVA over the row and column factors jointly.
///
/// With replication (every cell holds more than one observation) the table
/// carries Rows, Cols, Interaction, and Error rows; without replication
/// the Interaction term cannot be estimated and the table carries Rows,
/// Cols, and Error only. Both end with the TOTAL row.
///
/// # Errors
/// * [`Error::EmptyDataset`] if there are no observations.
/// * [`Error::DegenerateDesign`] if the row and column levels do not form
///   a complete factorial cross (some row × col cell has no data).
pub fn two_way(observations: &[Observation]) -> Result<Vec<SourceRow>> {
    if observations.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let grand = group::grand_summary(observations);
    let rows = group::group_by(observations, |o| o.row);
    let cols = group::group_by(observations, |o| o.col);
    let cells = group::group_by(observations, |o| (o.row, o.col));

    let n = grand.count;
    let num_rows = rows.len();
    let num_cols = cols.len();

    if cells.len() != num_rows * num_cols {
        return Err(Error::degenerate_design(format!(
            "incomplete factorial cross: {num_rows} row levels x {num_cols} col levels \
             but only {} populated cells",
            cells.len()
        )));
    }

    let ss_total = grand.sum_of_squares;
    let ss_rows = between_ss(&rows, grand.mean);
    let ss_cols = between_ss(&cols, grand.mean);
    let row_df = num_rows - 1;
    let col_df = num_cols - 1;

    let min_cell = cells.values().map(|c| c.count).min().unwrap_or(0);
    let replicated = min_cell > 1;

    if replicated {
        let ss_cells = between_ss(&cells, grand.mean);
        let ss_interaction = ss_cells - ss_rows - ss_cols;
        let ss_error = ss_total - ss_cells;
        Ok(build_table(
            vec![
                Source::new("Rows", ss_rows, row_df),
                Source::new("Cols", ss_cols, col_df),
                Source::new("Interaction", ss_interaction, row_df * col_df),
            ],
            Source::new("Error", ss_error, n - num_rows * num_cols),
            ss_total,
        ))
    } else {
        let ss_error = ss_total - ss_rows - ss_cols;
        Ok(build_table(
            vec![
                Source::new("Rows", ss_rows, row_df),
                Source::new("Cols", ss_cols, col_df),
            ],
            Source::new("Error", ss_error, row_df * col_df),
            ss_total,
        ))
    }
}

/// Weighted between-group sum of squares, Σ n_g·(mean_g − grand_mean)².
fn between_ss<K>(groups: &BTreeMap<K, GroupSummary>, grand_mean: f64) -> f64 {
    groups
        .values()
        .map(|g| g.count as f64 * (g.mean - grand_mean).powi(2))
        .sum()
}

/// Assemble the final table from effect sources plus the error source.
///
/// Each effect row gets its mean square (absent when df is zero), an
/// F-statistic against the error mean square (absent when that is zero or
/// itself absent), the F-distribution tail p-value, and the significance
/// verdict at [`ALPHA`]. The error row keeps its mean square but never an
/// F or p. The TOTAL row closes the decomposition: its SS and df are the
/// sums over every source.
fn build_table(effects: Vec<Source>, error: Source, ss_total_direct: f64) -> Vec<SourceRow> {
    let error_ms = if error.degrees_of_freedom > 0 {
        Some(error.sum_of_squares / error.degrees_of_freedom as f64)
    } else {
        None
    };

    let mut table = Vec::with_capacity(effects.len() + 2);
    let mut total_ss = 0.0;
    let mut total_df = 0;

    for source in effects {
        let mean_square = if source.degrees_of_freedom > 0 {
            Some(source.sum_of_squares / source.degrees_of_freedom as f64)
        } else {
            None
        };

        let f_statistic = match (mean_square, error_ms) {
            (Some(ms), Some(err_ms)) if err_ms > 0.0 => Some(ms / err_ms),
            _ => None,
        };

        let p_value = f_statistic
            .and_then(|f| stats::f_survival(f, source.degrees_of_freedom, error.degrees_of_freedom))
            .map(|tail| tail.value);
        let significant = p_value.map(|p| p < ALPHA);

        total_ss += source.sum_of_squares;
        total_df += source.degrees_of_freedom;
        table.push(SourceRow {
            label: source.label,
            sum_of_squares: source.sum_of_squares,
            degrees_of_freedom: source.degrees_of_freedom,
            mean_square,
            f_statistic,
            p_value,
            significant,
        });
    }

    total_ss += error.sum_of_squares;
    total_df += error.degrees_of_freedom;
    table.push(SourceRow {
        label: error.label,
        sum_of_squares: error.sum_of_squares,
        degrees_of_freedom: error.degrees_of_freedom,
        mean_square: error_ms,
        f_statistic: None,
        p_value: None,
        significant: None,
    });

    // The decomposition must close on the directly computed total.
    debug_assert!(
        (total_ss - ss_total_direct).abs() <= 1e-6 * ss_total_direct.abs().max(1.0),
        "sum-of-squares closure violated: {total_ss} vs {ss_total_direct}"
    );

    table.push(SourceRow {
        label: TOTAL_LABEL.to_string(),
        sum_of_squares: total_ss,
        degrees_of_freedom: total_df,
        mean_square: None,
        f_statistic: None,
        p_value: None,
        significant: None,
    });

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(row: usize, col: usize, value: f64) -> Observation {
        Observation { row, col, value }
    }

    /// Two row groups of three values each: {1,2,3} and {4,5,6}.
    fn two_row_groups() -> Vec<Observation> {
        vec![
            obs(0, 0, 1.0),
            obs(0, 0, 2.0),
            obs(0, 0, 3.0),
            obs(1, 0, 4.0),
            obs(1, 0, 5.0),
            obs(1, 0, 6.0),
        ]
    }

    /// Balanced 2x2 design with two replicates per cell.
    fn replicated_2x2() -> Vec<Observation> {
        vec![
            obs(0, 0, 1.0),
            obs(0, 0, 2.0),
            obs(0, 1, 3.0),
            obs(0, 1, 4.0),
            obs(1, 0, 5.0),
            obs(1, 0, 6.0),
            obs(1, 1, 7.0),
            obs(1, 1, 8.0),
        ]
    }

    #[test]
    fn test_one_way_by_rows() {
        let table = one_way(&two_row_groups(), Axis::Rows).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table[0].label, "Between Rows");
        assert_eq!(table[1].label, "Within Groups (Error)");
        assert_eq!(table[2].label, "TOTAL");

        // Grand mean 3.5: SS_between = 3·1.5² · 2 = 13.5, SS_total = 17.5.
        assert!((table[0].sum_of_squares - 13.5).abs() < 1e-10);
        assert!((table[1].sum_of_squares - 4.0).abs() < 1e-10);
        assert!((table[2].sum_of_squares - 17.5).abs() < 1e-10);

        assert_eq!(table[0].degrees_of_freedom, 1);
        assert_eq!(table[1].degrees_of_freedom, 4);
        assert_eq!(table[2].degrees_of_freedom, 5);

        // MS_between = 13.5, MS_within = 1, F = 13.5, p ≈ 0.021.
        assert!((table[0].mean_square.unwrap() - 13.5).abs() < 1e-10);
        assert!((table[1].mean_square.unwrap() - 1.0).abs() < 1e-10);
        assert!((table[0].f_statistic.unwrap() - 13.5).abs() < 1e-10);
        let p = table[0].p_value.unwrap();
        assert!(p > 0.01 && p < 0.03, "p = {p}");
        assert_eq!(table[0].significant, Some(true));

        // The error row carries no F, p, or verdict.
        assert_eq!(table[1].f_statistic, None);
        assert_eq!(table[1].p_value, None);
        assert_eq!(table[1].significant, None);
    }

    #[test]
    fn test_one_way_by_cols() {
        // Same data transposed onto columns.
        let data: Vec<Observation> = two_row_groups()
            .into_iter()
            .map(|o| obs(o.col, o.row, o.value))
            .collect();
        let table = one_way(&data, Axis::Cols).unwrap();

        assert_eq!(table[0].label, "Between Cols");
        assert!((table[0].sum_of_squares - 13.5).abs() < 1e-10);
    }

    #[test]
    fn test_one_way_closure() {
        let data = vec![
            obs(0, 0, 2.0),
            obs(0, 0, 4.0),
            obs(1, 0, 3.0),
            obs(1, 0, 9.0),
            obs(2, 0, 1.0),
            obs(2, 0, 5.0),
            obs(2, 0, 6.0),
        ];
        let table = one_way(&data, Axis::Rows).unwrap();
        let total = table.last().unwrap();

        let ss_sum: f64 = table[..table.len() - 1]
            .iter()
            .map(|r| r.sum_of_squares)
            .sum();
        let df_sum: usize = table[..table.len() - 1]
            .iter()
            .map(|r| r.degrees_of_freedom)
            .sum();

        assert!((ss_sum - total.sum_of_squares).abs() < 1e-6);
        assert_eq!(df_sum, total.degrees_of_freedom);
        assert_eq!(total.degrees_of_freedom, data.len() - 1);
    }

    #[test]
    fn test_one_way_single_group() {
        // One group: between df = 0, so MS/F/p are all absent.
        let data = vec![obs(0, 0, 1.0), obs(0, 0, 2.0), obs(0, 0, 3.0)];
        let table = one_way(&data, Axis::Rows).unwrap();

        assert_eq!(table[0].degrees_of_freedom, 0);
        assert_eq!(table[0].mean_square, None);
        assert_eq!(table[0].f_statistic, None);
        assert_eq!(table[0].p_value, None);
        assert_eq!(table[0].significant, None);
    }

    #[test]
    fn test_one_way_empty() {
        assert_eq!(one_way(&[], Axis::Rows).unwrap_err(), Error::EmptyDataset);
    }

    #[test]
    fn test_two_way_replicated() {
        let table = two_way(&replicated_2x2()).unwrap();

        assert_eq!(table.len(), 5);
        let labels: Vec<&str> = table.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Rows", "Cols", "Interaction", "Error", "TOTAL"]);

        // Grand mean 4.5. Row means 2.5/6.5, col means 3.5/5.5,
        // cell means 1.5/3.5/5.5/7.5.
        assert!((table[0].sum_of_squares - 32.0).abs() < 1e-10);
        assert!((table[1].sum_of_squares - 8.0).abs() < 1e-10);
        assert!((table[2].sum_of_squares - 0.0).abs() < 1e-10);
        assert!((table[3].sum_of_squares - 2.0).abs() < 1e-10);
        assert!((table[4].sum_of_squares - 42.0).abs() < 1e-10);

        assert_eq!(table[0].degrees_of_freedom, 1);
        assert_eq!(table[1].degrees_of_freedom, 1);
        assert_eq!(table[2].degrees_of_freedom, 1);
        assert_eq!(table[3].degrees_of_freedom, 4);
        assert_eq!(table[4].degrees_of_freedom, 7);

        // MS_error = 0.5, F_rows = 64 (strongly significant); the zero
        // interaction gives p = 1 and a negative verdict.
        assert!((table[0].f_statistic.unwrap() - 64.0).abs() < 1e-10);
        assert_eq!(table[0].significant, Some(true));
        assert!((table[2].p_value.unwrap() - 1.0).abs() < 1e-10);
        assert_eq!(table[2].significant, Some(false));

        // Error row: MS present, F/p absent.
        assert!((table[3].mean_square.unwrap() - 0.5).abs() < 1e-10);
        assert_eq!(table[3].f_statistic, None);
    }

    #[test]
    fn test_two_way_unreplicated() {
        // 2x2, exactly one value per cell.
        let data = vec![
            obs(0, 0, 1.0),
            obs(0, 1, 3.0),
            obs(1, 0, 5.0),
            obs(1, 1, 7.0),
        ];
        let table = two_way(&data).unwrap();

        assert_eq!(table.len(), 4);
        let labels: Vec<&str> = table.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Rows", "Cols", "Error", "TOTAL"]);

        // Grand mean 4: SS_rows = 16, SS_cols = 4, SS_total = 20,
        // additive fit is exact so SS_error = 0 with df (2−1)(2−1) = 1.
        assert!((table[0].sum_of_squares - 16.0).abs() < 1e-10);
        assert!((table[1].sum_of_squares - 4.0).abs() < 1e-10);
        assert!(table[2].sum_of_squares.abs() < 1e-10);
        assert_eq!(table[2].degrees_of_freedom, 1);
        assert_eq!(table[3].degrees_of_freedom, 3);

        // Zero error mean square: F cannot be formed.
        assert_eq!(table[0].f_statistic, None);
        assert_eq!(table[0].p_value, None);
        assert_eq!(table[0].significant, None);
    }

    #[test]
    fn test_two_way_unreplicated_with_noise() {
        // 3x2 without replication and a non-additive wrinkle, so the
        // error term is positive and F/p are produced.
        let data = vec![
            obs(0, 0, 1.0),
            obs(0, 1, 2.0),
            obs(1, 0, 3.0),
            obs(1, 1, 5.0),
            obs(2, 0, 6.0),
            obs(2, 1, 7.0),
        ];
        let table = two_way(&data).unwrap();

        assert_eq!(table.len(), 4);
        assert!(table[0].f_statistic.is_some());
        assert!(table[0].p_value.is_some());

        let total = table.last().unwrap();
        let ss_sum: f64 = table[..3].iter().map(|r| r.sum_of_squares).sum();
        assert!((ss_sum - total.sum_of_squares).abs() < 1e-6);
        assert_eq!(total.degrees_of_freedom, 5);
    }

    #[test]
    fn test_two_way_replicated_closure() {
        let data = replicated_2x2();
        let table = two_way(&data).unwrap();
        let total = table.last().unwrap();

        let ss_sum: f64 = table[..4].iter().map(|r| r.sum_of_squares).sum();
        let df_sum: usize = table[..4].iter().map(|r| r.degrees_of_freedom).sum();
        assert!((ss_sum - total.sum_of_squares).abs() < 1e-6);
        assert_eq!(df_sum, total.degrees_of_freedom);
        assert_eq!(total.degrees_of_freedom, data.len() - 1);
    }

    #[test]
    fn test_two_way_incomplete_cross() {
        // (1,1) is missing: 2 rows x 2 cols but only 3 populated cells.
        let data = vec![obs(0, 0, 1.0), obs(0, 1, 2.0), obs(1, 0, 3.0)];
        let err = two_way(&data).unwrap_err();

        assert!(matches!(err, Error::DegenerateDesign { .. }));
        assert!(err.to_string().contains("3 populated cells"));
    }

    #[test]
    fn test_two_way_empty() {
        assert_eq!(two_way(&[]).unwrap_err(), Error::EmptyDataset);
    }

    #[test]
    fn test_idempotence() {
        let data = replicated_2x2();
        assert_eq!(two_way(&data).unwrap(), two_way(&data).unwrap());
        assert_eq!(
            one_way(&data, Axis::Cols).unwrap(),
            one_way(&data, Axis::Cols).unwrap()
        );
    }
}
