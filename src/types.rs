//! Core data types for ANOVA computation.
//!
//! Types that cross the request/response boundary carry serde derives with
//! camelCase wire names. Absent table entries (the "—" markers of a printed
//! ANOVA table) are modeled as `Option`, never as sentinel numbers.

use serde::{Deserialize, Serialize};

/// Which table axis a grouping factor is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Group observations by their row index.
    Rows,
    /// Group observations by their column index.
    Cols,
}

/// The ANOVA design requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisKind {
    /// Single-factor ANOVA along a caller-selected axis.
    #[serde(rename = "1way")]
    OneWay,
    /// Two-factor ANOVA over the row and column factors jointly.
    #[serde(rename = "2way")]
    TwoWay,
}

/// One raw input record: a table cell and its (possibly multi-valued) value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Row index of the cell (0-based).
    pub row: usize,
    /// Column index of the cell (0-based).
    pub col: usize,
    /// The cell content: a scalar or a comma-joined list of scalars.
    pub value: CellValue,
}

/// A cell value as received on the wire: a JSON number or a string.
///
/// Strings may hold several replicate values joined by commas; numbers are
/// always a single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A single numeric value.
    Number(f64),
    /// A raw string, split and parsed by the observation parser.
    Text(String),
}

/// A single scalar observation tagged with its factor levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Row factor level (0-based).
    pub row: usize,
    /// Column factor level (0-based).
    pub col: usize,
    /// The observed value.
    pub value: f64,
}

/// One line of the output ANOVA table.
///
/// `None` fields mark entries that are not applicable for the row: the
/// error row never carries an F-statistic or p-value, and the TOTAL row
/// carries only its sum of squares and degrees of freedom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRow {
    /// Human-readable source label (e.g. "Between Rows", "Interaction").
    pub label: String,
    /// Sum of squares attributed to this source.
    pub sum_of_squares: f64,
    /// Degrees of freedom for this source.
    pub degrees_of_freedom: usize,
    /// Mean square (SS / df), absent when df is zero.
    pub mean_square: Option<f64>,
    /// F-statistic against the error mean square, absent where undefined.
    pub f_statistic: Option<f64>,
    /// Upper-tail F-distribution probability of the F-statistic.
    pub p_value: Option<f64>,
    /// Whether the p-value falls below the 0.05 threshold.
    pub significant: Option<bool>,
}

/// Per-group summary statistics for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// 1-based human-readable group label, e.g. "G1".
    pub group_label: String,
    /// Mean of the group's raw values.
    pub mean: f64,
    /// Maximum of the group's raw values.
    pub max: f64,
}

/// An upper-tail probability together with its convergence status.
///
/// The continued-fraction evaluation of the incomplete beta function is
/// iterated to a fixed tolerance; if the iteration cap is hit first, the
/// best available estimate is returned with `converged` set to `false`.
/// Non-convergence is advisory, never fatal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailProbability {
    /// The probability estimate, in `[0, 1]`.
    pub value: f64,
    /// Whether the iteration reached its relative-error tolerance.
    pub converged: bool,
}

impl TailProbability {
    /// A probability known exactly, with no iteration involved.
    #[must_use]
    pub(crate) fn exact(value: f64) -> Self {
        Self {
            value,
            converged: true,
        }
    }
}
