//! Error types for the anovatab library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! specific variants for input parsing, empty datasets, and degenerate
//! experimental designs. All variants render as a single human-readable
//! string suitable for returning across the request/response boundary.

use thiserror::Error;

/// The main error type for anovatab operations.
///
/// Every variant is fatal to the request that raised it: no partial ANOVA
/// table is ever produced alongside an error. Non-fatal numerical
/// conditions (continued-fraction non-convergence) are not errors; see
/// [`crate::types::TailProbability`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value token could not be parsed as a floating-point number.
    #[error("could not parse value '{token}' at row {row}, col {col} as a number")]
    Parse {
        /// The offending token, verbatim after trimming.
        token: String,
        /// Row index of the input record that carried the token.
        row: usize,
        /// Column index of the input record that carried the token.
        col: usize,
    },

    /// No observations remained after parsing the input.
    #[error("No data provided.")]
    EmptyDataset,

    /// The design cannot be analyzed (e.g. an incomplete factorial cross).
    #[error("degenerate design: {message}")]
    DegenerateDesign {
        /// Description of what makes the design degenerate.
        message: String,
    },
}

/// A specialized `Result` type for anovatab operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `Parse` error for a bad token with its cell context.
    #[must_use]
    pub fn parse(token: impl Into<String>, row: usize, col: usize) -> Self {
        Self::Parse {
            token: token.into(),
            row,
            col,
        }
    }

    /// Create a new `DegenerateDesign` error.
    #[must_use]
    pub fn degenerate_design(message: impl Into<String>) -> Self {
        Self::DegenerateDesign {
            message: message.into(),
        }
    }
}
