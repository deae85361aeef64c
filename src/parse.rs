//! Observation parsing.
//!
//! Turns raw tabular input records into a flat list of scalar observations
//! tagged by row and column factor levels. A single cell may hold several
//! replicate values joined by commas; each surviving token becomes its own
//! observation.

use crate::error::{Error, Result};
use crate::types::{CellRecord, CellValue, Observation};

/// Delimiter separating replicate values within a single cell.
const VALUE_DELIMITER: char = ',';

/// Parse input records into observations.
///
/// String values are split on [`VALUE_DELIMITER`], whitespace-trimmed, and
/// empty tokens are discarded. Numeric values pass through unchanged as a
/// single observation.
///
/// # Errors
/// * [`Error::Parse`] if any non-empty token is not a valid floating-point
///   number; the error carries the token and its row/col context, and the
///   whole request fails (no observations are silently dropped).
pub fn parse_observations(records: &[CellRecord]) -> Result<Vec<Observation>> {
    let mut observations = Vec::with_capacity(records.len());

    for record in records {
        match &record.value {
            CellValue::Number(value) => observations.push(Observation {
                row: record.row,
                col: record.col,
                value: *value,
            }),
            CellValue::Text(text) => {
                for token in text.split(VALUE_DELIMITER) {
                    let token = token.trim();
                    if token.is_empty() {
                        continue;
                    }
                    let value: f64 = token
                        .parse()
                        .map_err(|_| Error::parse(token, record.row, record.col))?;
                    observations.push(Observation {
                        row: record.row,
                        col: record.col,
                        value,
                    });
                }
            }
        }
    }

    Ok(observations)
}
