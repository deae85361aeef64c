//! Request/response boundary.
//!
//! The thin seam between a transport layer (HTTP, CLI, whatever) and the
//! computation pipeline. [`run`] never panics and never returns `Err`:
//! every fatal condition is folded into the `{error}` response variant as
//! a single human-readable string, so the transport can serialize the
//! result unconditionally.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{AnalysisKind, Axis, CellRecord, ChartPoint, SourceRow};
use crate::{anova, chart, parse};

/// An ANOVA computation request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnovaRequest {
    /// The design to run: `"1way"` or `"2way"`.
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
    /// The grouping axis for one-way designs: `"rows"` or `"cols"`.
    pub axis: Axis,
    /// Raw tabular records.
    pub data: Vec<CellRecord>,
}

/// The response to an ANOVA request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnovaResponse {
    /// Successful computation: the full table and the chart summary.
    Table {
        /// Ordered ANOVA table rows, ending with TOTAL.
        results: Vec<SourceRow>,
        /// One point per chart group.
        #[serde(rename = "chartData")]
        chart_data: Vec<ChartPoint>,
    },
    /// Any fatal failure, as a single message.
    Failure {
        /// Human-readable description of what went wrong.
        error: String,
    },
}

/// Run a complete ANOVA request through the pipeline.
///
/// Parse, aggregate, decompose, and summarize. Infallible at the type
/// level: failures surface as [`AnovaResponse::Failure`].
#[must_use]
pub fn run(request: &AnovaRequest) -> AnovaResponse {
    match evaluate(request) {
        Ok(response) => response,
        Err(err) => AnovaResponse::Failure {
            error: err.to_string(),
        },
    }
}

fn evaluate(request: &AnovaRequest) -> Result<AnovaResponse> {
    let observations = parse::parse_observations(&request.data)?;
    if observations.is_empty() {
        return Err(crate::error::Error::EmptyDataset);
    }

    log::debug!(
        "running {:?} ANOVA (axis {:?}) over {} observations",
        request.kind,
        request.axis,
        observations.len()
    );

    let results = match request.kind {
        AnalysisKind::OneWay => anova::one_way(&observations, request.axis)?,
        AnalysisKind::TwoWay => anova::two_way(&observations)?,
    };
    let chart_data = chart::chart_points(&observations, request.kind, request.axis);

    Ok(AnovaResponse::Table {
        results,
        chart_data,
    })
}
