//! # anovatab
//!
//! One-way and two-way ANOVA tables computed from scratch, including the
//! F-distribution tail probabilities behind the p-values.
//!
//! ## Overview
//!
//! Given tabular experimental data (observations tagged with row and
//! column factor levels), this library:
//! - parses raw cells, expanding comma-joined replicate values
//! - partitions total variance into between-group, interaction, and error
//!   sums of squares
//! - derives F-statistics and p-values via its own regularized incomplete
//!   beta implementation (no statistics library involved)
//! - emits an ordered table of [`types::SourceRow`]s plus per-group
//!   [`types::ChartPoint`]s for visualization
//!
//! ## Quick Start
//!
//! ```rust
//! use anovatab::prelude::*;
//!
//! let request = AnovaRequest {
//!     kind: AnalysisKind::OneWay,
//!     axis: Axis::Rows,
//!     data: vec![
//!         CellRecord { row: 0, col: 0, value: CellValue::Text("1,2,3".into()) },
//!         CellRecord { row: 1, col: 0, value: CellValue::Text("4,5,6".into()) },
//!     ],
//! };
//!
//! match run(&request) {
//!     AnovaResponse::Table { results, .. } => {
//!         assert_eq!(results.last().unwrap().label, "TOTAL");
//!     }
//!     AnovaResponse::Failure { error } => panic!("{error}"),
//! }
//! ```
//!
//! ## Design
//!
//! Every invocation is a pure function of its input: no global state, no
//! interior mutability, no I/O. Calls are safe from any number of threads
//! without synchronization. Grouping uses ordered maps, so identical input
//! yields bit-identical output.
//!
//! Entries a printed table would render as "—" (the error row's F and p,
//! everything past SS/df on the TOTAL row) are `Option::None`, never
//! sentinel numbers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod anova;
pub mod api;
pub mod chart;
pub mod error;
pub mod group;
pub mod parse;
pub mod stats;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::anova::{one_way, two_way};
    pub use crate::api::{run, AnovaRequest, AnovaResponse};
    pub use crate::chart::chart_points;
    pub use crate::error::{Error, Result};
    pub use crate::parse::parse_observations;
    pub use crate::stats::{f_survival, ln_gamma, regularized_incomplete_beta};
    pub use crate::types::{
        AnalysisKind, Axis, CellRecord, CellValue, ChartPoint, Observation, SourceRow,
        TailProbability,
    };
}

// Re-export commonly used items at crate root
pub use api::{run, AnovaRequest, AnovaResponse};
pub use error::{Error, Result};
pub use stats::f_survival;
pub use types::{AnalysisKind, Axis, CellRecord, CellValue, ChartPoint, Observation, SourceRow};
