//! Detection of known disease-marker substrings in DNA sequences, with
//! threshold-filtered risk scoring.
//!
//! The pipeline is two pure steps: raw text is cleaned and validated into a
//! [`sequence::NormalizedSequence`], then [`analysis::analyze`] scans it
//! against an ordered [`marker_table::MarkerTable`] and aggregates a
//! [`analysis::RiskSummary`]. Table loading and the one-shot CSV bootstrap
//! live in [`marker_table`]; the engine itself performs no I/O.

use lazy_static::lazy_static;
use marker_table::MarkerTable;

pub mod analysis;
pub mod error;
pub mod marker_table;
pub mod sequence;

lazy_static! {
    // Built-in reference markers, used when no table file is supplied
    pub static ref DEFAULT_MARKERS: MarkerTable = MarkerTable::default();
}
