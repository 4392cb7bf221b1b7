use crate::error::InvalidSequenceError;
use crate::marker_table::{MarkerRecord, MarkerTable};
use crate::sequence::NormalizedSequence;
use serde::{Deserialize, Serialize};

/// Detections below this risk are dropped when no threshold is supplied.
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.5;

/// A reference marker found as a substring of the analyzed sequence.
/// Fields are copies of the matched table record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub marker: String,
    pub risk: f64,
    pub description: String,
}

impl Detection {
    fn from_record(record: &MarkerRecord) -> Self {
        Self {
            marker: record.marker.clone(),
            risk: record.risk,
            description: record.description.clone(),
        }
    }
}

/// Aggregate over one analysis run. `detected_count` counts the filtered
/// detections only; `total_risk_score` sums the risk of every matched
/// marker, threshold or not.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub detected_count: usize,
    pub total_risk_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub detections: Vec<Detection>,
    pub summary: RiskSummary,
}

impl AnalysisResult {
    /// The `n` highest-risk detections, descending by risk, stable for
    /// ties. A display convenience; `detections` itself stays in table
    /// order.
    pub fn top_by_risk(&self, n: usize) -> Vec<&Detection> {
        let mut ranked: Vec<&Detection> = self.detections.iter().collect();
        ranked.sort_by(|a, b| b.risk.total_cmp(&a.risk));
        ranked.truncate(n);
        ranked
    }
}

/// Scans `sequence` for every marker in `table`, in table order, and
/// returns the detections whose risk is at least `threshold` plus a
/// summary.
///
/// A marker matches if it occurs anywhere as a contiguous substring;
/// multiple occurrences count once. `total_risk_score` accumulates over
/// all matches before filtering, while `detected_count` counts the
/// filtered list only.
///
/// The sequence is expected to come from
/// [`NormalizedSequence`](crate::sequence::NormalizedSequence). If it
/// contains anything outside uppercase {A,T,C,G} the zero result is
/// returned instead; callers wanting a hard error should use
/// [`analyze_raw`].
pub fn analyze(sequence: &str, table: &MarkerTable, threshold: f64) -> AnalysisResult {
    if !sequence.chars().all(NormalizedSequence::is_valid_base) {
        return AnalysisResult::default();
    }

    let mut matched = vec![];
    let mut total_risk_score = 0.0;
    for record in table.iter() {
        if sequence.contains(record.marker.as_str()) {
            matched.push(Detection::from_record(record));
            total_risk_score += record.risk;
        }
    }

    let detections: Vec<Detection> = matched
        .into_iter()
        .filter(|detection| detection.risk >= threshold)
        .collect();
    let summary = RiskSummary {
        detected_count: detections.len(),
        total_risk_score,
    };
    AnalysisResult {
        detections,
        summary,
    }
}

/// Normalizes raw sequence text and analyzes it in one step, failing hard
/// on invalid input. This is the strict entry point for callers holding
/// unvalidated text.
pub fn analyze_raw(
    raw: &str,
    table: &MarkerTable,
    threshold: f64,
) -> Result<AnalysisResult, InvalidSequenceError> {
    let sequence = NormalizedSequence::from_raw(raw)?;
    Ok(analyze(sequence.as_str(), table, threshold))
}
