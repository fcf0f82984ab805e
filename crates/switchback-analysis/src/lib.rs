mod table;
mod aggregator;
mod welch;
mod inference;
mod diagnostics;

pub use table::Table;
pub use aggregator::aggregate_windows;
pub use welch::WelchTest;
pub use inference::{InferenceEngine, MIN_WINDOWS_PER_ARM, SIGNIFICANCE_LEVEL};
pub use diagnostics::{diagnose, ArmDiagnostics, Diagnostics, OcrSpread, RevenueReport};

use switchback_types::{ExperimentSummary, RequestRecord, WindowMetric};

/// Roll requests up to windows and test treatment against control.
///
/// Never fails: an empty batch yields `ExperimentSummary::empty()` and no
/// window rows.
pub fn analyze(requests: &[RequestRecord]) -> (ExperimentSummary, Vec<WindowMetric>) {
    let metrics = aggregate_windows(requests);
    let summary = InferenceEngine::summarize(&metrics, requests);
    (summary, metrics)
}
