use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Variant;

/// Variant assigned to one fixed-length time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowAssignment {
    pub window_start: DateTime<Utc>,
    pub variant: Variant,
}

impl WindowAssignment {
    pub fn new(window_start: DateTime<Utc>, variant: Variant) -> Self {
        WindowAssignment { window_start, variant }
    }
}

/// Per-window rollup of request outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMetric {
    pub window_start: DateTime<Utc>,
    pub variant: Variant,
    pub request_count: u64,
    pub completed_count: u64,
    pub order_value_sum: f64,
    /// completed_count / request_count, NaN for an empty window
    pub ocr: f64,
    /// order_value_sum / request_count, NaN for an empty window
    pub avg_gmv: f64,
}

impl WindowMetric {
    /// Build a metric row from raw counts, deriving both ratios
    pub fn from_counts(
        window_start: DateTime<Utc>,
        variant: Variant,
        request_count: u64,
        completed_count: u64,
        order_value_sum: f64,
    ) -> Self {
        WindowMetric {
            window_start,
            variant,
            request_count,
            completed_count,
            order_value_sum,
            ocr: ratio(completed_count as f64, request_count),
            avg_gmv: ratio(order_value_sum, request_count),
        }
    }

    /// Whether the OCR is usable as a statistical observation
    pub fn has_defined_ocr(&self) -> bool {
        self.ocr.is_finite()
    }
}

fn ratio(numerator: f64, count: u64) -> f64 {
    if count == 0 {
        return f64::NAN;
    }
    numerator / count as f64
}
