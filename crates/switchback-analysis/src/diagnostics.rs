use serde::{Deserialize, Serialize};
use switchback_types::{ExperimentSummary, RequestRecord, Variant, WindowMetric};

use crate::Table;

/// Five-number summary of window-level OCR for one arm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSpread {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl OcrSpread {
    /// Linear-interpolated quartiles over finite values; all zero when none are
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return OcrSpread::default();
        }
        sorted.sort_by(f64::total_cmp);

        OcrSpread {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Price and stability figures for one arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmDiagnostics {
    pub variant: Variant,
    pub windows: u64,
    pub requests: u64,
    /// Mean quoted price, 0.0 with no requests
    pub mean_price_quoted: f64,
    pub ocr_spread: OcrSpread,
}

/// Revenue per request (RPR) by arm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub control_rpr: f64,
    pub treatment_rpr: f64,
    /// (treatment_rpr - control_rpr) / control_rpr, 0.0 if control RPR is zero
    pub revenue_lift: f64,
}

impl RevenueReport {
    pub fn from_summary(summary: &ExperimentSummary) -> Self {
        let control_rpr = per_request(summary.control_gmv, summary.control_requests);
        let treatment_rpr = per_request(summary.treatment_gmv, summary.treatment_requests);
        let revenue_lift = if control_rpr > 0.0 {
            (treatment_rpr - control_rpr) / control_rpr
        } else {
            0.0
        };

        RevenueReport {
            control_rpr,
            treatment_rpr,
            revenue_lift,
        }
    }
}

fn per_request(gmv: f64, requests: u64) -> f64 {
    if requests == 0 || !gmv.is_finite() {
        return 0.0;
    }
    gmv / requests as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub control: ArmDiagnostics,
    pub treatment: ArmDiagnostics,
    pub revenue: RevenueReport,
}

/// Per-arm pricing and OCR-spread checks plus revenue per request
pub fn diagnose(
    requests: &[RequestRecord],
    metrics: &[WindowMetric],
    summary: &ExperimentSummary,
) -> Diagnostics {
    let rows: Table<&RequestRecord> = requests.iter().collect();
    let windows: Table<&WindowMetric> = metrics.iter().collect();

    let arm = |variant: Variant| {
        let arm_rows = rows.filter(|r| r.variant() == variant);
        let arm_windows = windows.filter(|m| m.variant == variant);

        ArmDiagnostics {
            variant,
            windows: arm_windows.len() as u64,
            requests: arm_rows.len() as u64,
            mean_price_quoted: arm_rows.mean_by(|r| r.price_quoted()).unwrap_or(0.0),
            ocr_spread: OcrSpread::from_values(&arm_windows.column(|m| m.ocr)),
        }
    };

    Diagnostics {
        control: arm(Variant::Control),
        treatment: arm(Variant::Treatment),
        revenue: RevenueReport::from_summary(summary),
    }
}
