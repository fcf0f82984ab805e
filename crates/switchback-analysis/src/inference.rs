use switchback_types::{ExperimentSummary, RequestRecord, Variant, WindowMetric};

use crate::{Table, WelchTest};

/// p-values strictly below this are reported as significant
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Each arm needs at least this many windows before the t-test runs
pub const MIN_WINDOWS_PER_ARM: usize = 2;

/// Window-level inference over switchback metrics
pub struct InferenceEngine;

impl InferenceEngine {
    /// Build the experiment summary.
    ///
    /// OCR means and the hypothesis test use the window rows (the unit of
    /// randomisation); ride, revenue and request totals come from the raw
    /// requests.
    pub fn summarize(metrics: &[WindowMetric], requests: &[RequestRecord]) -> ExperimentSummary {
        if metrics.is_empty() {
            tracing::info!("no window metrics, returning empty summary");
            return ExperimentSummary::empty();
        }

        let windows: Table<&WindowMetric> = metrics.iter().collect();
        let control = windows.filter(|m| m.variant == Variant::Control);
        let treatment = windows.filter(|m| m.variant == Variant::Treatment);

        // Windows without requests carry no OCR observation
        let control_defined = control.filter(|m| m.has_defined_ocr());
        let treatment_defined = treatment.filter(|m| m.has_defined_ocr());

        let control_ocr = control_defined.mean_by(|m| m.ocr).unwrap_or(0.0);
        let treatment_ocr = treatment_defined.mean_by(|m| m.ocr).unwrap_or(0.0);

        let control_sample = control_defined.column(|m| m.ocr);
        let treatment_sample = treatment_defined.column(|m| m.ocr);

        let test = if control_sample.len() >= MIN_WINDOWS_PER_ARM
            && treatment_sample.len() >= MIN_WINDOWS_PER_ARM
        {
            WelchTest::run(&treatment_sample, &control_sample)
        } else {
            tracing::debug!(
                control_windows = control_sample.len(),
                treatment_windows = treatment_sample.len(),
                "too few windows per arm, skipping t-test"
            );
            None
        };
        let (t_statistic, p_value) = test
            .map(|t| (t.t_statistic, t.p_value))
            .unwrap_or((0.0, 1.0));

        let rows: Table<&RequestRecord> = requests.iter().collect();
        let arm_gmv = |v: Variant| {
            rows.filter(|r| r.variant() == v).sum_by(|r| r.order_value())
        };
        let arm_requests = |v: Variant| rows.count_where(|r| r.variant() == v);

        let summary = ExperimentSummary {
            control_ocr,
            treatment_ocr,
            lift: Self::lift(control_ocr, treatment_ocr),
            t_statistic,
            p_value,
            is_significant: p_value < SIGNIFICANCE_LEVEL,
            sample_size_windows: windows.len() as u64,
            control_windows: control.len() as u64,
            treatment_windows: treatment.len() as u64,
            total_rides: rows.count_where(|r| r.is_completed()),
            total_revenue: rows.sum_by(|r| r.order_value()),
            control_gmv: arm_gmv(Variant::Control),
            treatment_gmv: arm_gmv(Variant::Treatment),
            control_requests: arm_requests(Variant::Control),
            treatment_requests: arm_requests(Variant::Treatment),
        }
        .sanitized();

        tracing::info!(
            windows = summary.sample_size_windows,
            control_ocr = summary.control_ocr,
            treatment_ocr = summary.treatment_ocr,
            lift = summary.lift,
            p_value = summary.p_value,
            significant = summary.is_significant,
            "experiment analysed"
        );

        summary
    }

    /// Relative change from control to treatment; 0.0 if control is zero or undefined
    pub fn lift(control_mean: f64, treatment_mean: f64) -> f64 {
        if control_mean == 0.0 || !control_mean.is_finite() || !treatment_mean.is_finite() {
            return 0.0;
        }
        (treatment_mean - control_mean) / control_mean
    }
}
