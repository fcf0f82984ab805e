use serde::{Deserialize, Serialize};

/// Result of analysing one switchback experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Mean window-level OCR in the control arm
    pub control_ocr: f64,
    /// Mean window-level OCR in the treatment arm
    pub treatment_ocr: f64,
    /// (treatment_ocr - control_ocr) / control_ocr, 0.0 when undefined
    pub lift: f64,
    /// Welch t statistic, 0.0 when the test was skipped
    pub t_statistic: f64,
    /// Two-tailed p-value, 1.0 when the test was skipped
    pub p_value: f64,
    pub is_significant: bool,

    pub sample_size_windows: u64,
    pub control_windows: u64,
    pub treatment_windows: u64,

    /// Completed requests across both arms
    pub total_rides: u64,
    /// Order value across both arms
    pub total_revenue: f64,
    pub control_gmv: f64,
    pub treatment_gmv: f64,
    pub control_requests: u64,
    pub treatment_requests: u64,
}

impl ExperimentSummary {
    /// Summary for an empty or failed run: rates 0.0, p-value 1.0, counts 0
    pub fn empty() -> Self {
        ExperimentSummary {
            control_ocr: 0.0,
            treatment_ocr: 0.0,
            lift: 0.0,
            t_statistic: 0.0,
            p_value: 1.0,
            is_significant: false,
            sample_size_windows: 0,
            control_windows: 0,
            treatment_windows: 0,
            total_rides: 0,
            total_revenue: 0.0,
            control_gmv: 0.0,
            treatment_gmv: 0.0,
            control_requests: 0,
            treatment_requests: 0,
        }
    }

    /// Replace any non-finite float with its documented safe default
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::empty();
        for (value, default) in [
            (&mut self.control_ocr, defaults.control_ocr),
            (&mut self.treatment_ocr, defaults.treatment_ocr),
            (&mut self.lift, defaults.lift),
            (&mut self.t_statistic, defaults.t_statistic),
            (&mut self.p_value, defaults.p_value),
            (&mut self.total_revenue, defaults.total_revenue),
            (&mut self.control_gmv, defaults.control_gmv),
            (&mut self.treatment_gmv, defaults.treatment_gmv),
        ] {
            if !value.is_finite() {
                *value = default;
            }
        }
        self
    }

    /// Whether every float field is a concrete finite number
    pub fn is_finite(&self) -> bool {
        [
            self.control_ocr,
            self.treatment_ocr,
            self.lift,
            self.t_statistic,
            self.p_value,
            self.total_revenue,
            self.control_gmv,
            self.treatment_gmv,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl Default for ExperimentSummary {
    fn default() -> Self {
        Self::empty()
    }
}
