use serde::{Deserialize, Serialize};
use switchback_analysis::RevenueReport;
use switchback_types::{ExperimentSummary, RequestRecord, WindowMetric};

const WINDOW_START_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of the window-level table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMetricView {
    pub window_start: String,
    pub variant: String,
    pub request_count: u64,
    pub completed_count: u64,
    pub order_value_sum: f64,
    /// `null` when the window had no requests
    pub ocr: Option<f64>,
    pub avg_gmv: Option<f64>,
}

impl From<&WindowMetric> for WindowMetricView {
    fn from(m: &WindowMetric) -> Self {
        WindowMetricView {
            window_start: m.window_start.format(WINDOW_START_FORMAT).to_string(),
            variant: m.variant.as_str().to_string(),
            request_count: m.request_count,
            completed_count: m.completed_count,
            order_value_sum: m.order_value_sum,
            ocr: finite(m.ocr),
            avg_gmv: finite(m.avg_gmv),
        }
    }
}

/// One raw request row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestView {
    pub request_id: String,
    pub timestamp: String,
    pub window_start: String,
    pub variant: String,
    pub price_quoted: f64,
    pub driver_found: bool,
    pub user_accepted: bool,
    pub is_completed: bool,
    pub order_value: f64,
}

impl From<&RequestRecord> for RequestView {
    fn from(r: &RequestRecord) -> Self {
        RequestView {
            request_id: r.request_id().to_string(),
            timestamp: r.timestamp().to_rfc3339(),
            window_start: r.window_start().to_rfc3339(),
            variant: r.variant().as_str().to_string(),
            price_quoted: r.price_quoted(),
            driver_found: r.driver_found(),
            user_accepted: r.user_accepted(),
            is_completed: r.is_completed(),
            order_value: r.order_value(),
        }
    }
}

/// Body of a successful `/run-simulation` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub summary: ExperimentSummary,
    pub revenue: RevenueReport,
    pub window_metrics: Vec<WindowMetricView>,
    pub raw_data_sample: Vec<RequestView>,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use switchback_types::{RequestId, Variant};

    #[test]
    fn test_window_view_formats_start() {
        let start = Utc.with_ymd_and_hms(2024, 1, 3, 17, 30, 0).unwrap();
        let view = WindowMetricView::from(&WindowMetric::from_counts(start, Variant::Treatment, 4, 3, 30.0));

        assert_eq!(view.window_start, "2024-01-03 17:30");
        assert_eq!(view.variant, "Treatment");
        assert_eq!(view.ocr, Some(0.75));
        assert_eq!(view.avg_gmv, Some(7.5));
    }

    #[test]
    fn test_empty_window_ratios_are_null() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let view = WindowMetricView::from(&WindowMetric::from_counts(start, Variant::Control, 0, 0, 0.0));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["ocr"].is_null());
        assert!(json["avg_gmv"].is_null());
    }

    #[test]
    fn test_request_view_uses_rfc3339() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let record = RequestRecord::new(
            RequestId::new("r-1"),
            start + chrono::Duration::seconds(75),
            start,
            Variant::Control,
            12.5,
            true,
            false,
        );

        let view = RequestView::from(&record);
        assert_eq!(view.request_id, "r-1");
        assert_eq!(view.timestamp, "2024-01-01T08:01:15+00:00");
        assert!(!view.is_completed);
        assert_eq!(view.order_value, 0.0);
    }
}
