//! Shared checks for end-to-end pipeline tests

use switchback_types::{ExperimentSummary, RequestRecord, Variant, WindowMetric};

/// Cross-check a summary against the tables it was computed from.
///
/// Returns one message per inconsistency; empty means consistent.
pub fn summary_violations(
    summary: &ExperimentSummary,
    metrics: &[WindowMetric],
    requests: &[RequestRecord],
) -> Vec<String> {
    let mut violations = Vec::new();
    let mut check = |ok: bool, msg: String| {
        if !ok {
            violations.push(msg);
        }
    };

    let arm_windows = |v: Variant| metrics.iter().filter(|m| m.variant == v).count() as u64;
    let arm_requests = |v: Variant| requests.iter().filter(|r| r.variant() == v).count() as u64;
    let completed = requests.iter().filter(|r| r.is_completed()).count() as u64;
    let revenue: f64 = requests.iter().map(|r| r.order_value()).sum();

    check(summary.is_finite(), "summary has non-finite fields".to_string());
    check(
        summary.sample_size_windows == metrics.len() as u64,
        format!("sample_size_windows {} != {}", summary.sample_size_windows, metrics.len()),
    );
    check(
        summary.control_windows == arm_windows(Variant::Control),
        format!("control_windows {}", summary.control_windows),
    );
    check(
        summary.treatment_windows == arm_windows(Variant::Treatment),
        format!("treatment_windows {}", summary.treatment_windows),
    );
    check(
        summary.control_requests == arm_requests(Variant::Control),
        format!("control_requests {}", summary.control_requests),
    );
    check(
        summary.treatment_requests == arm_requests(Variant::Treatment),
        format!("treatment_requests {}", summary.treatment_requests),
    );
    check(
        summary.total_rides == completed,
        format!("total_rides {} != {}", summary.total_rides, completed),
    );
    check(
        (summary.total_revenue - revenue).abs() < 1e-6,
        format!("total_revenue {} != {}", summary.total_revenue, revenue),
    );
    check(
        (0.0..=1.0).contains(&summary.p_value),
        format!("p_value {} outside [0, 1]", summary.p_value),
    );
    check(
        summary.is_significant == (summary.p_value < 0.05),
        format!("is_significant {} with p {}", summary.is_significant, summary.p_value),
    );

    violations
}
