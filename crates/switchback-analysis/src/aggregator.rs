use switchback_types::{RequestRecord, WindowMetric};

use crate::Table;

#[derive(Debug, Default)]
struct WindowTotals {
    requests: u64,
    completed: u64,
    order_value: f64,
}

/// Aggregate requests into one metric row per (window_start, variant).
///
/// Rows are ordered by window start, control before treatment within a
/// window.
pub fn aggregate_windows(requests: &[RequestRecord]) -> Vec<WindowMetric> {
    let table: Table<&RequestRecord> = requests.iter().collect();

    let metrics: Vec<WindowMetric> = table
        .group_reduce(
            |r| (r.window_start(), r.variant()),
            WindowTotals::default,
            |acc, r| {
                acc.requests += 1;
                if r.is_completed() {
                    acc.completed += 1;
                }
                acc.order_value += r.order_value();
            },
        )
        .into_iter()
        .map(|((window_start, variant), totals)| {
            WindowMetric::from_counts(
                window_start,
                variant,
                totals.requests,
                totals.completed,
                totals.order_value,
            )
        })
        .collect();

    tracing::debug!(
        requests = requests.len(),
        windows = metrics.len(),
        "aggregated requests into windows"
    );

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use switchback_types::{RequestId, Variant};

    fn window(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(30 * i)
    }

    fn req(id: &str, w: i64, variant: Variant, price: f64, completed: bool) -> RequestRecord {
        RequestRecord::new(
            RequestId::new(id),
            window(w) + Duration::minutes(3),
            window(w),
            variant,
            price,
            completed,
            true,
        )
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(aggregate_windows(&[]).is_empty());
    }

    #[test]
    fn test_counts_and_ratios_per_window() {
        let requests = vec![
            req("a", 1, Variant::Treatment, 10.0, true),
            req("b", 0, Variant::Control, 8.0, true),
            req("c", 0, Variant::Control, 6.0, false),
            req("d", 1, Variant::Treatment, 12.0, true),
            req("e", 0, Variant::Control, 4.0, true),
        ];

        let metrics = aggregate_windows(&requests);
        assert_eq!(metrics.len(), 2);

        let first = &metrics[0];
        assert_eq!(first.window_start, window(0));
        assert_eq!(first.variant, Variant::Control);
        assert_eq!(first.request_count, 3);
        assert_eq!(first.completed_count, 2);
        assert!((first.order_value_sum - 12.0).abs() < 1e-12);
        assert!((first.ocr - 2.0 / 3.0).abs() < 1e-12);
        assert!((first.avg_gmv - 4.0).abs() < 1e-12);

        let second = &metrics[1];
        assert_eq!(second.window_start, window(1));
        assert_eq!(second.variant, Variant::Treatment);
        assert_eq!(second.ocr, 1.0);
        assert!((second.avg_gmv - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_output_sorted_by_window_start() {
        let requests: Vec<_> = [5, 2, 9, 0, 2]
            .iter()
            .enumerate()
            .map(|(i, w)| req(&i.to_string(), *w, Variant::Control, 5.0, true))
            .collect();

        let starts: Vec<_> = aggregate_windows(&requests).iter().map(|m| m.window_start).collect();
        assert_eq!(starts, vec![window(0), window(2), window(5), window(9)]);
    }
}
