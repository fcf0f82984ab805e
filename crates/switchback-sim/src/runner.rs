use serde::{Deserialize, Serialize};
use std::time::Instant;
use switchback_analysis::{analyze, diagnose, Diagnostics};
use switchback_types::{ExperimentSummary, RequestRecord, Result, WindowMetric};

use crate::{simulate, ExpectedOutcomes, Scenario, SimConfig};

/// Everything produced by one simulate + analyze pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimResult {
    pub scenario_name: String,
    pub requests: Vec<RequestRecord>,
    pub window_metrics: Vec<WindowMetric>,
    pub summary: ExperimentSummary,
    pub diagnostics: Diagnostics,
    pub runtime_ms: f64,
    pub passed: bool,
    pub failure_reasons: Vec<String>,
}

/// Runs the full pipeline: schedule, simulate, aggregate, infer
#[derive(Debug, Default)]
pub struct SimRunner;

impl SimRunner {
    pub fn new() -> Self {
        SimRunner
    }

    /// Run a scenario and check its expected outcomes
    pub fn run_scenario(&self, scenario: &Scenario) -> Result<SimResult> {
        let start = Instant::now();

        let requests = simulate(&scenario.config)?;
        let (summary, window_metrics) = analyze(&requests);
        let diagnostics = diagnose(&requests, &window_metrics, &summary);

        let failure_reasons = match &scenario.expected_outcomes {
            Some(expected) => Self::check_expected(expected, &summary, &diagnostics),
            None => Vec::new(),
        };

        let runtime_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            scenario = %scenario.name,
            requests = requests.len(),
            windows = window_metrics.len(),
            runtime_ms,
            passed = failure_reasons.is_empty(),
            "scenario complete"
        );

        Ok(SimResult {
            scenario_name: scenario.name.clone(),
            requests,
            window_metrics,
            summary,
            diagnostics,
            runtime_ms,
            passed: failure_reasons.is_empty(),
            failure_reasons,
        })
    }

    /// Run an ad-hoc configuration with no expectations
    pub fn run_config(&self, config: &SimConfig) -> Result<SimResult> {
        self.run_scenario(&Scenario::new("custom", "ad-hoc configuration", config.clone()))
    }

    fn check_expected(
        expected: &ExpectedOutcomes,
        summary: &ExperimentSummary,
        diagnostics: &Diagnostics,
    ) -> Vec<String> {
        let mut failure_reasons = Vec::new();

        if let Some(min_windows) = expected.min_windows {
            if summary.sample_size_windows < min_windows {
                failure_reasons.push(format!(
                    "Windows {} < expected {}",
                    summary.sample_size_windows, min_windows
                ));
            }
        }

        if let Some(min_rpw) = expected.min_requests_per_window {
            let total = summary.control_requests + summary.treatment_requests;
            let per_window = if summary.sample_size_windows > 0 {
                total as f64 / summary.sample_size_windows as f64
            } else {
                0.0
            };
            if per_window < min_rpw {
                failure_reasons.push(format!(
                    "Requests per window {:.2} < expected {:.2}",
                    per_window, min_rpw
                ));
            }
        }

        let control_price = diagnostics.control.mean_price_quoted;
        let price_ratio = if control_price > 0.0 {
            diagnostics.treatment.mean_price_quoted / control_price
        } else {
            0.0
        };

        if let Some(min_ratio) = expected.min_price_ratio {
            if price_ratio < min_ratio {
                failure_reasons.push(format!(
                    "Treatment/control price ratio {:.4} < expected {:.4}",
                    price_ratio, min_ratio
                ));
            }
        }

        if let Some(max_ratio) = expected.max_price_ratio {
            if price_ratio > max_ratio {
                failure_reasons.push(format!(
                    "Treatment/control price ratio {:.4} > expected {:.4}",
                    price_ratio, max_ratio
                ));
            }
        }

        failure_reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_horizon_scenario() {
        let runner = SimRunner::new();
        let result = runner.run_scenario(&Scenario::short_horizon()).unwrap();

        println!("Short horizon results:");
        println!("  Requests: {}", result.requests.len());
        println!("  Windows: {}", result.window_metrics.len());
        println!("  p-value: {:.4}", result.summary.p_value);

        assert!(result.passed, "{:?}", result.failure_reasons);
        assert_eq!(result.scenario_name, "short_horizon");
        assert!(result.summary.is_finite());
    }

    #[test]
    fn test_unmet_expectation_is_reported() {
        let scenario = Scenario::short_horizon().with_expected(ExpectedOutcomes {
            min_windows: Some(1_000),
            ..Default::default()
        });

        let result = SimRunner::new().run_scenario(&scenario).unwrap();

        assert!(!result.passed);
        assert_eq!(result.failure_reasons.len(), 1);
        assert!(result.failure_reasons[0].starts_with("Windows 48"));
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let config = SimConfig::for_days(0);
        assert!(SimRunner::new().run_config(&config).is_err());
    }
}
