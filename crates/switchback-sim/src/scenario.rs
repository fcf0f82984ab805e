use serde::{Deserialize, Serialize};

use crate::SimConfig;

/// Checks a scenario run is expected to satisfy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedOutcomes {
    /// Minimum number of analysed windows
    pub min_windows: Option<u64>,

    /// Minimum mean requests per window
    pub min_requests_per_window: Option<f64>,

    /// Minimum ratio of treatment to control mean quoted price
    pub min_price_ratio: Option<f64>,

    /// Maximum ratio of treatment to control mean quoted price
    pub max_price_ratio: Option<f64>,
}

/// Named, reproducible experiment setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub config: SimConfig,
    pub expected_outcomes: Option<ExpectedOutcomes>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, description: impl Into<String>, config: SimConfig) -> Self {
        Scenario {
            name: name.into(),
            description: description.into(),
            config,
            expected_outcomes: None,
        }
    }

    pub fn with_expected(mut self, expected: ExpectedOutcomes) -> Self {
        self.expected_outcomes = Some(expected);
        self
    }

    /// Two weeks of 30-minute windows, treatment quoted up to 10% higher
    pub fn default_scenario() -> Self {
        Self::new(
            "default",
            "14 days, 30-minute windows, uplift 1.10",
            SimConfig::default(),
        )
        .with_expected(ExpectedOutcomes {
            min_windows: Some(14 * 48),
            min_requests_per_window: Some(45.0),
            min_price_ratio: Some(1.02),
            max_price_ratio: Some(1.08),
        })
    }

    /// Treatment quoted at control prices; only acceptance behaviour differs
    pub fn no_surge() -> Self {
        Self::new(
            "no_surge",
            "Uplift 1.00: treatment prices match control",
            SimConfig::default().with_uplift(1.0),
        )
        .with_expected(ExpectedOutcomes {
            min_windows: Some(14 * 48),
            min_price_ratio: Some(0.97),
            max_price_ratio: Some(1.03),
            ..Default::default()
        })
    }

    /// Treatment quoted up to 50% higher
    pub fn aggressive_surge() -> Self {
        Self::new(
            "aggressive_surge",
            "Uplift 1.50: stress the price/conversion trade-off",
            SimConfig::default().with_uplift(1.5),
        )
        .with_expected(ExpectedOutcomes {
            min_price_ratio: Some(1.15),
            max_price_ratio: Some(1.35),
            ..Default::default()
        })
    }

    /// A single day: few windows per arm, inference is weak
    pub fn short_horizon() -> Self {
        Self::new(
            "short_horizon",
            "1 day of 30-minute windows",
            SimConfig::for_days(1),
        )
        .with_expected(ExpectedOutcomes {
            min_windows: Some(48),
            ..Default::default()
        })
    }

    pub fn all() -> Vec<Scenario> {
        vec![
            Self::default_scenario(),
            Self::no_surge(),
            Self::aggressive_surge(),
            Self::short_horizon(),
        ]
    }
}
