use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use switchback_types::{Result, SwitchbackError, Variant};

use crate::schedule::{schedule_end, window_count};

/// Most requests a single run may be expected to generate
pub const MAX_EXPECTED_REQUESTS: u64 = 5_000_000;

/// Acceptance probabilities for one experiment arm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmBehavior {
    /// P(a driver accepts the quoted request)
    pub driver_accept_prob: f64,
    /// P(the rider accepts the quoted price)
    pub user_convert_prob: f64,
}

/// Marketplace behaviour shared by every window of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketParams {
    /// Expected requests per window outside peak hours
    pub base_demand_per_window: f64,

    /// Std-dev of realised demand around the expectation
    pub demand_std_dev: f64,

    /// Inclusive UTC hour range treated as peak, e.g. (17, 19)
    pub peak_hours: (u32, u32),

    /// Demand multiplier for windows starting in peak hours
    pub peak_multiplier: f64,

    /// Base price range before surge
    pub base_price_range: (f64, f64),

    pub control: ArmBehavior,

    /// Surged prices find drivers more often but convert fewer riders
    pub treatment: ArmBehavior,
}

impl Default for MarketParams {
    fn default() -> Self {
        MarketParams {
            base_demand_per_window: 50.0,
            demand_std_dev: 10.0,
            peak_hours: (17, 19),
            peak_multiplier: 1.5,
            base_price_range: (5.0, 20.0),
            control: ArmBehavior {
                driver_accept_prob: 0.75,
                user_convert_prob: 0.75,
            },
            treatment: ArmBehavior {
                driver_accept_prob: 0.85,
                user_convert_prob: 0.70,
            },
        }
    }
}

impl MarketParams {
    pub fn arm(&self, variant: Variant) -> &ArmBehavior {
        match variant {
            Variant::Control => &self.control,
            Variant::Treatment => &self.treatment,
        }
    }

    pub fn is_peak_hour(&self, hour: u32) -> bool {
        let (from, to) = self.peak_hours;
        from <= hour && hour <= to
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SwitchbackError::InvalidMarketParams(msg));

        if !self.base_demand_per_window.is_finite() || self.base_demand_per_window < 0.0 {
            return invalid(format!("base demand {} must be >= 0", self.base_demand_per_window));
        }
        if !self.demand_std_dev.is_finite() || self.demand_std_dev < 0.0 {
            return invalid(format!("demand std-dev {} must be >= 0", self.demand_std_dev));
        }
        if !self.peak_multiplier.is_finite() || self.peak_multiplier <= 0.0 {
            return invalid(format!("peak multiplier {} must be > 0", self.peak_multiplier));
        }

        let (from, to) = self.peak_hours;
        if from > to || to > 23 {
            return invalid(format!("peak hours ({}, {}) must satisfy from <= to <= 23", from, to));
        }

        let (low, high) = self.base_price_range;
        if !low.is_finite() || !high.is_finite() || low <= 0.0 || low > high {
            return invalid(format!("price range ({}, {}) must satisfy 0 < low <= high", low, high));
        }

        for variant in Variant::all() {
            let arm = self.arm(*variant);
            for (name, p) in [
                ("driver_accept_prob", arm.driver_accept_prob),
                ("user_convert_prob", arm.user_convert_prob),
            ] {
                if !(0.0..=1.0).contains(&p) {
                    return invalid(format!("{} {} for {} must be in [0, 1]", name, p, variant));
                }
            }
        }

        Ok(())
    }
}

/// Parameters of one simulated switchback experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub horizon_days: u32,
    pub window_length_minutes: u32,

    /// Upper bound of the treatment surge multiplier; 1.0 disables surge
    pub uplift_factor: f64,

    /// Seed for reproducible runs; `None` draws from OS entropy
    pub random_seed: Option<u64>,

    /// Start of the first window
    pub start: DateTime<Utc>,

    pub market: MarketParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            horizon_days: 14,
            window_length_minutes: 30,
            uplift_factor: 1.1,
            random_seed: Some(42),
            start: default_start(),
            market: MarketParams::default(),
        }
    }
}

/// 2024-01-01T00:00:00Z
pub(crate) fn default_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

impl SimConfig {
    /// Default configuration over `days` days
    pub fn for_days(days: u32) -> Self {
        SimConfig {
            horizon_days: days,
            ..Default::default()
        }
    }

    pub fn with_uplift(mut self, uplift_factor: f64) -> Self {
        self.uplift_factor = uplift_factor;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_window_minutes(mut self, minutes: u32) -> Self {
        self.window_length_minutes = minutes;
        self
    }

    /// Number of windows this configuration schedules
    pub fn window_count(&self) -> u64 {
        window_count(self.horizon_days, self.window_length_minutes)
    }

    /// Reject configurations before any simulation work starts
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(SwitchbackError::InvalidHorizon(self.horizon_days));
        }
        if self.window_length_minutes == 0 {
            return Err(SwitchbackError::InvalidWindowLength(self.window_length_minutes));
        }
        if !self.uplift_factor.is_finite() || self.uplift_factor < 1.0 {
            return Err(SwitchbackError::InvalidUplift(self.uplift_factor));
        }
        schedule_end(self.start, self.horizon_days, self.window_length_minutes)?;
        self.market.validate()?;

        let expected_requests = self.expected_requests_bound();
        if expected_requests > MAX_EXPECTED_REQUESTS as f64 {
            return Err(SwitchbackError::DemandTooLarge {
                expected_requests: expected_requests as u64,
                max_requests: MAX_EXPECTED_REQUESTS,
            });
        }
        Ok(())
    }

    /// Generous upper estimate of total requests: every window at peak
    /// demand plus six standard deviations
    fn expected_requests_bound(&self) -> f64 {
        let m = &self.market;
        let per_window = m.base_demand_per_window * m.peak_multiplier.max(1.0) + 6.0 * m.demand_std_dev;
        per_window * self.window_count() as f64
    }
}
