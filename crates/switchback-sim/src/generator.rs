use chrono::{Duration, Timelike};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Normal, Uniform};
use switchback_types::{RequestId, RequestRecord, Result, SwitchbackError, Variant, WindowAssignment};

use crate::config::{ArmBehavior, MarketParams};

/// Bernoulli draws for one arm's acceptance decisions
#[derive(Debug, Clone, Copy)]
struct ArmSampler {
    driver_found: Bernoulli,
    user_accepted: Bernoulli,
}

impl ArmSampler {
    fn new(arm: &ArmBehavior) -> Result<Self> {
        let bernoulli = |p: f64| {
            Bernoulli::new(p).map_err(|e| SwitchbackError::InvalidMarketParams(format!("probability {}: {}", p, e)))
        };
        Ok(ArmSampler {
            driver_found: bernoulli(arm.driver_accept_prob)?,
            user_accepted: bernoulli(arm.user_convert_prob)?,
        })
    }
}

/// Request-level marketplace generator for a switchback schedule
#[derive(Debug, Clone)]
pub struct MarketplaceSimulator {
    params: MarketParams,
    uplift_factor: f64,
    window_secs: i64,
    demand_noise: Normal<f64>,
    base_price: Uniform<f64>,
    surge: Uniform<f64>,
    control: ArmSampler,
    treatment: ArmSampler,
}

impl MarketplaceSimulator {
    /// Validate parameters and prepare the sampling distributions
    pub fn new(params: MarketParams, uplift_factor: f64, window_minutes: u32) -> Result<Self> {
        params.validate()?;
        if !uplift_factor.is_finite() || uplift_factor < 1.0 {
            return Err(SwitchbackError::InvalidUplift(uplift_factor));
        }
        if window_minutes == 0 {
            return Err(SwitchbackError::InvalidWindowLength(window_minutes));
        }

        let demand_noise = Normal::new(0.0, params.demand_std_dev)
            .map_err(|e| SwitchbackError::InvalidMarketParams(format!("demand std-dev: {}", e)))?;
        let (low, high) = params.base_price_range;

        Ok(MarketplaceSimulator {
            uplift_factor,
            window_secs: window_minutes as i64 * 60,
            demand_noise,
            base_price: Uniform::new_inclusive(low, high),
            surge: Uniform::new_inclusive(1.0, uplift_factor),
            control: ArmSampler::new(&params.control)?,
            treatment: ArmSampler::new(&params.treatment)?,
            params,
        })
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn uplift_factor(&self) -> f64 {
        self.uplift_factor
    }

    /// Expected request count for a window starting at `hour` (UTC)
    pub fn expected_demand(&self, hour: u32) -> f64 {
        if self.params.is_peak_hour(hour) {
            self.params.base_demand_per_window * self.params.peak_multiplier
        } else {
            self.params.base_demand_per_window
        }
    }

    /// Generate every request for every window in `schedule`.
    ///
    /// Records inherit their window's variant and start; records for one
    /// window are contiguous and windows keep schedule order.
    pub fn simulate<R: Rng + ?Sized>(&self, schedule: &[WindowAssignment], rng: &mut R) -> Vec<RequestRecord> {
        let mut requests = Vec::new();

        for window in schedule {
            let demand = self.draw_demand(window.window_start.hour(), rng);
            requests.reserve(demand as usize);

            for _ in 0..demand {
                requests.push(self.draw_request(window, rng));
            }
        }

        tracing::debug!(
            windows = schedule.len(),
            requests = requests.len(),
            uplift_factor = self.uplift_factor,
            "simulated marketplace requests"
        );

        requests
    }

    /// Realised demand: N(expected, sd) clamped at zero and rounded
    fn draw_demand<R: Rng + ?Sized>(&self, hour: u32, rng: &mut R) -> u64 {
        let realised = self.expected_demand(hour) + self.demand_noise.sample(rng);
        realised.max(0.0).round() as u64
    }

    fn draw_request<R: Rng + ?Sized>(&self, window: &WindowAssignment, rng: &mut R) -> RequestRecord {
        let mut price = self.base_price.sample(rng);
        if window.variant.is_treatment() {
            price *= self.surge.sample(rng);
        }

        let arm = match window.variant {
            Variant::Control => &self.control,
            Variant::Treatment => &self.treatment,
        };
        let driver_found = arm.driver_found.sample(rng);
        let user_accepted = arm.user_accepted.sample(rng);

        let offset = Duration::seconds(rng.gen_range(0..self.window_secs));
        let request_id = RequestId::from_random_bytes(rng.gen());

        RequestRecord::new(
            request_id,
            window.window_start + offset,
            window.window_start,
            window.variant,
            round_cents(price),
            driver_found,
            user_accepted,
        )
    }
}

fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
