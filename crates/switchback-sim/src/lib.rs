mod config;
mod schedule;
mod generator;
mod scenario;
mod runner;

pub use config::{ArmBehavior, MarketParams, SimConfig, MAX_EXPECTED_REQUESTS};
pub use schedule::{generate_schedule, schedule_end, window_count, MAX_WINDOWS};
pub use generator::MarketplaceSimulator;
pub use scenario::{ExpectedOutcomes, Scenario};
pub use runner::{SimResult, SimRunner};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use switchback_types::{RequestRecord, Result};

/// Build a schedule and simulate every request in it.
///
/// The generator is seeded from `config.random_seed`, or from OS entropy when
/// no seed is given. Configuration is validated before any sampling.
pub fn simulate(config: &SimConfig) -> Result<Vec<RequestRecord>> {
    let mut rng = match config.random_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    simulate_with_rng(config, &mut rng)
}

/// Same as [`simulate`] with a caller-owned generator
pub fn simulate_with_rng<R: Rng + ?Sized>(
    config: &SimConfig,
    rng: &mut R,
) -> Result<Vec<RequestRecord>> {
    config.validate()?;

    let simulator = MarketplaceSimulator::new(
        config.market.clone(),
        config.uplift_factor,
        config.window_length_minutes,
    )?;
    let schedule = generate_schedule(
        config.start,
        config.horizon_days,
        config.window_length_minutes,
        rng,
    )?;

    Ok(simulator.simulate(&schedule, rng))
}
