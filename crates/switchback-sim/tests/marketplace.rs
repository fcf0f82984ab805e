use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::collections::HashSet;
use switchback_sim::{generate_schedule, simulate, MarketplaceSimulator, MarketParams, Scenario, SimConfig, SimRunner};
use switchback_types::Variant;

fn mean_treatment_price(config: &SimConfig) -> f64 {
    let prices: Vec<f64> = simulate(config)
        .unwrap()
        .iter()
        .filter(|r| r.variant() == Variant::Treatment)
        .map(|r| r.price_quoted())
        .collect();
    prices.iter().sum::<f64>() / prices.len() as f64
}

/// Record-level invariants over a full two-week run
#[test]
fn test_request_invariants_hold() {
    println!("\n━━━ Marketplace invariants (14 days) ━━━");

    let config = SimConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let schedule = generate_schedule(config.start, config.horizon_days, config.window_length_minutes, &mut rng).unwrap();
    let simulator = MarketplaceSimulator::new(config.market.clone(), config.uplift_factor, 30).unwrap();
    let requests = simulator.simulate(&schedule, &mut rng);

    let assigned: HashMap<_, _> = schedule.iter().map(|w| (w.window_start, w.variant)).collect();
    let mut ids = HashSet::new();

    for r in &requests {
        assert_eq!(Some(&r.variant()), assigned.get(&r.window_start()), "cross-contaminated request");
        assert_eq!(r.is_completed(), r.driver_found() && r.user_accepted());
        if r.is_completed() {
            assert_eq!(r.order_value(), r.price_quoted());
        } else {
            assert_eq!(r.order_value(), 0.0);
        }
        assert!(r.price_quoted() > 0.0);
        assert!(r.timestamp() >= r.window_start());
        assert!(r.timestamp() < r.window_start() + Duration::minutes(30));
        assert!(ids.insert(r.request_id().clone()), "duplicate id {}", r.request_id());
    }

    println!("  {} requests across {} windows", requests.len(), schedule.len());
    println!("✅ Invariants: PASSED\n");
}

/// Outcome rates track the configured arm probabilities
#[test]
fn test_arm_rates_follow_market_params() {
    let requests = simulate(&SimConfig::default()).unwrap();

    for (variant, driver_p, user_p) in [(Variant::Control, 0.75, 0.75), (Variant::Treatment, 0.85, 0.70)] {
        let arm: Vec<_> = requests.iter().filter(|r| r.variant() == variant).collect();
        let n = arm.len() as f64;
        let driver_rate = arm.iter().filter(|r| r.driver_found()).count() as f64 / n;
        let user_rate = arm.iter().filter(|r| r.user_accepted()).count() as f64 / n;
        let completion = arm.iter().filter(|r| r.is_completed()).count() as f64 / n;

        println!("  {}: driver {:.3}, user {:.3}, completed {:.3}", variant, driver_rate, user_rate, completion);

        assert!((driver_rate - driver_p).abs() < 0.02);
        assert!((user_rate - user_p).abs() < 0.02);
        assert!((completion - driver_p * user_p).abs() < 0.02);
    }
}

/// Higher uplift never lowers treatment prices under a fixed seed
#[test]
fn test_uplift_monotonicity() {
    let mut previous = 0.0;

    for uplift in [1.0, 1.05, 1.1, 1.2, 1.35, 1.5] {
        let config = SimConfig::for_days(3).with_seed(Some(9)).with_uplift(uplift);
        let mean = mean_treatment_price(&config);
        println!("  uplift {:.2}: mean treatment price {:.4}", uplift, mean);

        assert!(mean >= previous, "uplift {} lowered mean price to {}", uplift, mean);
        previous = mean;
    }
}

#[test]
fn test_uplift_only_moves_treatment_prices() {
    let low = simulate(&SimConfig::for_days(2).with_uplift(1.05)).unwrap();
    let high = simulate(&SimConfig::for_days(2).with_uplift(1.4)).unwrap();

    assert_eq!(low.len(), high.len());
    for (a, b) in low.iter().zip(&high) {
        assert_eq!(a.variant(), b.variant());
        assert_eq!(a.request_id(), b.request_id());
        match a.variant() {
            Variant::Control => assert_eq!(a.price_quoted(), b.price_quoted()),
            Variant::Treatment => assert!(b.price_quoted() >= a.price_quoted()),
        }
    }
}

#[test]
fn test_peak_windows_draw_more_demand() {
    let params = MarketParams {
        demand_std_dev: 0.0,
        ..MarketParams::default()
    };
    let config = SimConfig {
        market: params,
        ..SimConfig::for_days(1)
    };
    let requests = simulate(&config).unwrap();

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let count_at = |hour: i64| {
        requests
            .iter()
            .filter(|r| r.window_start() == start + Duration::hours(hour))
            .count()
    };

    assert_eq!(count_at(9), 50);
    assert_eq!(count_at(17), 75);
    assert_eq!(count_at(19), 75);
    assert_eq!(count_at(20), 50);
}

/// Every preset meets its own expectations
#[test]
fn test_all_scenarios_pass() {
    let runner = SimRunner::new();

    for scenario in Scenario::all() {
        println!("\n━━━ SCENARIO: {} ━━━", scenario.name);
        let result = runner.run_scenario(&scenario).unwrap();

        println!("  Requests: {}", result.requests.len());
        println!("  Control OCR: {:.4}", result.summary.control_ocr);
        println!("  Treatment OCR: {:.4}", result.summary.treatment_ocr);
        println!("  Lift: {:.4}", result.summary.lift);
        println!("  p-value: {:.5}", result.summary.p_value);
        println!("  Status: {}", if result.passed { "✅ PASS" } else { "❌ FAIL" });

        assert!(result.passed, "{}: {:?}", scenario.name, result.failure_reasons);
        assert!(result.summary.is_finite());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_schedule_covers_horizon(days in 1u32..8, window in prop::sample::select(vec![5u32, 10, 15, 20, 30, 45, 60, 90, 120]), seed in any::<u64>()) {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let schedule = generate_schedule(start, days, window, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(schedule.len() as u64, days as u64 * 24 * 60 / window as u64);
        prop_assert_eq!(schedule[0].window_start, start);
        for pair in schedule.windows(2) {
            prop_assert_eq!(pair[1].window_start - pair[0].window_start, Duration::minutes(window as i64));
        }
    }

    #[test]
    fn prop_simulated_records_consistent(seed in any::<u64>(), uplift in 1.0f64..2.0) {
        let config = SimConfig::for_days(1).with_seed(Some(seed)).with_uplift(uplift).with_window_minutes(60);
        let requests = simulate(&config).unwrap();

        for r in &requests {
            prop_assert_eq!(r.order_value() != 0.0, r.is_completed());
            prop_assert!(r.price_quoted() >= 5.0);
            prop_assert!(r.price_quoted() <= 20.0 * uplift + 0.01);
            if r.variant() == Variant::Control {
                prop_assert!(r.price_quoted() <= 20.0);
            }
        }
    }
}
