use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

/// Welch's unequal-variance two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom (fractional)
    pub degrees_of_freedom: f64,
    /// Two-tailed p-value
    pub p_value: f64,
}

impl WelchTest {
    /// Test H0: mean(a) == mean(b).
    ///
    /// Returns `None` when the test is undefined: fewer than two observations
    /// in either sample, non-finite input, or zero standard error.
    pub fn run(a: &[f64], b: &[f64]) -> Option<WelchTest> {
        if a.len() < 2 || b.len() < 2 {
            return None;
        }
        if a.iter().chain(b).any(|x| !x.is_finite()) {
            return None;
        }

        let (n_a, n_b) = (a.len() as f64, b.len() as f64);
        let (mean_a, mean_b) = (a.mean(), b.mean());
        let se_a = a.variance() / n_a;
        let se_b = b.variance() / n_b;
        let se_sq = se_a + se_b;

        if se_sq <= 0.0 || !se_sq.is_finite() {
            return None;
        }

        let t_statistic = (mean_a - mean_b) / se_sq.sqrt();
        let degrees_of_freedom =
            se_sq * se_sq / (se_a * se_a / (n_a - 1.0) + se_b * se_b / (n_b - 1.0));

        if !t_statistic.is_finite() || !degrees_of_freedom.is_finite() || degrees_of_freedom <= 0.0 {
            return None;
        }

        let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).ok()?;
        let p_value = (2.0 * dist.sf(t_statistic.abs())).clamp(0.0, 1.0);

        Some(WelchTest {
            t_statistic,
            degrees_of_freedom,
            p_value,
        })
    }
}
