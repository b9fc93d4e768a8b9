//! Non-parametric bootstrap estimation of a mean with a percentile interval.
//!
//! The estimator resamples the observations with replacement, records the
//! mean of every resample, and summarizes the resulting distribution of means:
//!
//! - the point estimate is the mean of the resample means
//! - the interval bounds are the `alpha / 2` and `1 - alpha / 2` quantiles of
//!   the resample means (linear interpolation, see [`quantile_sorted`])
//!
//! Every call owns its own generator. With a fixed seed the result is fully
//! reproducible; without one a fresh seed is drawn from the thread RNG.
//!
//! # Examples
//!
//! ```
//! use rental_stats::bootstrap::{BootstrapConfig, estimate};
//!
//! let prices = [85.0, 120.0, 99.0, 150.0, 75.0, 110.0, 95.0, 130.0];
//! let config = BootstrapConfig::default().with_seed(42);
//! let result = estimate(&prices, &config).unwrap();
//!
//! assert_eq!(result.sample_size, 8);
//! assert!(result.lower_bound <= result.upper_bound);
//! assert!(result.warning.is_none());
//! ```

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::{descriptive::mean, quantile::quantile_sorted};

/// Number of resampling trials used when none is configured.
pub const DEFAULT_RESAMPLE_COUNT: usize = 1000;

/// Two-sided significance level used when none is configured.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Observation counts up to and including this attach a [`SmallSampleWarning`].
pub const SMALL_SAMPLE_THRESHOLD: usize = 5;

/// Parameters of a bootstrap estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of resampling trials. Must be positive.
    pub resample_count: usize,
    /// Significance level of the `(1 - alpha)` two-sided interval, in `(0, 1)`.
    pub alpha: f64,
    /// Generator seed. `None` draws a fresh seed on every call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resample_count: DEFAULT_RESAMPLE_COUNT,
            alpha: DEFAULT_ALPHA,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Returns a copy of this configuration with a fixed generator seed.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Returns a copy of this configuration for an independent random stream.
    ///
    /// Used when one configuration drives several estimations (e.g. one per
    /// group): each stream gets its own seed derived from the base seed, so
    /// estimations never share a generator. Unseeded configurations stay
    /// unseeded.
    ///
    /// ```
    /// # use rental_stats::bootstrap::BootstrapConfig;
    /// let base = BootstrapConfig::default().with_seed(7);
    /// assert_ne!(base.for_stream(0).seed, base.for_stream(1).seed);
    /// assert_eq!(base.for_stream(3), base.for_stream(3));
    /// assert_eq!(BootstrapConfig::default().for_stream(3).seed, None);
    /// ```
    #[must_use]
    pub fn for_stream(self, stream: u64) -> Self {
        Self {
            seed: self.seed.map(|seed| splitmix64(seed ^ splitmix64(stream))),
            ..self
        }
    }

    /// Checks that the resample count and alpha are usable.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        if self.resample_count == 0 {
            return Err(InvalidParameterError::ZeroResampleCount);
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(InvalidParameterError::AlphaOutOfRange { alpha: self.alpha });
        }
        Ok(())
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidParameterError {
    #[display("resample count must be positive")]
    ZeroResampleCount,
    #[display("alpha must lie strictly between 0 and 1, got {alpha}")]
    AlphaOutOfRange { alpha: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EstimateError {
    #[display("no data matches the given criteria")]
    EmptySample,
    #[display("invalid bootstrap parameter: {_0}")]
    InvalidParameter(InvalidParameterError),
}

impl From<InvalidParameterError> for EstimateError {
    fn from(err: InvalidParameterError) -> Self {
        Self::InvalidParameter(err)
    }
}

/// Advisory attached to results computed from very few observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[display("only {sample_size} observation(s), at most {threshold}: interval is low-confidence")]
pub struct SmallSampleWarning {
    pub sample_size: usize,
    pub threshold: usize,
}

/// Outcome of one bootstrap estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    /// Mean of the resample means.
    pub point_estimate: f64,
    /// `alpha / 2` quantile of the resample means.
    pub lower_bound: f64,
    /// `1 - alpha / 2` quantile of the resample means.
    pub upper_bound: f64,
    /// Number of original observations (not the number of resamples).
    pub sample_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<SmallSampleWarning>,
}

impl BootstrapResult {
    #[must_use]
    pub fn is_small_sample(&self) -> bool {
        self.warning.is_some()
    }

    #[must_use]
    pub fn interval_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Bootstrap estimator of the population mean.
///
/// Construction validates the configuration, so [`Self::estimate`] only fails
/// on empty input.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapEstimator {
    config: BootstrapConfig,
}

impl BootstrapEstimator {
    pub fn new(config: BootstrapConfig) -> Result<Self, InvalidParameterError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Estimates the mean of `observations` with a generator owned by this call.
    pub fn estimate(&self, observations: &[f64]) -> Result<BootstrapResult, EstimateError> {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg64::seed_from_u64(seed);
        self.estimate_with_rng(observations, &mut rng)
    }

    /// Like [`Self::estimate`], but draws from the given generator.
    pub fn estimate_with_rng<R>(
        &self,
        observations: &[f64],
        rng: &mut R,
    ) -> Result<BootstrapResult, EstimateError>
    where
        R: Rng,
    {
        let n = observations.len();
        if n == 0 {
            return Err(EstimateError::EmptySample);
        }

        let mut trial_means = (0..self.config.resample_count)
            .map(|_| mean((0..n).map(|_| observations[rng.random_range(0..n)])))
            .collect::<Option<Vec<f64>>>()
            .ok_or(EstimateError::EmptySample)?;
        trial_means.sort_by(f64::total_cmp);

        let point_estimate = mean(trial_means.iter().copied()).ok_or(EstimateError::EmptySample)?;
        let half_alpha = self.config.alpha / 2.0;
        let lower_bound = quantile_sorted(&trial_means, half_alpha);
        let upper_bound = quantile_sorted(&trial_means, 1.0 - half_alpha);

        let warning = (n <= SMALL_SAMPLE_THRESHOLD).then_some(SmallSampleWarning {
            sample_size: n,
            threshold: SMALL_SAMPLE_THRESHOLD,
        });

        Ok(BootstrapResult {
            point_estimate,
            lower_bound,
            upper_bound,
            sample_size: n,
            warning,
        })
    }
}

/// Validates `config` and estimates the mean of `observations`.
///
/// Empty input is reported as [`EstimateError::EmptySample`] before the
/// parameters are looked at.
pub fn estimate(
    observations: &[f64],
    config: &BootstrapConfig,
) -> Result<BootstrapResult, EstimateError> {
    if observations.is_empty() {
        return Err(EstimateError::EmptySample);
    }
    BootstrapEstimator::new(*config)?.estimate(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICES: [f64; 5] = [10.0, 20.0, 30.0, 40.0, 50.0];

    fn seeded(resample_count: usize, seed: u64) -> BootstrapConfig {
        BootstrapConfig {
            resample_count,
            alpha: DEFAULT_ALPHA,
            seed: Some(seed),
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn variance(values: &[f64]) -> f64 {
        let m = values.iter().sum::<f64>() / values.len() as f64;
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_empty_sample_fails_for_any_parameters() {
        for resample_count in [0, 1, 10, 1000] {
            for alpha in [0.0, 0.01, 0.05, 0.5, 1.0] {
                let config = BootstrapConfig {
                    resample_count,
                    alpha,
                    seed: Some(1),
                };
                assert_eq!(estimate(&[], &config), Err(EstimateError::EmptySample));
            }
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let zero = BootstrapConfig {
            resample_count: 0,
            ..BootstrapConfig::default()
        };
        assert_eq!(
            estimate(&PRICES, &zero),
            Err(EstimateError::InvalidParameter(
                InvalidParameterError::ZeroResampleCount
            ))
        );

        for alpha in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let config = BootstrapConfig {
                alpha,
                ..BootstrapConfig::default()
            };
            assert!(matches!(
                estimate(&PRICES, &config),
                Err(EstimateError::InvalidParameter(
                    InvalidParameterError::AlphaOutOfRange { .. }
                ))
            ));
        }
    }

    #[test]
    fn test_single_observation_is_degenerate() {
        for x in [0.1, 42.0, 1234.5678] {
            let result = estimate(&[x], &seeded(1000, 3)).unwrap();
            assert_eq!(result.point_estimate, x);
            assert_eq!(result.lower_bound, x);
            assert_eq!(result.upper_bound, x);
            assert_eq!(result.sample_size, 1);
            assert!(result.is_small_sample());
        }
    }

    #[test]
    fn test_five_prices_estimate_near_sample_mean() {
        let result = estimate(&PRICES, &seeded(1000, 2024)).unwrap();
        assert!(
            (result.point_estimate - 30.0).abs() < 2.0,
            "{}",
            result.point_estimate
        );
        assert_eq!(result.sample_size, 5);
        assert!(result.lower_bound < 30.0 && 30.0 < result.upper_bound);
        assert!(result.lower_bound >= 10.0 && result.upper_bound <= 50.0);
        assert_eq!(
            result.warning,
            Some(SmallSampleWarning {
                sample_size: 5,
                threshold: SMALL_SAMPLE_THRESHOLD,
            })
        );
    }

    #[test]
    fn test_six_prices_carry_no_warning() {
        let prices = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let result = estimate(&prices, &seeded(1000, 5)).unwrap();
        assert!(!result.is_small_sample());
        assert_eq!(result.sample_size, 6);
    }

    #[test]
    fn test_bounds_are_ordered() {
        let samples: [&[f64]; 4] = [
            &[5.0, 5.0],
            &[1.0, 1000.0],
            &[99.0, 45.0, 300.0, 120.0, 80.0, 65.0],
            &PRICES,
        ];
        for (seed, observations) in (0..).zip(samples) {
            for resample_count in [1, 2, 50, 500] {
                let result = estimate(observations, &seeded(resample_count, seed)).unwrap();
                assert!(result.lower_bound <= result.upper_bound, "{result:?}");
                assert!(result.interval_width() >= 0.0);
            }
        }
    }

    #[test]
    fn test_point_estimate_variance_shrinks_with_resample_count() {
        let observations = [
            72.0, 150.0, 95.0, 60.0, 210.0, 120.0, 88.0, 99.0, 135.0, 79.0,
        ];
        let spread = |resample_count| {
            let estimates = (0..20)
                .map(|seed| {
                    estimate(&observations, &seeded(resample_count, seed))
                        .unwrap()
                        .point_estimate
                })
                .collect::<Vec<_>>();
            variance(&estimates)
        };

        let v1 = spread(1);
        let v100 = spread(100);
        let v10000 = spread(10_000);
        assert!(v1 > v100, "{v1} <= {v100}");
        assert!(v100 > v10000, "{v100} <= {v10000}");

        let sample_mean = mean(observations).unwrap();
        let converged = estimate(&observations, &seeded(10_000, 99)).unwrap();
        assert!((converged.point_estimate - sample_mean).abs() < 2.0);
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = estimate(&PRICES, &seeded(200, 11)).unwrap();
        let b = estimate(&PRICES, &seeded(200, 11)).unwrap();
        let c = estimate(&PRICES, &seeded(200, 12)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_narrower_interval_for_larger_alpha() {
        let wide = estimate(&PRICES, &seeded(2000, 8)).unwrap();
        let narrow = estimate(
            &PRICES,
            &BootstrapConfig {
                alpha: 0.5,
                ..seeded(2000, 8)
            },
        )
        .unwrap();
        assert!(narrow.interval_width() < wide.interval_width());
    }

    #[test]
    fn test_result_serialization_omits_missing_warning() {
        let result = estimate(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &seeded(10, 1)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sample_size"], 6);
        assert!(json.get("warning").is_none());

        let small = estimate(&PRICES[..2], &seeded(10, 1)).unwrap();
        let json = serde_json::to_value(&small).unwrap();
        assert_eq!(json["warning"]["sample_size"], 2);
    }
}
