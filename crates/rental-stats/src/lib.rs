//! Statistical core of the rental price analysis.
//!
//! - [`descriptive`]: summary statistics (mean, median, variance, ...) of a price set
//! - [`quantile`]: quantiles by linear interpolation between order statistics
//! - [`bootstrap`]: non-parametric bootstrap estimate of the mean with a
//!   percentile confidence interval
//!
//! # Examples
//!
//! ## Estimating a mean price
//!
//! ```
//! use rental_stats::bootstrap::{BootstrapConfig, BootstrapEstimator};
//!
//! let estimator = BootstrapEstimator::new(BootstrapConfig::default().with_seed(1)).unwrap();
//! let result = estimator.estimate(&[10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
//! assert!((result.point_estimate - 30.0).abs() < 2.0);
//! assert!(result.is_small_sample());
//! ```
//!
//! ## Summarizing prices
//!
//! ```
//! use rental_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
//! assert_eq!(stats.mean, 30.0);
//! ```

pub mod bootstrap;
pub mod descriptive;
pub mod quantile;
