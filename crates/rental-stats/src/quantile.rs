/// Precomputed quantile values for a dataset.
///
/// Stores probability-value pairs for efficient lookup of commonly used
/// quantile points. Values are computed by linear interpolation between order
/// statistics (see [`quantile_sorted`]).
///
/// # Examples
///
/// ```
/// use rental_stats::quantile::Quantiles;
///
/// let values = vec![10.0, 20.0, 30.0, 40.0, 50.0];
/// let quantiles = Quantiles::new(&values, &[0.25, 0.5, 0.75]);
///
/// assert_eq!(quantiles.get(0.5), Some(30.0));
/// assert_eq!(quantiles.get(0.25), Some(20.0));
/// ```
#[derive(Debug, Clone, serde::Serialize)]
pub struct Quantiles {
    /// Probability-value pairs in the order requested.
    /// Each tuple contains (probability, value) where probability is 0.0-1.0.
    values: Vec<(f64, f64)>,
}

impl Quantiles {
    /// Computes quantiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], probabilities: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = probabilities
            .iter()
            .map(|&p| (p, quantile_sorted(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Computes quantiles from unsorted values.
    ///
    /// This method will sort a copy of the values before computing quantiles.
    #[must_use]
    pub fn new(values: &[f64], probabilities: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, probabilities)
    }

    /// Gets the value at a specific probability.
    ///
    /// Returns `None` if the probability was not precomputed.
    #[must_use]
    pub fn get(&self, probability: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - probability).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (probability, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single quantile from sorted data.
///
/// Uses linear interpolation between order statistics: for `n` values the
/// position is `h = (n - 1) * p`, and the result interpolates between the
/// values at `floor(h)` and `floor(h) + 1`. `p` is clamped to `[0, 1]`.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use rental_stats::quantile::quantile_sorted;
///
/// let values = [10.0, 20.0, 30.0, 40.0, 50.0];
/// assert_eq!(quantile_sorted(&values, 0.5), 30.0);
/// assert_eq!(quantile_sorted(&values, 0.125), 15.0);
/// assert_eq!(quantile_sorted(&values, 1.0), 50.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn quantile_sorted(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lower_idx = (h.floor() as usize).min(n - 1);
    let upper_idx = (lower_idx + 1).min(n - 1);
    let frac = h - h.floor();

    let lower = sorted_values[lower_idx];
    let upper = sorted_values[upper_idx];
    if frac == 0.0 {
        return lower;
    }
    lower + frac * (upper - lower)
}
