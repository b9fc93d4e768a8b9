/// Descriptive statistics summarizing a set of prices.
///
/// This structure contains common measures of central tendency and dispersion
/// for a dataset of `f64` values.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset, interpolated for even counts.
    pub median: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use rental_stats::descriptive::DescriptiveStats;
    /// let values = [50.0, 20.0, 40.0, 10.0, 30.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 10.0);
    /// assert_eq!(stats.max, 50.0);
    /// assert_eq!(stats.mean, 30.0);
    /// assert_eq!(stats.median, 30.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let mean = mean(sorted_values.iter().copied())?;
        let median = crate::quantile::quantile_sorted(sorted_values, 0.5);
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / count as f64;
        let std_dev = variance.sqrt();

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
        })
    }
}

/// Arithmetic mean computed as a running average.
///
/// Each value moves the running mean by `(value - mean) / k`, so a sequence of
/// identical values yields that value exactly, without summation rounding.
///
/// Returns `None` for an empty sequence.
///
/// # Examples
///
/// ```
/// # use rental_stats::descriptive::mean;
/// assert_eq!(mean([0.1; 1000]), Some(0.1));
/// assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(mean(std::iter::empty()), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0_usize;
    let mut mean = 0.0;
    for value in values {
        count += 1;
        mean += (value - mean) / count as f64;
    }
    (count > 0).then_some(mean)
}
