//! Bootstrap estimate of the mean price over a filtered subset of listings.

use rental_stats::bootstrap::{self, BootstrapConfig, BootstrapResult, EstimateError};

use crate::{filter::FilterSpec, listing::Listing};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("query {filter} failed: {source}")]
pub struct QueryError {
    pub filter: String,
    pub source: EstimateError,
}

impl QueryError {
    /// Whether the query failed because no listing matched.
    #[must_use]
    pub fn is_empty_sample(&self) -> bool {
        self.source == EstimateError::EmptySample
    }
}

/// Selects the listings matching `filter` and estimates their mean price.
///
/// The empty filter uses the whole dataset. If nothing matches, the error
/// wraps [`EstimateError::EmptySample`].
///
/// # Examples
///
/// ```
/// use rental_analysis::{filter::FilterSpec, listing::Listing, query::query};
/// use rental_stats::bootstrap::BootstrapConfig;
///
/// # fn listing(price: f64, bedrooms: u32) -> Listing {
/// #     Listing {
/// #         price,
/// #         neighbourhood: "Ballard".into(),
/// #         bedrooms,
/// #         beds: bedrooms,
/// #         property_type: "House".into(),
/// #         room_type: "Entire home/apt".into(),
/// #         host_is_superhost: false,
/// #         summary: None,
/// #     }
/// # }
/// let listings = vec![listing(100.0, 1), listing(200.0, 2), listing(220.0, 2)];
/// let config = BootstrapConfig::default().with_seed(3);
///
/// let two_bedrooms: FilterSpec = "bedrooms=2".parse().unwrap();
/// let result = query(&listings, &two_bedrooms, &config).unwrap();
/// assert_eq!(result.sample_size, 2);
///
/// let none: FilterSpec = "bedrooms=5".parse().unwrap();
/// assert!(query(&listings, &none, &config).unwrap_err().is_empty_sample());
/// ```
pub fn query(
    listings: &[Listing],
    filter: &FilterSpec,
    config: &BootstrapConfig,
) -> Result<BootstrapResult, QueryError> {
    let prices = filter.prices(listings);
    tracing::debug!(%filter, matched = prices.len(), "running filtered query");
    bootstrap::estimate(&prices, config).map_err(|source| QueryError {
        filter: filter.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use rental_stats::bootstrap::InvalidParameterError;

    use super::*;
    use crate::{
        attribute::{Attribute, AttributeValue},
        listing::tests::listing,
    };

    fn config() -> BootstrapConfig {
        BootstrapConfig::default().with_seed(17)
    }

    #[test]
    fn test_empty_filter_equals_direct_estimate() {
        let prices = [10.0, 20.0, 30.0, 40.0, 50.0];
        let listings = prices
            .iter()
            .zip(["A", "B", "A", "C", "B"])
            .map(|(&p, n)| listing(p, n, 1, false))
            .collect::<Vec<_>>();

        let via_query = query(&listings, &FilterSpec::new(), &config()).unwrap();
        let direct = bootstrap::estimate(&prices, &config()).unwrap();
        assert_eq!(via_query, direct);
        assert_eq!(via_query.sample_size, 5);
        assert!(via_query.is_small_sample());
    }

    #[test]
    fn test_multiple_predicates_are_conjunctive() {
        let listings = vec![
            listing(100.0, "A", 2, true),
            listing(1000.0, "A", 2, false),
            listing(1000.0, "A", 3, true),
            listing(100.0, "B", 2, true),
        ];
        let filter = FilterSpec::new()
            .with(Attribute::Bedrooms, [AttributeValue::Count(2)])
            .with(Attribute::Superhost, [AttributeValue::Flag(true)]);

        let result = query(&listings, &filter, &config()).unwrap();
        assert_eq!(result.sample_size, 2);
        assert_eq!(result.point_estimate, 100.0);
        assert_eq!(result.upper_bound, 100.0);
    }

    #[test]
    fn test_no_match_is_empty_sample() {
        let listings = vec![listing(100.0, "A", 2, true)];
        let filter = FilterSpec::new().with(
            Attribute::Neighbourhood,
            [AttributeValue::Text("Z".into())],
        );
        let err = query(&listings, &filter, &config()).unwrap_err();
        assert!(err.is_empty_sample());
        assert_eq!(
            err.to_string(),
            "query neighbourhood=Z failed: no data matches the given criteria"
        );
    }

    #[test]
    fn test_invalid_parameters_are_reported() {
        let listings = vec![listing(100.0, "A", 2, true)];
        let config = BootstrapConfig {
            resample_count: 0,
            ..config()
        };
        let err = query(&listings, &FilterSpec::new(), &config).unwrap_err();
        assert_eq!(
            err.source,
            EstimateError::InvalidParameter(InvalidParameterError::ZeroResampleCount)
        );
    }
}
