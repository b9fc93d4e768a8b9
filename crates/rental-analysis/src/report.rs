//! Grouped bootstrap report
//!
//! Partitions listings by the values of one attribute, estimates the mean
//! price of every group independently, and ranks the groups by descending
//! point estimate.
//!
//! # Ranking
//!
//! Ranks are dense: the highest estimate gets rank 1, groups with equal
//! estimates share a rank, and the next distinct estimate gets the next
//! integer.
//!
//! # Failure isolation
//!
//! Groups without observations are excluded before estimation, and a group
//! whose estimation fails is excluded as well; neither aborts the report.
//! Only an invalid bootstrap configuration, which would fail every group,
//! fails the whole report.

use std::collections::BTreeMap;

use rental_stats::bootstrap::{self, BootstrapConfig, BootstrapResult, InvalidParameterError};
use serde::Serialize;

use crate::{
    attribute::{Attribute, AttributeValue},
    filter::FilterSpec,
    listing::Listing,
};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ReportError {
    #[display("invalid bootstrap parameter: {_0}")]
    InvalidParameter(InvalidParameterError),
}

/// One ranked row of a [`GroupedReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    /// Dense rank, 1 = highest point estimate.
    pub rank: usize,
    pub group: AttributeValue,
    pub result: BootstrapResult,
}

/// Mean price estimates per group, ordered by descending point estimate.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedReport {
    /// Attribute the listings were grouped by.
    pub attribute: Attribute,
    /// Filter applied before grouping.
    pub filter: FilterSpec,
    pub config: BootstrapConfig,
    pub entries: Vec<RankedGroup>,
    /// Groups left out of `entries` because they had no data or failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<AttributeValue>,
}

impl GroupedReport {
    /// Builds a report with one group per distinct value of `group_by`.
    pub fn build(
        listings: &[Listing],
        group_by: Attribute,
        config: &BootstrapConfig,
    ) -> Result<Self, ReportError> {
        Self::build_filtered(listings, group_by, &FilterSpec::new(), config)
    }

    /// Like [`Self::build`], but only over listings matching `filter`.
    pub fn build_filtered(
        listings: &[Listing],
        group_by: Attribute,
        filter: &FilterSpec,
        config: &BootstrapConfig,
    ) -> Result<Self, ReportError> {
        let groups = group_prices(filter.select(listings), group_by);
        Self::from_groups(group_by, filter, config, groups)
    }

    /// Builds a report over an explicit list of groups.
    ///
    /// Requested groups without any matching listing are excluded.
    pub fn build_for_values<I>(
        listings: &[Listing],
        group_by: Attribute,
        values: I,
        filter: &FilterSpec,
        config: &BootstrapConfig,
    ) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        let mut groups = values
            .into_iter()
            .map(|value| (value, vec![]))
            .collect::<BTreeMap<_, _>>();
        for listing in filter.select(listings) {
            if let Some(prices) = groups.get_mut(&listing.value(group_by)) {
                prices.push(listing.price);
            }
        }
        Self::from_groups(group_by, filter, config, groups)
    }

    fn from_groups(
        attribute: Attribute,
        filter: &FilterSpec,
        config: &BootstrapConfig,
        groups: BTreeMap<AttributeValue, Vec<f64>>,
    ) -> Result<Self, ReportError> {
        config.validate().map_err(ReportError::InvalidParameter)?;

        let mut estimates = vec![];
        let mut excluded = vec![];
        for (group, prices) in groups {
            if prices.is_empty() {
                tracing::debug!(%attribute, %group, "no listings in group, excluding");
                excluded.push(group);
                continue;
            }
            match bootstrap::estimate(&prices, &config.for_stream(group.stream_key())) {
                Ok(result) => {
                    if let Some(warning) = &result.warning {
                        tracing::warn!(%attribute, %group, "{warning}");
                    }
                    estimates.push((group, result));
                }
                Err(err) => {
                    tracing::warn!(%attribute, %group, "excluding group: {err}");
                    excluded.push(group);
                }
            }
        }

        Ok(Self {
            attribute,
            filter: filter.clone(),
            config: *config,
            entries: rank_descending(estimates),
            excluded,
        })
    }

    /// Returns the row of `group`, if it was estimated.
    #[must_use]
    pub fn get(&self, group: &AttributeValue) -> Option<&RankedGroup> {
        self.entries.iter().find(|e| e.group == *group)
    }
}

/// Collects the prices of `listings` per value of `attribute`.
pub fn group_prices<'a, I>(listings: I, attribute: Attribute) -> BTreeMap<AttributeValue, Vec<f64>>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut groups = BTreeMap::<_, Vec<f64>>::new();
    for listing in listings {
        groups
            .entry(listing.value(attribute))
            .or_default()
            .push(listing.price);
    }
    groups
}

fn rank_descending(mut estimates: Vec<(AttributeValue, BootstrapResult)>) -> Vec<RankedGroup> {
    estimates.sort_by(|(group_a, a), (group_b, b)| {
        b.point_estimate
            .total_cmp(&a.point_estimate)
            .then_with(|| group_a.cmp(group_b))
    });

    let mut rank = 0;
    let mut previous = None::<f64>;
    estimates
        .into_iter()
        .map(|(group, result)| {
            if previous.is_none_or(|p| p.total_cmp(&result.point_estimate).is_ne()) {
                rank += 1;
                previous = Some(result.point_estimate);
            }
            RankedGroup {
                rank,
                group,
                result,
            }
        })
        .collect()
}
