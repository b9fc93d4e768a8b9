//! Declarative listing filters
//!
//! A [`FilterSpec`] maps attributes to the set of accepted values:
//!
//! - attributes are combined with logical AND
//! - values of one attribute are combined with logical OR
//! - an attribute that is absent is unrestricted, so the empty spec selects
//!   every listing
//!
//! As JSON, a spec is an object keyed by attribute name:
//!
//! ```json
//! { "bedrooms": [2, 3], "superhost": [true] }
//! ```
//!
//! Values are checked against their attribute when deserialized. Text is
//! parsed like a command-line token (`"2"`, `"t"`), and any other kind
//! mismatch such as `{"neighbourhood": [true]}` is rejected.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{
    attribute::{Attribute, AttributeValue, ParseFilterError},
    listing::Listing,
};

/// Accepted values per attribute.
///
/// # Examples
///
/// ```
/// use rental_analysis::{
///     attribute::{Attribute, AttributeValue},
///     filter::FilterSpec,
/// };
///
/// let filter = FilterSpec::new()
///     .with(Attribute::Bedrooms, [AttributeValue::Count(2)])
///     .with(Attribute::Superhost, [AttributeValue::Flag(true)]);
/// assert_eq!(filter.to_string(), "bedrooms=2 superhost=true");
///
/// let parsed: FilterSpec = "bedrooms=2".parse().unwrap();
/// assert!(!parsed.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSpec {
    predicates: BTreeMap<Attribute, BTreeSet<AttributeValue>>,
}

impl FilterSpec {
    /// Creates a filter with no restrictions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds accepted values for `attribute`, extending any already present.
    #[must_use]
    pub fn with<I>(mut self, attribute: Attribute, values: I) -> Self
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        self.insert(attribute, values);
        self
    }

    /// Adds accepted values for `attribute`, extending any already present.
    pub fn insert<I>(&mut self, attribute: Attribute, values: I)
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        self.predicates.entry(attribute).or_default().extend(values);
    }

    /// Merges every predicate of `other` into this filter.
    pub fn merge(&mut self, other: FilterSpec) {
        for (attribute, values) in other.predicates {
            self.insert(attribute, values);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Accepted values for `attribute`, or `None` if it is unrestricted.
    #[must_use]
    pub fn accepted(&self, attribute: Attribute) -> Option<&BTreeSet<AttributeValue>> {
        self.predicates.get(&attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &BTreeSet<AttributeValue>)> + '_ {
        self.predicates.iter().map(|(a, v)| (*a, v))
    }

    /// Checks whether `listing` satisfies every predicate.
    ///
    /// An attribute whose accepted set is empty matches nothing.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        self.predicates.iter().all(|(attribute, accepted)| {
            accepted
                .iter()
                .any(|value| listing.has_value(*attribute, value))
        })
    }

    /// Selects the listings that satisfy this filter, in dataset order.
    pub fn select<'a>(&'a self, listings: &'a [Listing]) -> impl Iterator<Item = &'a Listing> + 'a {
        listings.iter().filter(|l| self.matches(l))
    }

    /// Prices of the listings that satisfy this filter.
    #[must_use]
    pub fn prices(&self, listings: &[Listing]) -> Vec<f64> {
        self.select(listings).map(|l| l.price).collect()
    }

    /// Parses one `attribute=value[,value...]` expression and adds it.
    pub fn add_expression(&mut self, expr: &str) -> Result<(), ParseFilterError> {
        let malformed = || ParseFilterError::MalformedExpression {
            expr: expr.to_owned(),
        };
        let (name, values) = expr.split_once('=').ok_or_else(malformed)?;
        let attribute = name.parse::<Attribute>()?;
        let values = values
            .split(',')
            .map(|token| attribute.parse_value(token))
            .collect::<Result<Vec<_>, _>>()?;
        self.insert(attribute, values);
        Ok(())
    }

    /// Builds a filter from several `attribute=value[,value...]` expressions.
    pub fn from_expressions<I, S>(exprs: I) -> Result<Self, ParseFilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::new();
        for expr in exprs {
            filter.add_expression(expr.as_ref())?;
        }
        Ok(filter)
    }
}

impl<'de> Deserialize<'de> for FilterSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<Attribute, Vec<AttributeValue>>::deserialize(deserializer)?;
        let mut filter = Self::new();
        for (attribute, values) in raw {
            let values = values
                .into_iter()
                .map(|value| attribute.coerce_value(value))
                .collect::<Result<Vec<_>, _>>()
                .map_err(de::Error::custom)?;
            filter.insert(attribute, values);
        }
        Ok(filter)
    }
}

/// Parses whitespace-separated `attribute=value[,value...]` expressions.
///
/// Text values containing spaces must be added with
/// [`FilterSpec::add_expression`] instead.
impl FromStr for FilterSpec {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_expressions(s.split_whitespace())
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(all listings)");
        }
        for (i, (attribute, values)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{attribute}=")?;
            for (j, value) in values.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::tests::listing;

    fn dataset() -> Vec<Listing> {
        vec![
            listing(100.0, "Ballard", 2, true),
            listing(80.0, "Ballard", 2, false),
            listing(150.0, "Fremont", 3, true),
            listing(60.0, "Fremont", 1, true),
            listing(120.0, "Queen Anne", 2, true),
        ]
    }

    #[test]
    fn test_empty_filter_selects_everything() {
        let listings = dataset();
        let filter = FilterSpec::new();
        assert_eq!(filter.select(&listings).count(), listings.len());
        assert_eq!(filter.to_string(), "(all listings)");
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let listings = dataset();
        let filter = FilterSpec::new()
            .with(Attribute::Bedrooms, [AttributeValue::Count(2)])
            .with(Attribute::Superhost, [AttributeValue::Flag(true)]);
        assert_eq!(filter.prices(&listings), [100.0, 120.0]);
        assert!(
            filter
                .select(&listings)
                .all(|l| l.bedrooms == 2 && l.host_is_superhost)
        );
    }

    #[test]
    fn test_values_are_disjunctive() {
        let listings = dataset();
        let filter: FilterSpec = "neighbourhood=Ballard,Fremont bedrooms=1,3".parse().unwrap();
        assert_eq!(filter.prices(&listings), [150.0, 60.0]);
    }

    #[test]
    fn test_empty_accepted_set_matches_nothing() {
        let listings = dataset();
        let filter = FilterSpec::new().with(Attribute::Beds, []);
        assert!(filter.prices(&listings).is_empty());
    }

    #[test]
    fn test_add_expression_with_spaces_in_value() {
        let listings = dataset();
        let mut filter = FilterSpec::new();
        filter.add_expression("neighbourhood=Queen Anne").unwrap();
        assert_eq!(filter.prices(&listings), [120.0]);
    }

    #[test]
    fn test_malformed_expressions() {
        assert!(matches!(
            FilterSpec::from_expressions(["bedrooms"]),
            Err(ParseFilterError::MalformedExpression { .. })
        ));
        assert!(matches!(
            FilterSpec::from_expressions(["rooms=2"]),
            Err(ParseFilterError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            FilterSpec::from_expressions(["bedrooms=2,x"]),
            Err(ParseFilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_and_merge() {
        let json = r#"{"bedrooms": [2], "superhost": [true]}"#;
        let mut filter: FilterSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            filter.accepted(Attribute::Bedrooms),
            Some(&BTreeSet::from([AttributeValue::Count(2)]))
        );
        assert_eq!(filter.accepted(Attribute::Neighbourhood), None);

        filter.merge("bedrooms=3".parse().unwrap());
        assert_eq!(filter.accepted(Attribute::Bedrooms).map(BTreeSet::len), Some(2));

        let back: FilterSpec =
            serde_json::from_str(&serde_json::to_string(&filter).unwrap()).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn test_json_text_tokens_are_parsed_per_attribute() {
        let listings = dataset();
        let filter: FilterSpec =
            serde_json::from_str(r#"{"bedrooms": ["2"], "superhost": ["t"]}"#).unwrap();
        assert_eq!(
            filter,
            FilterSpec::new()
                .with(Attribute::Bedrooms, [AttributeValue::Count(2)])
                .with(Attribute::Superhost, [AttributeValue::Flag(true)])
        );
        assert_eq!(filter.prices(&listings), [100.0, 120.0]);
    }

    #[test]
    fn test_json_value_of_wrong_kind_is_rejected() {
        for json in [
            r#"{"neighbourhood": [true]}"#,
            r#"{"superhost": [1]}"#,
            r#"{"bedrooms": ["two"]}"#,
            r#"{"beds": [false]}"#,
        ] {
            let err = serde_json::from_str::<FilterSpec>(json).unwrap_err();
            assert!(err.to_string().contains("invalid value"), "{json}: {err}");
        }
    }
}
