//! Listing data model
//!
//! A dataset is a collection of short-term rental listings whose columns have
//! already been cleaned upstream: prices are plain numbers (no currency
//! symbol) and the superhost flag is a boolean.
//!
//! # Serialization
//!
//! ```json
//! {
//!   "listings": [
//!     {
//!       "price": 85.0,
//!       "neighbourhood": "Ballard",
//!       "bedrooms": 1,
//!       "beds": 1,
//!       "property_type": "Apartment",
//!       "room_type": "Entire home/apt",
//!       "host_is_superhost": true,
//!       "summary": "Cozy flat close to the locks"
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeValue};

/// A collection of listings loaded from a dataset file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListingCollection {
    pub listings: Vec<Listing>,
}

impl From<Vec<Listing>> for ListingCollection {
    fn from(listings: Vec<Listing>) -> Self {
        Self { listings }
    }
}

/// A single rental listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Listing {
    /// Nightly price.
    pub price: f64,
    #[serde(alias = "neighborhood", alias = "neighbourhood_cleansed")]
    pub neighbourhood: String,
    pub bedrooms: u32,
    pub beds: u32,
    pub property_type: String,
    pub room_type: String,
    #[serde(alias = "superhost")]
    pub host_is_superhost: bool,
    /// Free-text description. Carried along but not analysed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Listing {
    /// Returns this listing's value of `attribute`.
    #[must_use]
    pub fn value(&self, attribute: Attribute) -> AttributeValue {
        match attribute {
            Attribute::Neighbourhood => AttributeValue::Text(self.neighbourhood.clone()),
            Attribute::Bedrooms => AttributeValue::Count(self.bedrooms),
            Attribute::Beds => AttributeValue::Count(self.beds),
            Attribute::PropertyType => AttributeValue::Text(self.property_type.clone()),
            Attribute::RoomType => AttributeValue::Text(self.room_type.clone()),
            Attribute::Superhost => AttributeValue::Flag(self.host_is_superhost),
        }
    }

    /// Checks whether this listing's value of `attribute` is `value` without
    /// allocating.
    #[must_use]
    pub fn has_value(&self, attribute: Attribute, value: &AttributeValue) -> bool {
        match (attribute, value) {
            (Attribute::Neighbourhood, AttributeValue::Text(v)) => self.neighbourhood == *v,
            (Attribute::PropertyType, AttributeValue::Text(v)) => self.property_type == *v,
            (Attribute::RoomType, AttributeValue::Text(v)) => self.room_type == *v,
            (Attribute::Bedrooms, AttributeValue::Count(v)) => self.bedrooms == *v,
            (Attribute::Beds, AttributeValue::Count(v)) => self.beds == *v,
            (Attribute::Superhost, AttributeValue::Flag(v)) => self.host_is_superhost == *v,
            _ => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a listing with the given grouping columns and otherwise fixed values.
    pub(crate) fn listing(
        price: f64,
        neighbourhood: &str,
        bedrooms: u32,
        host_is_superhost: bool,
    ) -> Listing {
        Listing {
            price,
            neighbourhood: neighbourhood.to_owned(),
            bedrooms,
            beds: bedrooms.max(1),
            property_type: "Apartment".to_owned(),
            room_type: "Entire home/apt".to_owned(),
            host_is_superhost,
            summary: None,
        }
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let json = r#"{
            "price": 120.5,
            "neighborhood": "Fremont",
            "bedrooms": 2,
            "beds": 3,
            "property_type": "House",
            "room_type": "Private room",
            "host_is_superhost": false
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.neighbourhood, "Fremont");
        assert_eq!(listing.summary, None);
        assert_eq!(
            listing.value(Attribute::Beds),
            AttributeValue::Count(3)
        );
    }

    #[test]
    fn test_value_and_has_value_agree() {
        let l = listing(99.0, "Ballard", 2, true);
        for attribute in Attribute::ALL {
            let value = l.value(attribute);
            assert!(l.has_value(attribute, &value), "{attribute}");
        }
        assert!(!l.has_value(Attribute::Bedrooms, &AttributeValue::Count(3)));
        assert!(!l.has_value(Attribute::Bedrooms, &AttributeValue::Text("2".into())));
    }
}
