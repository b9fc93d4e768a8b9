//! Price analysis over short-term rental listings
//!
//! This crate connects the listing dataset to the bootstrap estimator of
//! [`rental_stats`]:
//!
//! 1. **Data model** ([`listing::Listing`]): one cleaned listing per row
//! 2. **Attributes** ([`attribute::Attribute`]): the columns that can be
//!    filtered on or grouped by, and their values
//! 3. **Filters** ([`filter::FilterSpec`]): declarative attribute-to-values
//!    constraints, AND across attributes and OR within one attribute
//! 4. **Filtered query** ([`query::query`]): one bootstrap estimate over the
//!    listings matching a filter
//! 5. **Grouped report** ([`report::GroupedReport`]): one estimate per
//!    attribute value, ranked by descending estimate
//!
//! # Examples
//!
//! ```
//! use rental_analysis::{attribute::Attribute, listing::Listing, report::GroupedReport};
//! use rental_stats::bootstrap::BootstrapConfig;
//!
//! let listings: Vec<Listing> = serde_json::from_str(r#"[
//!     {"price": 10, "neighbourhood": "A", "bedrooms": 1, "beds": 1,
//!      "property_type": "House", "room_type": "Private room", "host_is_superhost": false},
//!     {"price": 20, "neighbourhood": "A", "bedrooms": 1, "beds": 1,
//!      "property_type": "House", "room_type": "Private room", "host_is_superhost": true},
//!     {"price": 100, "neighbourhood": "B", "bedrooms": 2, "beds": 2,
//!      "property_type": "House", "room_type": "Entire home/apt", "host_is_superhost": false},
//!     {"price": 200, "neighbourhood": "B", "bedrooms": 3, "beds": 3,
//!      "property_type": "House", "room_type": "Entire home/apt", "host_is_superhost": true}
//! ]"#).unwrap();
//!
//! let config = BootstrapConfig::default().with_seed(5);
//! let report = GroupedReport::build(&listings, Attribute::Neighbourhood, &config).unwrap();
//!
//! assert_eq!(report.entries[0].group.to_string(), "B");
//! assert_eq!(report.entries[0].rank, 1);
//! assert_eq!(report.entries[1].rank, 2);
//! ```

pub mod attribute;
pub mod filter;
pub mod listing;
pub mod query;
pub mod report;
