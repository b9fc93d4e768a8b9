//! Listing attributes that can be filtered on or grouped by.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A filterable and groupable listing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    #[serde(alias = "neighborhood")]
    Neighbourhood,
    Bedrooms,
    Beds,
    PropertyType,
    RoomType,
    #[serde(alias = "host_is_superhost")]
    Superhost,
}

impl Attribute {
    pub const ALL: [Self; 6] = [
        Self::Neighbourhood,
        Self::Bedrooms,
        Self::Beds,
        Self::PropertyType,
        Self::RoomType,
        Self::Superhost,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Neighbourhood => "neighbourhood",
            Self::Bedrooms => "bedrooms",
            Self::Beds => "beds",
            Self::PropertyType => "property_type",
            Self::RoomType => "room_type",
            Self::Superhost => "superhost",
        }
    }

    /// Parses a command-line token as a value of this attribute.
    ///
    /// ```
    /// use rental_analysis::attribute::{Attribute, AttributeValue};
    ///
    /// assert_eq!(Attribute::Bedrooms.parse_value("2").unwrap(), AttributeValue::Count(2));
    /// assert_eq!(Attribute::Superhost.parse_value("t").unwrap(), AttributeValue::Flag(true));
    /// assert_eq!(
    ///     Attribute::RoomType.parse_value("Private room").unwrap(),
    ///     AttributeValue::Text("Private room".into()),
    /// );
    /// assert!(Attribute::Beds.parse_value("two").is_err());
    /// ```
    pub fn parse_value(self, token: &str) -> Result<AttributeValue, ParseFilterError> {
        let token = token.trim();
        let invalid = || ParseFilterError::InvalidValue {
            attribute: self,
            value: token.to_owned(),
        };
        match self {
            Self::Neighbourhood | Self::PropertyType | Self::RoomType => {
                if token.is_empty() {
                    return Err(invalid());
                }
                Ok(AttributeValue::Text(token.to_owned()))
            }
            Self::Bedrooms | Self::Beds => token
                .parse()
                .map(AttributeValue::Count)
                .map_err(|_| invalid()),
            Self::Superhost => match token.to_ascii_lowercase().as_str() {
                "t" | "true" | "yes" | "1" => Ok(AttributeValue::Flag(true)),
                "f" | "false" | "no" | "0" => Ok(AttributeValue::Flag(false)),
                _ => Err(invalid()),
            },
        }
    }

    /// Converts a value of any kind to the kind this attribute holds.
    ///
    /// Values of the right kind pass through and text is parsed like a
    /// command-line token, so `"2"` is accepted for `bedrooms` and `"t"` for
    /// `superhost`. Any other kind mismatch is an error.
    ///
    /// ```
    /// use rental_analysis::attribute::{Attribute, AttributeValue};
    ///
    /// let two = AttributeValue::Text("2".into());
    /// assert_eq!(Attribute::Bedrooms.coerce_value(two).unwrap(), AttributeValue::Count(2));
    /// assert!(Attribute::Neighbourhood.coerce_value(AttributeValue::Flag(true)).is_err());
    /// ```
    pub fn coerce_value(self, value: AttributeValue) -> Result<AttributeValue, ParseFilterError> {
        match (self, value) {
            (_, AttributeValue::Text(token)) => self.parse_value(&token),
            (Self::Bedrooms | Self::Beds, value @ AttributeValue::Count(_))
            | (Self::Superhost, value @ AttributeValue::Flag(_)) => Ok(value),
            (_, value) => Err(ParseFilterError::InvalidValue {
                attribute: self,
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

impl FromStr for Attribute {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let attribute = match s.trim().to_ascii_lowercase().as_str() {
            "neighbourhood" | "neighborhood" => Self::Neighbourhood,
            "bedrooms" => Self::Bedrooms,
            "beds" => Self::Beds,
            "property_type" => Self::PropertyType,
            "room_type" => Self::RoomType,
            "superhost" | "host_is_superhost" => Self::Superhost,
            _ => {
                return Err(ParseFilterError::UnknownAttribute {
                    name: s.to_owned(),
                });
            }
        };
        Ok(attribute)
    }
}

/// The value of one attribute on one listing.
///
/// Serialized untagged, so JSON `true`, `2` and `"Ballard"` map to
/// [`Self::Flag`], [`Self::Count`] and [`Self::Text`] respectively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Count(u32),
    Text(String),
}

impl AttributeValue {
    /// Stable 64-bit key of this value, used to derive per-group random
    /// streams.
    ///
    /// Depends only on the value itself (FNV-1a over a kind tag and the
    /// value's bytes), so it is the same across runs and platforms.
    #[must_use]
    pub fn stream_key(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let (tag, bytes) = match self {
            Self::Flag(v) => (0_u8, vec![u8::from(*v)]),
            Self::Count(v) => (1, v.to_le_bytes().to_vec()),
            Self::Text(v) => (2, v.as_bytes().to_vec()),
        };
        std::iter::once(tag)
            .chain(bytes)
            .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(v) => fmt::Display::fmt(v, f),
            Self::Count(v) => fmt::Display::fmt(v, f),
            Self::Text(v) => fmt::Display::fmt(v, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseFilterError {
    #[display("unknown attribute '{name}'")]
    UnknownAttribute { name: String },
    #[display("invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue { attribute: Attribute, value: String },
    #[display("expected ATTRIBUTE=VALUE[,VALUE...], got '{expr}'")]
    MalformedExpression { expr: String },
}
