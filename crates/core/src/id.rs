//! Strongly-typed identifiers used across the planning crates.
//!
//! Planning entities are identified by their names, so every identifier is a
//! string newtype. `BufferKey` is the composite `"<item> @ <location>"` key.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Name of an item in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

/// Name of a location in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationName(String);

/// Name of a configuration calendar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarName(String);

/// Reference of an originating document (MO, PO, DO, delivery).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

macro_rules! impl_name_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = PlanError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(PlanError::configuration(format!("{}: empty name", $name)));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_name_newtype!(ItemName, "ItemName");
impl_name_newtype!(LocationName, "LocationName");
impl_name_newtype!(CalendarName, "CalendarName");
impl_name_newtype!(DocumentRef, "DocumentRef");

const BUFFER_SEPARATOR: &str = " @ ";

/// Composite buffer identity: one (item, location) pair.
///
/// Ordered by item, then location. Serialized as its `"<item> @ <location>"` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BufferKey {
    item: ItemName,
    location: LocationName,
}

impl BufferKey {
    pub fn new(item: impl Into<ItemName>, location: impl Into<LocationName>) -> Self {
        Self {
            item: item.into(),
            location: location.into(),
        }
    }

    pub fn item(&self) -> &ItemName {
        &self.item
    }

    pub fn location(&self) -> &LocationName {
        &self.location
    }

    /// Name of the calendar that overrides safety stock for this buffer only.
    pub fn safety_stock_calendar(&self) -> CalendarName {
        CalendarName::new(format!("SS for {self}"))
    }
}

impl core::fmt::Display for BufferKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}{}", self.item, BUFFER_SEPARATOR, self.location)
    }
}

impl FromStr for BufferKey {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Item names may themselves contain " @ "; location names may not.
        let (item, location) = s
            .rsplit_once(BUFFER_SEPARATOR)
            .ok_or_else(|| PlanError::configuration(format!("malformed buffer key '{s}'")))?;
        Ok(Self::new(item.parse::<ItemName>()?, location.parse::<LocationName>()?))
    }
}

impl From<BufferKey> for String {
    fn from(key: BufferKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for BufferKey {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
