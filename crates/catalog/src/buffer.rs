use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockplan_core::{BufferKey, CalendarName, Entity, ItemName, LocationName};

use crate::item::Item;
use crate::location::Location;

/// Inventory point: one item stocked at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buffer {
    pub key: BufferKey,
    pub description: Option<String>,
    /// Static safety stock.
    pub minimum: Option<Decimal>,
    /// Calendar holding time-phased safety stock, possibly shared between buffers.
    pub minimum_calendar: Option<CalendarName>,
}

impl Buffer {
    pub fn new(item: impl Into<ItemName>, location: impl Into<LocationName>) -> Self {
        Self {
            key: BufferKey::new(item, location),
            description: None,
            minimum: None,
            minimum_calendar: None,
        }
    }

    pub fn with_minimum(mut self, minimum: Decimal) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_minimum_calendar(mut self, calendar: impl Into<CalendarName>) -> Self {
        self.minimum_calendar = Some(calendar.into());
        self
    }

    pub fn item(&self) -> &ItemName {
        self.key.item()
    }

    pub fn location(&self) -> &LocationName {
        self.key.location()
    }
}

impl Entity for Buffer {
    type Id = BufferKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

/// Catalog-side buffer selection. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferFilter {
    pub item: Option<ItemName>,
    pub location: Option<LocationName>,
    pub item_category: Option<String>,
    pub location_category: Option<String>,
}

impl BufferFilter {
    pub fn for_item(item: impl Into<ItemName>) -> Self {
        Self {
            item: Some(item.into()),
            ..Default::default()
        }
    }

    pub fn for_location(location: impl Into<LocationName>) -> Self {
        Self {
            location: Some(location.into()),
            ..Default::default()
        }
    }

    /// Whether the filter needs the buffer's item/location records to decide.
    pub fn needs_records(&self) -> bool {
        self.item_category.is_some() || self.location_category.is_some()
    }

    pub fn matches(&self, buffer: &Buffer, item: Option<&Item>, location: Option<&Location>) -> bool {
        if self.item.as_ref().is_some_and(|i| i != buffer.item()) {
            return false;
        }
        if self.location.as_ref().is_some_and(|l| l != buffer.location()) {
            return false;
        }
        if let Some(category) = &self.item_category {
            if item.and_then(|i| i.category.as_ref()) != Some(category) {
                return false;
            }
        }
        if let Some(category) = &self.location_category {
            if location.and_then(|l| l.category.as_ref()) != Some(category) {
                return false;
            }
        }
        true
    }
}
