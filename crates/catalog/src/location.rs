use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use stockplan_core::{CalendarName, Entity, LocationName};

/// Catalog location (plant, warehouse, store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: LocationName,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Calendar describing when the location is open.
    pub available: Option<CalendarName>,
    pub owner: Option<LocationName>,
    pub source: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attributes: BTreeMap<String, JsonValue>,
}

impl Location {
    pub fn new(name: impl Into<LocationName>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            subcategory: None,
            available: None,
            owner: None,
            source: None,
            last_modified: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_available(mut self, calendar: impl Into<CalendarName>) -> Self {
        self.available = Some(calendar.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

impl Entity for Location {
    type Id = LocationName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}
