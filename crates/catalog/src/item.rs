use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use stockplan_core::{Entity, ItemName};

/// Catalog item (material, product, component).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: ItemName,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub cost: Option<Decimal>,
    /// Parent item in the item hierarchy.
    pub owner: Option<ItemName>,
    pub source: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Custom attribute values, keyed by attribute name (without prefix).
    #[serde(default)]
    pub attributes: BTreeMap<String, JsonValue>,
}

impl Item {
    pub fn new(name: impl Into<ItemName>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            subcategory: None,
            cost: None,
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

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<ItemName>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

impl Entity for Item {
    type Id = ItemName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}
