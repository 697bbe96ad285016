//! Custom attribute schema.
//!
//! Deployments may extend items and locations with custom fields. The schema of
//! those fields is read once from the catalog at startup and installed in a
//! process-wide registry; rollups only read it.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::item::Item;
use crate::location::Location;

/// Which catalog entity an attribute extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeOwner {
    Item,
    Location,
}

impl AttributeOwner {
    fn prefix(self) -> &'static str {
        match self {
            AttributeOwner::Item => "item",
            AttributeOwner::Location => "location",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Text,
    Number,
    Boolean,
    Date,
}

/// One custom attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub owner: AttributeOwner,
    pub name: String,
    pub kind: AttributeKind,
}

impl AttributeDefinition {
    pub fn item(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            owner: AttributeOwner::Item,
            name: name.into(),
            kind,
        }
    }

    pub fn location(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            owner: AttributeOwner::Location,
            name: name.into(),
            kind,
        }
    }

    /// Output column name, e.g. `item__shelf_life`.
    pub fn column(&self) -> String {
        format!("{}__{}", self.owner.prefix(), self.name)
    }
}

/// Ordered set of custom attribute definitions: items first, then locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    definitions: Vec<AttributeDefinition>,
}

impl AttributeSchema {
    pub fn new(definitions: impl IntoIterator<Item = AttributeDefinition>) -> Self {
        let mut definitions: Vec<_> = definitions.into_iter().collect();
        // Stable: keeps catalog order within each owner.
        definitions.sort_by_key(|d| d.owner == AttributeOwner::Location);
        Self { definitions }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn definitions(&self) -> &[AttributeDefinition] {
        &self.definitions
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Project an item/location pair onto the schema.
    ///
    /// Every defined column is present; missing values become `null`.
    pub fn project(&self, item: &Item, location: &Location) -> BTreeMap<String, JsonValue> {
        self.definitions
            .iter()
            .map(|def| {
                let source = match def.owner {
                    AttributeOwner::Item => &item.attributes,
                    AttributeOwner::Location => &location.attributes,
                };
                let value = source.get(&def.name).cloned().unwrap_or(JsonValue::Null);
                (def.column(), value)
            })
            .collect()
    }
}

static REGISTRY: OnceLock<AttributeSchema> = OnceLock::new();

/// Install the process-wide schema.
///
/// Returns the rejected schema when one is already installed.
pub fn install(schema: AttributeSchema) -> Result<&'static AttributeSchema, AttributeSchema> {
    let mut candidate = Some(schema);
    let installed = REGISTRY.get_or_init(|| candidate.take().unwrap_or_default());
    match candidate {
        None => {
            tracing::info!(columns = installed.definitions.len(), "custom attribute schema installed");
            Ok(installed)
        }
        Some(rejected) => Err(rejected),
    }
}

/// The installed schema, or an empty one before startup installed it.
pub fn installed() -> &'static AttributeSchema {
    static EMPTY: OnceLock<AttributeSchema> = OnceLock::new();
    REGISTRY
        .get()
        .unwrap_or_else(|| EMPTY.get_or_init(AttributeSchema::empty))
}
