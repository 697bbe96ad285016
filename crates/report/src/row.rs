//! Report rows and diagnostics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use stockplan_catalog::{Item, Location};
use stockplan_core::{BufferKey, CalendarName, DocumentRef, ItemName, LocationName};
use stockplan_ledger::FlowEventId;

/// Descriptive item fields carried on a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetails {
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub cost: Option<Decimal>,
    pub owner: Option<ItemName>,
    pub source: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl From<&Item> for ItemDetails {
    fn from(item: &Item) -> Self {
        Self {
            description: item.description.clone(),
            category: item.category.clone(),
            subcategory: item.subcategory.clone(),
            cost: item.cost,
            owner: item.owner.clone(),
            source: item.source.clone(),
            last_modified: item.last_modified,
        }
    }
}

/// Descriptive location fields carried on a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationDetails {
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub available: Option<CalendarName>,
    pub owner: Option<LocationName>,
    pub source: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl From<&Location> for LocationDetails {
    fn from(location: &Location) -> Self {
        Self {
            description: location.description.clone(),
            category: location.category.clone(),
            subcategory: location.subcategory.clone(),
            available: location.available.clone(),
            owner: location.owner.clone(),
            source: location.source.clone(),
            last_modified: location.last_modified,
        }
    }
}

/// Ledger inconsistency recovered while building a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFlag {
    /// The latest entry before the bucket carried no running balance; on-hand reported as 0.
    MissingRunningBalance { entry: FlowEventId },
    /// A flow in the bucket references a document the ledger does not know.
    UnresolvedDocument { reference: DocumentRef },
}

/// One buffer over one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub buffer: BufferKey,
    pub item: ItemName,
    pub location: LocationName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_details: Option<ItemDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_details: Option<LocationDetails>,

    pub bucket: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub start_on_hand: Decimal,
    pub start_days_of_cover: i64,
    pub safety_stock: Decimal,

    pub consumed: Decimal,
    pub consumed_mo: Decimal,
    pub consumed_do: Decimal,
    pub consumed_so: Decimal,
    pub produced: Decimal,
    pub produced_mo: Decimal,
    pub produced_do: Decimal,
    pub produced_po: Decimal,
    pub end_on_hand: Decimal,

    pub total_in_progress: Decimal,
    pub work_in_progress_mo: Decimal,
    pub on_order_po: Decimal,
    pub in_transit_do: Decimal,

    /// Custom attribute columns (`item__<name>`, `location__<name>`), after the fixed schema.
    pub attributes: BTreeMap<String, JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<RowFlag>,
}

impl InventoryRow {
    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }

    /// `end_on_hand == start_on_hand + produced - consumed`.
    pub fn reconciles(&self) -> bool {
        self.end_on_hand == self.start_on_hand + self.produced - self.consumed
    }
}

/// A buffer dropped from the report under `FailurePolicy::SkipBuffer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub buffer: BufferKey,
    pub reason: String,
}

/// Fully materialized rollup result.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub run_id: Uuid,
    pub rows: Vec<InventoryRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl InventoryReport {
    pub fn flagged_rows(&self) -> impl Iterator<Item = &InventoryRow> + '_ {
        self.rows.iter().filter(|row| row.is_flagged())
    }

    /// Rows of one buffer, in bucket order.
    pub fn rows_for<'a>(&'a self, buffer: &'a BufferKey) -> impl Iterator<Item = &'a InventoryRow> + 'a {
        self.rows.iter().filter(move |row| &row.buffer == buffer)
    }
}
