//! Rollup requests: which buffers, which period, which order.

use serde::{Deserialize, Serialize};

use stockplan_catalog::BufferFilter;
use stockplan_core::{BufferKey, Span};

/// Buffers a rollup covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferSelector {
    /// One catalog buffer; it must exist.
    Key(BufferKey),
    /// Catalog buffers matching the filter.
    Filter(BufferFilter),
    /// Every item/location pair with ledger activity, catalog record or not.
    WithActivity,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Buffer,
    Item,
    Location,
    ItemCategory,
    LocationCategory,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    #[serde(default)]
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Item, then location, both ascending.
pub fn default_sort() -> Vec<SortKey> {
    vec![SortKey::asc(SortField::Item), SortKey::asc(SortField::Location)]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub selector: BufferSelector,
    pub range: Span,
    /// Bucket granularity; the engine's configured default when absent.
    #[serde(default)]
    pub granularity: Option<String>,
    #[serde(default = "default_sort")]
    pub sort: Vec<SortKey>,
}

impl ReportRequest {
    pub fn new(selector: BufferSelector, range: Span) -> Self {
        Self {
            selector,
            range,
            granularity: None,
            sort: default_sort(),
        }
    }

    pub fn with_granularity(mut self, granularity: impl Into<String>) -> Self {
        self.granularity = Some(granularity.into());
        self
    }

    pub fn with_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.sort = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sort_defaults_to_item_then_location() {
        let json = r#"{
            "selector": "with_activity",
            "range": {"start": "2024-01-01T00:00:00Z", "end": "2024-02-01T00:00:00Z"}
        }"#;
        let request: ReportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.selector, BufferSelector::WithActivity);
        assert_eq!(request.sort, default_sort());
        assert!(request.granularity.is_none());
    }

    #[test]
    fn sort_direction_defaults_to_ascending() {
        let key: SortKey = serde_json::from_str(r#"{"field":"item_category"}"#).unwrap();
        assert_eq!(key, SortKey::asc(SortField::ItemCategory));
    }
}
