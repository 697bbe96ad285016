//! Custom attribute columns. Kept in its own test binary: the schema registry
//! is process-wide.

mod common;

use serde_json::json;

use stockplan_catalog::{AttributeDefinition, AttributeKind, Buffer, Item, Location};
use stockplan_report::{BufferSelector, ReportRequest, RollupConfig};

use common::{at, span, Fixture};

#[test]
fn rows_carry_descriptive_fields_and_attribute_columns() {
    let fixture = Fixture::new();
    fixture
        .catalog
        .add_item(Item::new("bolt").with_category("fasteners").with_attribute("abc", json!("A")))
        .unwrap();
    fixture
        .catalog
        .add_location(Location::new("plant").with_description("Main plant"))
        .unwrap();
    fixture.catalog.add_buffer(Buffer::new("bolt", "plant")).unwrap();
    fixture
        .catalog
        .define_attribute(AttributeDefinition::location("zone", AttributeKind::Text))
        .unwrap();
    fixture
        .catalog
        .define_attribute(AttributeDefinition::item("abc", AttributeKind::Text))
        .unwrap();

    let engine = fixture.engine();
    let schema = engine.install_attribute_schema().unwrap();
    assert_eq!(schema.definitions().len(), 2);

    let request = ReportRequest::new(
        BufferSelector::WithActivity,
        span(at(2024, 1, 1), at(2024, 2, 1)),
    );
    assert!(engine.rows(&request).unwrap().next().is_none());

    let request = ReportRequest::new(
        BufferSelector::Filter(Default::default()),
        span(at(2024, 1, 1), at(2024, 2, 1)),
    );
    let row = engine.rows(&request).unwrap().next().unwrap().unwrap();
    assert_eq!(row.item_details.as_ref().and_then(|d| d.category.as_deref()), Some("fasteners"));
    assert_eq!(
        row.location_details.as_ref().and_then(|d| d.description.as_deref()),
        Some("Main plant")
    );
    let columns: Vec<&str> = row.attributes.keys().map(String::as_str).collect();
    assert_eq!(columns, vec!["item__abc", "location__zone"]);
    assert_eq!(row.attributes["item__abc"], json!("A"));
    assert_eq!(row.attributes["location__zone"], json!(null));

    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["attributes"]["item__abc"], "A");

    let plain = fixture.with_config(RollupConfig::default().with_attributes(false)).engine();
    let row = plain.rows(&request).unwrap().next().unwrap().unwrap();
    assert!(row.item_details.is_none());
    assert!(row.attributes.is_empty());
}
