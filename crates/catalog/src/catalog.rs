//! Read-only catalog boundary.

use std::sync::Arc;

use stockplan_core::{BufferKey, ItemName, LocationName, StoreError};

use crate::attributes::AttributeDefinition;
use crate::buffer::{Buffer, BufferFilter};
use crate::item::Item;
use crate::location::Location;

/// Catalog collaborator: items, locations, buffers and custom attribute definitions.
///
/// Implementations own persistence; the rollup engine only reads.
pub trait Catalog: Send + Sync {
    fn item(&self, name: &ItemName) -> Result<Option<Item>, StoreError>;

    fn location(&self, name: &LocationName) -> Result<Option<Location>, StoreError>;

    fn buffer(&self, key: &BufferKey) -> Result<Option<Buffer>, StoreError>;

    /// Buffers matching `filter`, in no particular order.
    fn list_buffers(&self, filter: &BufferFilter) -> Result<Vec<Buffer>, StoreError>;

    fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>, StoreError>;
}

impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    fn item(&self, name: &ItemName) -> Result<Option<Item>, StoreError> {
        (**self).item(name)
    }

    fn location(&self, name: &LocationName) -> Result<Option<Location>, StoreError> {
        (**self).location(name)
    }

    fn buffer(&self, key: &BufferKey) -> Result<Option<Buffer>, StoreError> {
        (**self).buffer(key)
    }

    fn list_buffers(&self, filter: &BufferFilter) -> Result<Vec<Buffer>, StoreError> {
        (**self).list_buffers(filter)
    }

    fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>, StoreError> {
        (**self).attribute_definitions()
    }
}
