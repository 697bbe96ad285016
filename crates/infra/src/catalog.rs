use std::sync::RwLock;

use stockplan_catalog::{AttributeDefinition, Buffer, BufferFilter, Catalog, Item, Location};
use stockplan_core::{BufferKey, ItemName, LocationName, StoreError};

use crate::keyed_store::{InMemoryKeyedStore, KeyedStore};

/// In-memory catalog for tests/dev.
#[derive(Debug)]
pub struct InMemoryCatalog {
    items: InMemoryKeyedStore<ItemName, Item>,
    locations: InMemoryKeyedStore<LocationName, Location>,
    buffers: InMemoryKeyedStore<BufferKey, Buffer>,
    attributes: RwLock<Vec<AttributeDefinition>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            items: InMemoryKeyedStore::new("catalog.items"),
            locations: InMemoryKeyedStore::new("catalog.locations"),
            buffers: InMemoryKeyedStore::new("catalog.buffers"),
            attributes: RwLock::new(Vec::new()),
        }
    }

    pub fn add_item(&self, item: Item) -> Result<(), StoreError> {
        self.items.put(item)
    }

    pub fn add_location(&self, location: Location) -> Result<(), StoreError> {
        self.locations.put(location)
    }

    pub fn add_buffer(&self, buffer: Buffer) -> Result<(), StoreError> {
        self.buffers.put(buffer)
    }

    pub fn define_attribute(&self, definition: AttributeDefinition) -> Result<(), StoreError> {
        let mut defs = self
            .attributes
            .write()
            .map_err(|_| StoreError::poisoned("catalog.attributes"))?;
        defs.push(definition);
        Ok(())
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for InMemoryCatalog {
    fn item(&self, name: &ItemName) -> Result<Option<Item>, StoreError> {
        self.items.get(name)
    }

    fn location(&self, name: &LocationName) -> Result<Option<Location>, StoreError> {
        self.locations.get(name)
    }

    fn buffer(&self, key: &BufferKey) -> Result<Option<Buffer>, StoreError> {
        self.buffers.get(key)
    }

    fn list_buffers(&self, filter: &BufferFilter) -> Result<Vec<Buffer>, StoreError> {
        let mut matching = Vec::new();
        for buffer in self.buffers.list()? {
            let (item, location) = if filter.needs_records() {
                (self.items.get(buffer.item())?, self.locations.get(buffer.location())?)
            } else {
                (None, None)
            };
            if filter.matches(&buffer, item.as_ref(), location.as_ref()) {
                matching.push(buffer);
            }
        }
        Ok(matching)
    }

    fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>, StoreError> {
        let defs = self
            .attributes
            .read()
            .map_err(|_| StoreError::poisoned("catalog.attributes"))?;
        Ok(defs.clone())
    }
}
