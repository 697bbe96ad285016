//! Catalog module: items, locations and the buffers combining them.
//!
//! Records here are owned by an external catalog; this crate defines their shape
//! and the read-only `Catalog` boundary the rollup engine consumes.

pub mod attributes;
pub mod buffer;
pub mod catalog;
pub mod item;
pub mod location;

pub use attributes::{AttributeDefinition, AttributeKind, AttributeOwner, AttributeSchema};
pub use buffer::{Buffer, BufferFilter};
pub use catalog::Catalog;
pub use item::Item;
pub use location::Location;
