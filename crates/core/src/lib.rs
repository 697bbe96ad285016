//! Shared planning primitives for the stockplan crates.
//!
//! This crate contains **pure** building blocks (no storage concerns): the error
//! taxonomy, name-based identifiers and half-open time spans.

pub mod entity;
pub mod error;
pub mod id;
pub mod span;

pub use entity::Entity;
pub use error::{PlanError, PlanResult, StoreError};
pub use id::{BufferKey, CalendarName, DocumentRef, ItemName, LocationName};
pub use span::Span;
