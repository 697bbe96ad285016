//! Entity trait: identity of long-lived catalog and configuration records.

/// Entity marker + minimal interface.
///
/// Catalog records (items, locations, buffers) and configuration calendars are
/// entities: stores index them by `id()`.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
