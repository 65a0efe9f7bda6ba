//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Plain records (guests, stay-guests, services, service lines) implement this;
/// records with a lifecycle implement [`crate::AggregateRoot`] instead.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
