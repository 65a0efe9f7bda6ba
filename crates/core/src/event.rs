use chrono::{DateTime, Utc};

/// A domain event emitted by an aggregate.
///
/// Events are facts: immutable and versioned. The front desk does not store them;
/// they drive `apply` and are named in logs.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "hotel.room.taken").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
