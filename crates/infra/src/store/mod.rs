//! Transactional record storage for the front desk.
//!
//! Every engine operation runs inside one unit of work: the closure sees a working copy
//! of the tables, and the copy replaces the committed state only when the closure
//! returns `Ok`. An error anywhere in a multi-record transition therefore leaves nothing
//! behind.

pub mod in_memory;
pub mod tables;

use std::sync::Arc;

use thiserror::Error;

pub use in_memory::InMemoryHotelStore;
pub use tables::{HotelTables, Table};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store lock poisoned: {0}")]
    Poisoned(&'static str),
}

/// Record store with atomic units of work.
pub trait HotelStore: Send + Sync {
    /// Run `f` against a consistent snapshot.
    fn read<R>(&self, f: impl FnOnce(&HotelTables) -> R) -> Result<R, StoreError>;

    /// Run `f` as one unit of work; its writes are committed only if it returns `Ok`.
    ///
    /// Units of work are serialised, so concurrent transitions on the same records
    /// cannot interleave.
    fn transact<R, E>(&self, f: impl FnOnce(&mut HotelTables) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>;
}

impl<S> HotelStore for Arc<S>
where
    S: HotelStore + ?Sized,
{
    fn read<R>(&self, f: impl FnOnce(&HotelTables) -> R) -> Result<R, StoreError> {
        (**self).read(f)
    }

    fn transact<R, E>(&self, f: impl FnOnce(&mut HotelTables) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        (**self).transact(f)
    }
}
