use std::sync::RwLock;

use super::{HotelStore, HotelTables, StoreError};

/// In-memory hotel store.
///
/// Intended for tests/dev. A unit of work clones the tables under the write lock and
/// swaps the copy in on success; not optimized for large inventories.
#[derive(Debug, Default)]
pub struct InMemoryHotelStore {
    tables: RwLock<HotelTables>,
}

impl InMemoryHotelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HotelStore for InMemoryHotelStore {
    fn read<R>(&self, f: impl FnOnce(&HotelTables) -> R) -> Result<R, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Poisoned("hotel tables"))?;
        Ok(f(&tables))
    }

    fn transact<R, E>(&self, f: impl FnOnce(&mut HotelTables) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut committed = self
            .tables
            .write()
            .map_err(|_| StoreError::Poisoned("hotel tables"))?;

        let mut working = committed.clone();
        let out = f(&mut working)?;
        *committed = working;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeep_core::DomainError;
    use innkeep_hotel::{Guest, GuestId};
    use innkeep_parties::PartyId;

    use crate::front_desk::FrontDeskError;

    #[test]
    fn failed_unit_of_work_commits_nothing() {
        let store = InMemoryHotelStore::new();
        let party_id = PartyId::generate();

        let result = store.transact(|t| -> Result<(), FrontDeskError> {
            t.insert_guest(Guest::new(GuestId::generate(), party_id))?;
            t.insert_guest(Guest::new(GuestId::generate(), party_id))?;
            Ok(())
        });
        assert!(matches!(
            result,
            Err(FrontDeskError::Domain(DomainError::UniquenessViolation(_)))
        ));

        let count = store.read(|t| t.guests().len()).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn successful_unit_of_work_is_visible_to_readers() {
        let store = InMemoryHotelStore::new();
        let guest = Guest::new(GuestId::generate(), PartyId::generate());
        let id = guest.id_typed();

        store
            .transact(|t| -> Result<(), FrontDeskError> {
                t.insert_guest(guest)?;
                Ok(())
            })
            .unwrap();

        assert!(store.read(|t| t.guest(id).is_ok()).unwrap());
    }
}
