//! In-memory aggregate registries backing the party directory and the product catalog.
//!
//! Commands run through the usual pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load current state (or a fresh instance from the factory)
//!   ↓
//! 2. Handle command (pure decision logic, produces events)
//!   ↓
//! 3. Apply events and store the new snapshot
//! ```
//!
//! The whole pipeline runs under the registry's write lock, so commands on the same
//! registry are serialised.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use innkeep_core::{Aggregate, AggregateRoot, DomainError, Event};
use innkeep_hotel::{PartyDirectory, ProductCatalog};
use innkeep_parties::{Party, PartyId};
use innkeep_products::{Product, ProductId};

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct InMemoryRegistry<A>
where
    A: AggregateRoot,
{
    records: RwLock<HashMap<A::Id, A>>,
}

pub type InMemoryPartyDirectory = InMemoryRegistry<Party>;
pub type InMemoryProductCatalog = InMemoryRegistry<Product>;

impl<A> Default for InMemoryRegistry<A>
where
    A: AggregateRoot,
{
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<A> InMemoryRegistry<A>
where
    A: Aggregate<Error = DomainError> + Clone,
    A::Event: Event,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a command against the aggregate `id` and return the updated snapshot.
    ///
    /// Nothing is stored when the command is rejected.
    pub fn dispatch(
        &self,
        id: A::Id,
        command: &A::Command,
        make_aggregate: impl FnOnce(A::Id) -> A,
    ) -> Result<A, RegistryError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Poisoned("registry"))?;

        let mut aggregate = match records.get(&id) {
            Some(existing) => existing.clone(),
            None => make_aggregate(id.clone()),
        };

        let events = aggregate.handle(command)?;
        for event in &events {
            aggregate.apply(event);
            tracing::debug!(event = event.event_type(), version = aggregate.version(), "event applied");
        }

        records.insert(id, aggregate.clone());
        Ok(aggregate)
    }

    pub fn get(&self, id: &A::Id) -> Result<Option<A>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Poisoned("registry"))?;
        Ok(records.get(id).cloned())
    }
}

impl PartyDirectory for InMemoryRegistry<Party> {
    fn party(&self, party_id: PartyId) -> Option<Party> {
        match self.get(&party_id) {
            Ok(party) => party,
            Err(e) => {
                tracing::warn!("party lookup failed: {e}");
                None
            }
        }
    }
}

impl ProductCatalog for InMemoryRegistry<Product> {
    fn product(&self, product_id: ProductId) -> Option<Product> {
        match self.get(&product_id) {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!("product lookup failed: {e}");
                None
            }
        }
    }
}
