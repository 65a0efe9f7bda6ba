//! Read-only collaborators the front desk consults.
//!
//! Implementations are injected into the engine; there is no global registry.

use std::sync::Arc;

use innkeep_core::Money;
use innkeep_parties::{Party, PartyId};
use innkeep_products::{Product, ProductId};

/// Party/contact directory (people and organisations).
pub trait PartyDirectory: Send + Sync {
    fn party(&self, party_id: PartyId) -> Option<Party>;
}

/// Product/price catalog.
pub trait ProductCatalog: Send + Sync {
    fn product(&self, product_id: ProductId) -> Option<Product>;

    /// Current list price of a product (first active catalog price).
    fn list_price(&self, product_id: ProductId) -> Option<Money> {
        self.product(product_id).and_then(|p| p.list_price())
    }
}

impl<T> PartyDirectory for Arc<T>
where
    T: PartyDirectory + ?Sized,
{
    fn party(&self, party_id: PartyId) -> Option<Party> {
        (**self).party(party_id)
    }
}

impl<T> ProductCatalog for Arc<T>
where
    T: ProductCatalog + ?Sized,
{
    fn product(&self, product_id: ProductId) -> Option<Product> {
        (**self).product(product_id)
    }

    fn list_price(&self, product_id: ProductId) -> Option<Money> {
        (**self).list_price(product_id)
    }
}
