//! Product catalog domain module.
//!
//! Rooms and billable services are catalog products; the front desk reads their
//! names and list prices from here. Implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{
    ArchiveProduct, ChangeListPrice, CreateProduct, ListPrice, ListPriceChanged,
    ListPriceWithdrawn, Product, ProductArchived, ProductCommand, ProductCreated, ProductEvent,
    ProductId, ProductStatus, WithdrawListPrice,
};
