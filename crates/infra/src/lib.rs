//! Infrastructure layer: record storage, in-memory directory/catalog, front-desk engine.

pub mod front_desk;
pub mod registry;
pub mod store;

mod integration_tests;

pub use front_desk::{
    FrontDesk, FrontDeskError, NewReservation, NewRoom, NewServiceLine, ReservationView,
    RoomFilter, RoomView,
};
pub use registry::{InMemoryPartyDirectory, InMemoryProductCatalog, InMemoryRegistry, RegistryError};
pub use store::{HotelStore, HotelTables, InMemoryHotelStore, StoreError};
