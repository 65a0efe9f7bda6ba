//! Hotel front-desk domain module.
//!
//! Guests, rooms, reservations and the per-stay service ledger, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage). Orchestration of the
//! check-in/check-out side effects lives in `innkeep-infra`.
//!
//! Derived values (guest age, room price, line prices, service totals) are plain
//! functions of the records they depend on, computed on read.

pub mod guest;
pub mod ports;
pub mod reservation;
pub mod room;
pub mod search;
pub mod service;
pub mod stay_guest;

pub use guest::{Guest, GuestId, GuestProfile};
pub use ports::{PartyDirectory, ProductCatalog};
pub use reservation::{
    ChangeReservation, CloseReservation, CreateReservation, OpenReservation, Reservation,
    ReservationAction, ReservationChanged, ReservationChanges, ReservationClosed,
    ReservationCommand, ReservationCreated, ReservationEvent, ReservationId, ReservationOpened,
    ReservationState,
};
pub use room::{
    ApplyRoomAction, OccupyRoom, RegisterRoom, ReleaseRoom, Room, RoomAction, RoomCommand,
    RoomEvent, RoomId, RoomRegistered, RoomState, RoomStateChanged, RoomType,
};
pub use search::{SearchOperator, TextClause};
pub use service::{
    Service, ServiceId, ServiceLine, ServiceLineId, ServiceState, ServiceStatement,
    ServiceTotals, StatementLine,
};
pub use stay_guest::{StayGuest, StayGuestId};
