//! Front-desk engine: orchestrates check-in/check-out and the records they touch.
//!
//! Every operation is one unit of work of the injected [`HotelStore`]. The open and
//! close transitions update the reservation, its room and its service ledger
//! together or not at all; a batch that fails on its last reservation leaves the
//! earlier ones untouched.
//!
//! The party directory and the product catalog are read-only collaborators passed in
//! at construction.

mod error;
mod views;

pub use error::FrontDeskError;
pub use views::{ReservationView, RoomView};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use innkeep_core::{Aggregate, DomainError, Money};
use innkeep_hotel::{
    ApplyRoomAction, ChangeReservation, CloseReservation, CreateReservation, Guest, GuestId,
    GuestProfile, OccupyRoom, OpenReservation, PartyDirectory, ProductCatalog, RegisterRoom,
    ReleaseRoom, Reservation, ReservationChanges, ReservationCommand, ReservationId, ReservationState, Room,
    RoomAction, RoomCommand, RoomId, RoomType, Service, ServiceId, ServiceLine, ServiceLineId,
    ServiceStatement, StayGuest, TextClause,
};
use innkeep_parties::PartyId;
use innkeep_products::ProductId;

use crate::store::{HotelStore, HotelTables};

/// Input for [`FrontDesk::register_room`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    pub product_id: ProductId,
    pub room_number: String,
    pub room_type: RoomType,
    pub max_guests: u32,
}

/// Input for [`FrontDesk::create_reservation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub room_id: RoomId,
    pub reserved_by: GuestId,
    /// Defaults to the room's catalog price.
    pub price: Option<Money>,
    #[serde(default)]
    pub observations: String,
}

/// Input for [`FrontDesk::add_service_line`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewServiceLine {
    pub product_id: ProductId,
    pub qty: Option<u32>,
    /// Unset or zero takes the catalog price.
    pub unit_price: Option<Money>,
}

/// Room listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub free_only: bool,
    pub text: Option<TextClause>,
}

#[derive(Debug)]
pub struct FrontDesk<S, D, C> {
    store: S,
    directory: D,
    catalog: C,
}

impl<S, D, C> FrontDesk<S, D, C> {
    pub fn new(store: S, directory: D, catalog: C) -> Self {
        Self {
            store,
            directory,
            catalog,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

impl<S, D, C> FrontDesk<S, D, C>
where
    S: HotelStore,
    D: PartyDirectory,
    C: ProductCatalog,
{
    fn read<R>(
        &self,
        f: impl FnOnce(&HotelTables) -> Result<R, FrontDeskError>,
    ) -> Result<R, FrontDeskError> {
        self.store.read(f)?
    }

    fn transact<R>(
        &self,
        f: impl FnOnce(&mut HotelTables) -> Result<R, FrontDeskError>,
    ) -> Result<R, FrontDeskError> {
        self.store.transact(f)
    }

    // ----- guests -----

    #[instrument(skip(self))]
    pub fn register_guest(
        &self,
        party_id: PartyId,
        is_admitted: bool,
    ) -> Result<Guest, FrontDeskError> {
        let party = self
            .directory
            .party(party_id)
            .ok_or_else(|| DomainError::not_found(format!("party {party_id}")))?;
        Guest::ensure_registrable(&party)?;

        let guest = Guest::new(GuestId::generate(), party_id).with_admitted(is_admitted);
        self.transact(|t| {
            t.insert_guest(guest.clone())?;
            Ok(())
        })?;

        info!(guest_id = %guest.id_typed(), "guest registered");
        Ok(guest)
    }

    pub fn guest(&self, guest_id: GuestId) -> Result<Guest, FrontDeskError> {
        self.read(|t| Ok(t.guest(guest_id)?.clone()))
    }

    pub fn guest_profile(
        &self,
        guest_id: GuestId,
        today: NaiveDate,
    ) -> Result<GuestProfile, FrontDeskError> {
        let guest = self.guest(guest_id)?;
        let party = self
            .directory
            .party(guest.party_id())
            .ok_or_else(|| DomainError::not_found(format!("party {}", guest.party_id())))?;
        Ok(GuestProfile::derive(&guest, &party, today))
    }

    /// Guests whose first or last name matches `clause` (all guests without one).
    pub fn search_guests(
        &self,
        clause: Option<&TextClause>,
        today: NaiveDate,
    ) -> Result<Vec<GuestProfile>, FrontDeskError> {
        let guests: Vec<Guest> = self.read(|t| Ok(t.guests().into_iter().cloned().collect()))?;

        let mut profiles = Vec::new();
        for guest in guests {
            let Some(party) = self.directory.party(guest.party_id()) else {
                warn!(guest_id = %guest.id_typed(), "guest without party record skipped");
                continue;
            };
            if clause.is_some_and(|c| !Guest::matches_name(&party, c)) {
                continue;
            }
            profiles.push(GuestProfile::derive(&guest, &party, today));
        }
        Ok(profiles)
    }

    /// Toggle the admission flag, e.g. when a guest is barred from the house.
    #[instrument(skip(self))]
    pub fn set_guest_admission(
        &self,
        guest_id: GuestId,
        is_admitted: bool,
    ) -> Result<Guest, FrontDeskError> {
        let guest = self.transact(|t| {
            let mut guest = t.guest(guest_id)?.clone();
            guest.set_admitted(is_admitted);
            t.save_guest(guest.clone())?;
            Ok(guest)
        })?;

        info!(is_admitted, "guest admission changed");
        Ok(guest)
    }

    #[instrument(skip(self))]
    pub fn remove_guest(&self, guest_id: GuestId) -> Result<Guest, FrontDeskError> {
        let guest = self.transact(|t| Ok(t.delete_guest(guest_id)?))?;
        info!("guest removed");
        Ok(guest)
    }

    // ----- rooms -----

    #[instrument(skip(self, new), fields(room_number = %new.room_number))]
    pub fn register_room(&self, new: NewRoom) -> Result<Room, FrontDeskError> {
        if self.catalog.product(new.product_id).is_none() {
            return Err(DomainError::not_found(format!("product {}", new.product_id)).into());
        }

        let room_id = RoomId::generate();
        let mut room = Room::empty(room_id);
        room.execute(&RoomCommand::RegisterRoom(RegisterRoom {
            room_id,
            product_id: new.product_id,
            room_number: new.room_number,
            room_type: new.room_type,
            max_guests: new.max_guests,
            occurred_at: Utc::now(),
        }))?;

        let saved = room.clone();
        self.transact(|t| {
            t.save_room(saved);
            Ok(())
        })?;

        info!(room_id = %room_id, "room registered");
        Ok(room)
    }

    pub fn room(&self, room_id: RoomId) -> Result<Room, FrontDeskError> {
        self.read(|t| Ok(t.room(room_id)?.clone()))
    }

    pub fn room_view(&self, room_id: RoomId) -> Result<RoomView, FrontDeskError> {
        let room = self.room(room_id)?;
        let product = self.catalog.product(room.product_id());
        Ok(RoomView::build(&room, product.as_ref()))
    }

    /// Rooms in inventory order.
    pub fn list_rooms(&self, filter: &RoomFilter) -> Result<Vec<RoomView>, FrontDeskError> {
        let rooms: Vec<Room> = self.read(|t| {
            Ok(t.rooms()
                .into_iter()
                .filter(|r| !filter.free_only || r.is_free())
                .cloned()
                .collect())
        })?;

        let views = rooms
            .iter()
            .filter_map(|room| {
                let product = self.catalog.product(room.product_id());
                if let Some(clause) = &filter.text {
                    let name = product.as_ref().map(|p| p.name()).unwrap_or_default();
                    if !room.matches(name, clause) {
                        return None;
                    }
                }
                Some(RoomView::build(room, product.as_ref()))
            })
            .collect();
        Ok(views)
    }

    /// Manual desk action, checked against the room transition table.
    #[instrument(skip(self))]
    pub fn apply_room_action(
        &self,
        room_id: RoomId,
        action: RoomAction,
    ) -> Result<Room, FrontDeskError> {
        let room = self.transact(|t| {
            let mut room = t.room(room_id)?.clone();
            room.execute(&RoomCommand::ApplyRoomAction(ApplyRoomAction {
                room_id,
                action,
                occurred_at: Utc::now(),
            }))?;
            t.save_room(room.clone());
            Ok(room)
        })?;

        info!(state = %room.state(), "room state changed");
        Ok(room)
    }

    // ----- reservations -----

    #[instrument(skip(self, new), fields(room_id = %new.room_id, reserved_by = %new.reserved_by))]
    pub fn create_reservation(&self, new: NewReservation) -> Result<Reservation, FrontDeskError> {
        let reservation = self.transact(|t| {
            t.guest(new.reserved_by)?;
            let room = t.room(new.room_id)?;
            room.ensure_bookable()?;

            let price = match new.price {
                Some(price) => price,
                None => room.price(&self.catalog).ok_or_else(|| {
                    DomainError::validation(format!(
                        "room {} has no catalog price; give one explicitly",
                        room.room_number()
                    ))
                })?,
            };

            let reservation_id = ReservationId::generate();
            let mut reservation = Reservation::empty(reservation_id);
            reservation.execute(&ReservationCommand::CreateReservation(CreateReservation {
                reservation_id,
                room_id: new.room_id,
                reserved_by: new.reserved_by,
                price,
                observations: new.observations,
                occurred_at: Utc::now(),
            }))?;
            t.save_reservation(reservation.clone());
            Ok(reservation)
        })?;

        info!(reservation_id = %reservation.id_typed(), price = %reservation.price(), "reservation created");
        Ok(reservation)
    }

    pub fn reservation(&self, reservation_id: ReservationId) -> Result<Reservation, FrontDeskError> {
        self.read(|t| Ok(t.reservation(reservation_id)?.clone()))
    }

    pub fn reservation_view(
        &self,
        reservation_id: ReservationId,
    ) -> Result<ReservationView, FrontDeskError> {
        self.read(|t| Ok(reservation_view(t, t.reservation(reservation_id)?)))
    }

    /// Reservations in creation order, optionally only those in `state`.
    pub fn list_reservations(
        &self,
        state: Option<ReservationState>,
    ) -> Result<Vec<ReservationView>, FrontDeskError> {
        self.read(|t| {
            Ok(t.reservations()
                .into_iter()
                .filter(|r| state.is_none_or(|s| r.state() == s))
                .map(|r| reservation_view(t, r))
                .collect())
        })
    }

    #[instrument(skip(self, changes))]
    pub fn change_reservation(
        &self,
        reservation_id: ReservationId,
        changes: ReservationChanges,
    ) -> Result<Reservation, FrontDeskError> {
        self.transact(|t| {
            let mut reservation = t.reservation(reservation_id)?.clone();

            if reservation.state() == ReservationState::Draft {
                if let Some(room_id) = changes.room_id.filter(|r| *r != reservation.room_id()) {
                    t.room(room_id)?.ensure_bookable()?;
                }
                if let Some(guest_id) = changes.reserved_by {
                    t.guest(guest_id)?;
                }
            }

            reservation.execute(&ReservationCommand::ChangeReservation(ChangeReservation {
                reservation_id,
                changes,
                occurred_at: Utc::now(),
            }))?;
            t.save_reservation(reservation.clone());
            Ok(reservation)
        })
    }

    /// Delete a draft or closed reservation with everything it owns.
    #[instrument(skip(self))]
    pub fn delete_reservation(&self, reservation_id: ReservationId) -> Result<(), FrontDeskError> {
        self.transact(|t| {
            let reservation = t.reservation(reservation_id)?;
            if reservation.state() == ReservationState::Open {
                return Err(DomainError::invariant(
                    "an open reservation cannot be deleted; close it first",
                )
                .into());
            }
            t.delete_reservation(reservation_id)?;
            Ok(())
        })?;

        info!("reservation deleted");
        Ok(())
    }

    /// Record an extra occupant of a reservation that is not closed.
    #[instrument(skip(self))]
    pub fn add_stay_guest(
        &self,
        reservation_id: ReservationId,
        guest_id: GuestId,
    ) -> Result<StayGuest, FrontDeskError> {
        self.transact(|t| {
            let reservation = t.reservation(reservation_id)?;
            if !reservation.can_edit_stay() {
                return Err(DomainError::invariant(format!(
                    "reservation {reservation_id} is closed"
                ))
                .into());
            }
            t.guest(guest_id)?;

            let stay_guest = StayGuest::new(reservation_id, guest_id);
            t.insert_stay_guests(vec![stay_guest.clone()]);
            Ok(stay_guest)
        })
    }

    /// Check in: draft -> open for every reservation in `ids`, as one unit of work.
    ///
    /// Per reservation: room becomes taken, the reserving guest is recorded as a stay
    /// guest, and a service with a single room line at the reservation price is
    /// created. Stay-guests, services and lines are written in one batch.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub fn open_reservations(
        &self,
        ids: &[ReservationId],
    ) -> Result<Vec<Reservation>, FrontDeskError> {
        let opened = self.transact(|t| {
            let now = Utc::now();
            let mut stay_guests = Vec::with_capacity(ids.len());
            let mut services = Vec::with_capacity(ids.len());
            let mut lines = Vec::with_capacity(ids.len());
            let mut opened = Vec::with_capacity(ids.len());

            for &reservation_id in ids {
                let mut reservation = t.reservation(reservation_id)?.clone();
                reservation.execute(&ReservationCommand::OpenReservation(OpenReservation {
                    reservation_id,
                    occurred_at: now,
                }))?;

                let mut room = t.room(reservation.room_id())?.clone();
                room.execute(&RoomCommand::OccupyRoom(OccupyRoom {
                    room_id: room.id_typed(),
                    occurred_at: now,
                }))?;

                let mut service = Service::open_for(reservation_id, reservation.price());
                let mut line = ServiceLine::new(service.id, room.product_id())
                    .with_unit_price(reservation.price());
                line.resolve_unit_price(self.catalog.list_price(room.product_id()));
                service.recompute_total(std::slice::from_ref(&line));
                lines.push(line);
                stay_guests.push(StayGuest::new(reservation_id, reservation.reserved_by()));
                services.push(service);

                t.save_room(room);
                t.save_reservation(reservation.clone());
                debug!(%reservation_id, "reservation opened");
                opened.push(reservation);
            }

            t.insert_stay_guests(stay_guests);
            t.insert_services(services);
            t.insert_service_lines(lines)?;
            Ok(opened)
        })?;

        info!(opened = opened.len(), "check-in complete");
        Ok(opened)
    }

    /// Check out: open -> closed for every reservation in `ids`, as one unit of work.
    ///
    /// Per reservation: room goes to cleaning and the first service is closed.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub fn close_reservations(
        &self,
        ids: &[ReservationId],
    ) -> Result<Vec<Reservation>, FrontDeskError> {
        let closed = self.transact(|t| {
            let now = Utc::now();
            let mut closed = Vec::with_capacity(ids.len());

            for &reservation_id in ids {
                let mut reservation = t.reservation(reservation_id)?.clone();
                reservation.execute(&ReservationCommand::CloseReservation(CloseReservation {
                    reservation_id,
                    occurred_at: now,
                }))?;

                let mut room = t.room(reservation.room_id())?.clone();
                room.execute(&RoomCommand::ReleaseRoom(ReleaseRoom {
                    room_id: room.id_typed(),
                    occurred_at: now,
                }))?;
                t.save_room(room);

                // Only the first service is closed; a reservation gets exactly one on open.
                let first = t.services_of(reservation_id).first().map(|s| (*s).clone());
                match first {
                    Some(mut service) => {
                        service.close()?;
                        t.save_service(service);
                    }
                    None => warn!(%reservation_id, "closing reservation without a service"),
                }

                t.save_reservation(reservation.clone());
                debug!(%reservation_id, "reservation closed");
                closed.push(reservation);
            }
            Ok(closed)
        })?;

        info!(closed = closed.len(), "check-out complete");
        Ok(closed)
    }

    // ----- service ledger -----

    pub fn service_statement(&self, service_id: ServiceId) -> Result<ServiceStatement, FrontDeskError> {
        self.read(|t| {
            let service = t.service(service_id)?.clone();
            Ok(ServiceStatement::build(service, &t.lines_snapshot(service_id)))
        })
    }

    /// Add an extra charge to a service that is not closed.
    #[instrument(skip(self, new), fields(product_id = %new.product_id))]
    pub fn add_service_line(
        &self,
        service_id: ServiceId,
        new: NewServiceLine,
    ) -> Result<ServiceLine, FrontDeskError> {
        let product = self
            .catalog
            .product(new.product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", new.product_id)))?;
        if !product.can_be_sold() {
            return Err(DomainError::constraint(format!(
                "product {} is archived",
                product.sku()
            ))
            .into());
        }

        let mut line = ServiceLine::new(service_id, new.product_id)
            .with_qty(new.qty.unwrap_or(1))
            .with_unit_price(new.unit_price.unwrap_or(Money::ZERO));
        line.validate()?;
        line.resolve_unit_price(product.list_price());

        self.transact(|t| {
            let mut service = t.service(service_id)?.clone();
            service.ensure_editable()?;

            t.insert_service_lines(vec![line.clone()])?;
            service.recompute_total(&t.lines_snapshot(service_id));
            t.save_service(service);
            Ok(())
        })?;

        info!(line_id = %line.id, price = %line.price(), "service line added");
        Ok(line)
    }

    #[instrument(skip(self))]
    pub fn remove_service_line(
        &self,
        service_id: ServiceId,
        line_id: ServiceLineId,
    ) -> Result<ServiceLine, FrontDeskError> {
        self.transact(|t| {
            let mut service = t.service(service_id)?.clone();
            service.ensure_editable()?;

            let line = t.delete_service_line(service_id, line_id)?;
            service.recompute_total(&t.lines_snapshot(service_id));
            t.save_service(service);
            Ok(line)
        })
    }

    #[instrument(skip(self))]
    pub fn record_payment(
        &self,
        service_id: ServiceId,
        amount: Money,
    ) -> Result<Service, FrontDeskError> {
        self.transact(|t| {
            let mut service = t.service(service_id)?.clone();
            service.record_payment(amount)?;
            t.save_service(service.clone());
            Ok(service)
        })
    }
}

fn reservation_view(t: &HotelTables, reservation: &Reservation) -> ReservationView {
    let reservation_id = reservation.id_typed();
    let stay_guests = t
        .stay_guests_of(reservation_id)
        .into_iter()
        .cloned()
        .collect();
    let services = t.services_of(reservation_id);
    let totals: Vec<Money> = services
        .iter()
        .map(|s| s.totals(&t.lines_snapshot(s.id)).total)
        .collect();
    let service_ids = services.iter().map(|s| s.id).collect();

    ReservationView::build(reservation, stay_guests, service_ids, totals)
}
