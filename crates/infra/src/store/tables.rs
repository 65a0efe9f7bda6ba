use std::collections::HashMap;
use std::hash::Hash;

use innkeep_core::{AggregateRoot, DomainError, DomainResult, Entity};
use innkeep_hotel::{
    Guest, GuestId, Reservation, ReservationId, Room, RoomId, Service, ServiceId, ServiceLine,
    ServiceLineId, StayGuest, StayGuestId,
};
use innkeep_parties::PartyId;

#[derive(Debug, Clone)]
struct Row<V> {
    seq: u64,
    value: V,
}

/// Keyed table that lists rows in insertion order.
#[derive(Debug, Clone)]
pub struct Table<K, V> {
    rows: HashMap<K, Row<V>>,
    next_seq: u64,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash,
{
    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key).map(|r| &r.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Insert or replace; a replaced row keeps its position.
    pub fn upsert(&mut self, key: K, value: V) {
        if let Some(row) = self.rows.get_mut(&key) {
            row.value = value;
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(key, Row { seq, value });
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.rows.remove(key).map(|r| r.value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order.
    pub fn values(&self) -> Vec<&V> {
        let mut rows: Vec<&Row<V>> = self.rows.values().collect();
        rows.sort_by_key(|r| r.seq);
        rows.into_iter().map(|r| &r.value).collect()
    }

    pub fn filter(&self, mut pred: impl FnMut(&V) -> bool) -> Vec<&V> {
        self.values().into_iter().filter(|v| pred(v)).collect()
    }
}

/// The front desk's relational state.
///
/// Referential rules live here: one guest per party, the service naming hook,
/// cascade deletes from reservations and services, and restrict deletes of
/// guests still referenced by a stay.
#[derive(Debug, Clone, Default)]
pub struct HotelTables {
    rooms: Table<RoomId, Room>,
    reservations: Table<ReservationId, Reservation>,
    guests: Table<GuestId, Guest>,
    stay_guests: Table<StayGuestId, StayGuest>,
    services: Table<ServiceId, Service>,
    service_lines: Table<ServiceLineId, ServiceLine>,
}

impl HotelTables {
    // --- rooms ---

    pub fn room(&self, id: RoomId) -> DomainResult<&Room> {
        self.rooms
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("room {id}")))
    }

    pub fn rooms(&self) -> Vec<&Room> {
        self.rooms.values()
    }

    pub fn save_room(&mut self, room: Room) {
        self.rooms.upsert(*room.id(), room);
    }

    // --- guests ---

    pub fn guest(&self, id: GuestId) -> DomainResult<&Guest> {
        self.guests
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("guest {id}")))
    }

    pub fn guests(&self) -> Vec<&Guest> {
        self.guests.values()
    }

    pub fn guest_by_party(&self, party_id: PartyId) -> Option<&Guest> {
        self.guests
            .values()
            .into_iter()
            .find(|g| g.party_id() == party_id)
    }

    /// At most one guest per party.
    pub fn insert_guest(&mut self, guest: Guest) -> DomainResult<()> {
        if let Some(existing) = self.guest_by_party(guest.party_id()) {
            return Err(DomainError::uniqueness(format!(
                "party {} already has guest {}",
                guest.party_id(),
                existing.id_typed()
            )));
        }
        self.guests.upsert(*guest.id(), guest);
        Ok(())
    }

    /// Replace an existing guest; its party link never changes.
    pub fn save_guest(&mut self, guest: Guest) -> DomainResult<()> {
        self.guest(guest.id_typed())?;
        self.guests.upsert(*guest.id(), guest);
        Ok(())
    }

    /// Remove a guest no reservation or stay refers to.
    pub fn delete_guest(&mut self, id: GuestId) -> DomainResult<Guest> {
        self.guest(id)?;

        let booked = self.reservations.filter(|r| r.reserved_by() == id).len();
        let stayed = self.stay_guests.filter(|s| s.guest_id == id).len();
        if booked + stayed > 0 {
            return Err(DomainError::constraint(format!(
                "guest {id} is referenced by {booked} reservation(s) and {stayed} stay(s)"
            )));
        }

        self.guests
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("guest {id}")))
    }

    // --- reservations ---

    pub fn reservation(&self, id: ReservationId) -> DomainResult<&Reservation> {
        self.reservations
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("reservation {id}")))
    }

    pub fn reservations(&self) -> Vec<&Reservation> {
        self.reservations.values()
    }

    pub fn save_reservation(&mut self, reservation: Reservation) {
        self.reservations.upsert(*reservation.id(), reservation);
    }

    /// Delete a reservation with its stay-guests, services and their lines.
    pub fn delete_reservation(&mut self, id: ReservationId) -> DomainResult<Reservation> {
        let reservation = self
            .reservations
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("reservation {id}")))?;

        let stay_ids: Vec<StayGuestId> = self
            .stay_guests_of(id)
            .into_iter()
            .map(|s| s.id)
            .collect();
        for stay_id in stay_ids {
            self.stay_guests.remove(&stay_id);
        }

        let service_ids: Vec<ServiceId> = self.services_of(id).into_iter().map(|s| s.id).collect();
        for service_id in service_ids {
            self.delete_service(service_id);
        }

        Ok(reservation)
    }

    // --- stay guests ---

    pub fn stay_guests_of(&self, reservation_id: ReservationId) -> Vec<&StayGuest> {
        self.stay_guests
            .filter(|s| s.reservation_id == reservation_id)
    }

    pub fn insert_stay_guests(&mut self, stay_guests: Vec<StayGuest>) {
        for stay_guest in stay_guests {
            self.stay_guests.upsert(*stay_guest.id(), stay_guest);
        }
    }

    // --- services ---

    pub fn service(&self, id: ServiceId) -> DomainResult<&Service> {
        self.services
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("service {id}")))
    }

    pub fn services_of(&self, reservation_id: ReservationId) -> Vec<&Service> {
        self.services
            .filter(|s| s.reservation_id == reservation_id)
    }

    /// Batch insert; each new service is named by the creation hook.
    pub fn insert_services(&mut self, services: Vec<Service>) {
        for mut service in services {
            service.assign_name();
            self.services.upsert(service.id, service);
        }
    }

    pub fn save_service(&mut self, service: Service) {
        self.services.upsert(service.id, service);
    }

    fn delete_service(&mut self, id: ServiceId) {
        self.services.remove(&id);
        let line_ids: Vec<ServiceLineId> = self.lines_of(id).into_iter().map(|l| l.id).collect();
        for line_id in line_ids {
            self.service_lines.remove(&line_id);
        }
    }

    // --- service lines ---

    pub fn lines_of(&self, service_id: ServiceId) -> Vec<&ServiceLine> {
        self.service_lines
            .filter(|l| l.service_id == service_id)
    }

    /// Owned copies, for totals computations.
    pub fn lines_snapshot(&self, service_id: ServiceId) -> Vec<ServiceLine> {
        self.lines_of(service_id).into_iter().cloned().collect()
    }

    pub fn insert_service_lines(&mut self, lines: Vec<ServiceLine>) -> DomainResult<()> {
        for line in lines {
            if !self.services.contains(&line.service_id) {
                return Err(DomainError::not_found(format!("service {}", line.service_id)));
            }
            self.service_lines.upsert(*line.id(), line);
        }
        Ok(())
    }

    pub fn delete_service_line(
        &mut self,
        service_id: ServiceId,
        line_id: ServiceLineId,
    ) -> DomainResult<ServiceLine> {
        match self.service_lines.get(&line_id) {
            Some(line) if line.service_id == service_id => {}
            _ => {
                return Err(DomainError::not_found(format!(
                    "line {line_id} on service {service_id}"
                )));
            }
        }
        self.service_lines
            .remove(&line_id)
            .ok_or_else(|| DomainError::not_found(format!("line {line_id}")))
    }
}
