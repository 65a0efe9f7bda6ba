use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use innkeep_core::{Aggregate, AggregateRoot, DomainError, Event, Money, Workflow};

use crate::guest::GuestId;
use crate::room::RoomId;

innkeep_core::typed_id!(ReservationId, "Reservation identifier.");

/// Reservation lifecycle, forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    Draft,
    Open,
    Closed,
}

impl ReservationState {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationState::Draft => "draft",
            ReservationState::Open => "open",
            ReservationState::Closed => "closed",
        }
    }
}

impl core::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Workflow for ReservationState {
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (ReservationState::Draft, ReservationState::Open),
        (ReservationState::Open, ReservationState::Closed),
    ];
}

/// Desk buttons on a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationAction {
    Open,
    Closed,
}

impl ReservationAction {
    pub fn target(self) -> ReservationState {
        match self {
            ReservationAction::Open => ReservationState::Open,
            ReservationAction::Closed => ReservationState::Closed,
        }
    }
}

/// Aggregate root: Reservation.
///
/// Stay-guests and services are separate records owned by the reservation; the engine
/// creates them as side effects of the open transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    id: ReservationId,
    room_id: RoomId,
    reserved_by: GuestId,
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    price: Money,
    observations: String,
    state: ReservationState,
    version: u64,
    created: bool,
}

impl Reservation {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: ReservationId) -> Self {
        Self {
            id,
            room_id: RoomId::generate(),
            reserved_by: GuestId::generate(),
            check_in: None,
            check_out: None,
            price: Money::ZERO,
            observations: String::new(),
            state: ReservationState::Draft,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ReservationId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn reserved_by(&self) -> GuestId {
        self.reserved_by
    }

    pub fn check_in(&self) -> Option<DateTime<Utc>> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<DateTime<Utc>> {
        self.check_out
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn observations(&self) -> &str {
        &self.observations
    }

    pub fn state(&self) -> ReservationState {
        self.state
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Stay-guests and observations are editable until the stay is closed.
    pub fn can_edit_stay(&self) -> bool {
        self.state != ReservationState::Closed
    }

    pub fn available_actions(&self) -> Vec<ReservationAction> {
        [ReservationAction::Open, ReservationAction::Closed]
            .into_iter()
            .filter(|a| self.state.can_transition_to(a.target()))
            .collect()
    }

    /// Sum of the totals of every service attached to the reservation.
    pub fn total_reservation(service_totals: impl IntoIterator<Item = Money>) -> Money {
        service_totals.into_iter().sum()
    }
}

impl AggregateRoot for Reservation {
    type Id = ReservationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateReservation.
///
/// The caller checks that the room is free and resolves the default price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReservation {
    pub reservation_id: ReservationId,
    pub room_id: RoomId,
    pub reserved_by: GuestId,
    pub price: Money,
    pub observations: String,
    pub occurred_at: DateTime<Utc>,
}

/// Field edits; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationChanges {
    pub room_id: Option<RoomId>,
    pub reserved_by: Option<GuestId>,
    pub price: Option<Money>,
    pub observations: Option<String>,
}

impl ReservationChanges {
    pub fn is_empty(&self) -> bool {
        self.room_id.is_none()
            && self.reserved_by.is_none()
            && self.price.is_none()
            && self.observations.is_none()
    }
}

/// Command: ChangeReservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReservation {
    pub reservation_id: ReservationId,
    pub changes: ReservationChanges,
    pub occurred_at: DateTime<Utc>,
}

/// Command: OpenReservation (check-in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenReservation {
    pub reservation_id: ReservationId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CloseReservation (check-out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseReservation {
    pub reservation_id: ReservationId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationCommand {
    CreateReservation(CreateReservation),
    ChangeReservation(ChangeReservation),
    OpenReservation(OpenReservation),
    CloseReservation(CloseReservation),
}

/// Event: ReservationCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCreated {
    pub reservation_id: ReservationId,
    pub room_id: RoomId,
    pub reserved_by: GuestId,
    pub price: Money,
    pub observations: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReservationChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationChanged {
    pub reservation_id: ReservationId,
    pub changes: ReservationChanges,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReservationOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationOpened {
    pub reservation_id: ReservationId,
    pub check_in: DateTime<Utc>,
}

/// Event: ReservationClosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationClosed {
    pub reservation_id: ReservationId,
    pub check_out: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationEvent {
    ReservationCreated(ReservationCreated),
    ReservationChanged(ReservationChanged),
    ReservationOpened(ReservationOpened),
    ReservationClosed(ReservationClosed),
}

impl Event for ReservationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ReservationEvent::ReservationCreated(_) => "hotel.reservation.created",
            ReservationEvent::ReservationChanged(_) => "hotel.reservation.changed",
            ReservationEvent::ReservationOpened(_) => "hotel.reservation.opened",
            ReservationEvent::ReservationClosed(_) => "hotel.reservation.closed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ReservationEvent::ReservationCreated(e) => e.occurred_at,
            ReservationEvent::ReservationChanged(e) => e.occurred_at,
            ReservationEvent::ReservationOpened(e) => e.check_in,
            ReservationEvent::ReservationClosed(e) => e.check_out,
        }
    }
}

impl Aggregate for Reservation {
    type Command = ReservationCommand;
    type Event = ReservationEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ReservationEvent::ReservationCreated(e) => {
                self.id = e.reservation_id;
                self.room_id = e.room_id;
                self.reserved_by = e.reserved_by;
                self.price = e.price;
                self.observations = e.observations.clone();
                self.state = ReservationState::Draft;
                self.created = true;
            }
            ReservationEvent::ReservationChanged(e) => {
                if let Some(room_id) = e.changes.room_id {
                    self.room_id = room_id;
                }
                if let Some(guest_id) = e.changes.reserved_by {
                    self.reserved_by = guest_id;
                }
                if let Some(price) = e.changes.price {
                    self.price = price;
                }
                if let Some(observations) = &e.changes.observations {
                    self.observations = observations.clone();
                }
            }
            ReservationEvent::ReservationOpened(e) => {
                self.state = ReservationState::Open;
                self.check_in = Some(e.check_in);
            }
            ReservationEvent::ReservationClosed(e) => {
                self.state = ReservationState::Closed;
                self.check_out = Some(e.check_out);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ReservationCommand::CreateReservation(cmd) => self.handle_create(cmd),
            ReservationCommand::ChangeReservation(cmd) => self.handle_change(cmd),
            ReservationCommand::OpenReservation(cmd) => self.handle_open(cmd),
            ReservationCommand::CloseReservation(cmd) => self.handle_close(cmd),
        }
    }
}

impl Reservation {
    fn ensure_reservation_id(&self, reservation_id: ReservationId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("reservation {reservation_id}")));
        }
        if self.id != reservation_id {
            return Err(DomainError::invariant("reservation_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateReservation) -> Result<Vec<ReservationEvent>, DomainError> {
        if self.created {
            return Err(DomainError::uniqueness("reservation already exists"));
        }

        Ok(vec![ReservationEvent::ReservationCreated(ReservationCreated {
            reservation_id: cmd.reservation_id,
            room_id: cmd.room_id,
            reserved_by: cmd.reserved_by,
            price: cmd.price,
            observations: cmd.observations.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change(&self, cmd: &ChangeReservation) -> Result<Vec<ReservationEvent>, DomainError> {
        self.ensure_reservation_id(cmd.reservation_id)?;

        let changes = &cmd.changes;
        if changes.is_empty() {
            return Err(DomainError::validation("no changes requested"));
        }

        if self.state != ReservationState::Draft {
            let locked = [
                ("room", changes.room_id.is_some_and(|r| r != self.room_id)),
                (
                    "reserved_by",
                    changes.reserved_by.is_some_and(|g| g != self.reserved_by),
                ),
                ("price", changes.price.is_some_and(|p| p != self.price)),
            ];
            if let Some((field, _)) = locked.iter().find(|(_, changed)| *changed) {
                return Err(DomainError::invariant(format!(
                    "{field} is read-only once the reservation is {}",
                    self.state
                )));
            }
        }

        if changes.observations.is_some() && !self.can_edit_stay() {
            return Err(DomainError::invariant(
                "observations are read-only on a closed reservation",
            ));
        }

        Ok(vec![ReservationEvent::ReservationChanged(ReservationChanged {
            reservation_id: cmd.reservation_id,
            changes: changes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_open(&self, cmd: &OpenReservation) -> Result<Vec<ReservationEvent>, DomainError> {
        self.ensure_reservation_id(cmd.reservation_id)?;
        self.state.transition_to(ReservationState::Open)?;

        Ok(vec![ReservationEvent::ReservationOpened(ReservationOpened {
            reservation_id: cmd.reservation_id,
            check_in: cmd.occurred_at,
        })])
    }

    fn handle_close(&self, cmd: &CloseReservation) -> Result<Vec<ReservationEvent>, DomainError> {
        self.ensure_reservation_id(cmd.reservation_id)?;
        self.state.transition_to(ReservationState::Closed)?;

        Ok(vec![ReservationEvent::ReservationClosed(ReservationClosed {
            reservation_id: cmd.reservation_id,
            check_out: cmd.occurred_at,
        })])
    }
}
