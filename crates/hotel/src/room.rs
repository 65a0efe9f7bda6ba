use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use innkeep_core::{Aggregate, AggregateRoot, DomainError, Event, Money, Workflow};
use innkeep_products::{Product, ProductId};

use crate::ports::ProductCatalog;
use crate::search::TextClause;

innkeep_core::typed_id!(RoomId, "Room identifier.");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Simple,
    Matrimonial,
    Double,
}

/// Occupancy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    Free,
    Disabled,
    Taken,
    ToClean,
}

impl RoomState {
    pub const ALL: [RoomState; 4] = [
        RoomState::Free,
        RoomState::Disabled,
        RoomState::Taken,
        RoomState::ToClean,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoomState::Free => "free",
            RoomState::Disabled => "disabled",
            RoomState::Taken => "taken",
            RoomState::ToClean => "to_clean",
        }
    }
}

impl core::fmt::Display for RoomState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manual (desk-operated) transitions. Occupying and releasing a room at check-in and
/// check-out are reserved to the reservation engine ([`RoomCommand::OccupyRoom`],
/// [`RoomCommand::ReleaseRoom`]).
impl Workflow for RoomState {
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (RoomState::Taken, RoomState::ToClean),
        (RoomState::ToClean, RoomState::Free),
        (RoomState::Disabled, RoomState::Free),
        (RoomState::Free, RoomState::Disabled),
    ];
}

/// Desk buttons on a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomAction {
    ToClean,
    Free,
    Disabled,
}

impl RoomAction {
    pub const ALL: [RoomAction; 3] = [RoomAction::ToClean, RoomAction::Free, RoomAction::Disabled];

    pub fn target(self) -> RoomState {
        match self {
            RoomAction::ToClean => RoomState::ToClean,
            RoomAction::Free => RoomState::Free,
            RoomAction::Disabled => RoomState::Disabled,
        }
    }

    /// Whether the button is shown for a room in `state`.
    pub fn is_enabled(self, state: RoomState) -> bool {
        match self {
            RoomAction::ToClean => state == RoomState::Taken,
            RoomAction::Free => matches!(state, RoomState::ToClean | RoomState::Disabled),
            RoomAction::Disabled => state == RoomState::Free,
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "to_clean" => Ok(RoomAction::ToClean),
            "free" => Ok(RoomAction::Free),
            "disabled" => Ok(RoomAction::Disabled),
            other => Err(DomainError::validation(format!(
                "unknown room action '{other}' (expected to_clean, free or disabled)"
            ))),
        }
    }
}

/// Aggregate root: Room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    product_id: ProductId,
    room_number: String,
    room_type: RoomType,
    max_guests: u32,
    state: RoomState,
    version: u64,
    created: bool,
}

impl Room {
    /// Create an empty, not-yet-registered aggregate instance.
    pub fn empty(id: RoomId) -> Self {
        Self {
            id,
            product_id: ProductId::generate(),
            room_number: String::new(),
            room_type: RoomType::Simple,
            max_guests: 1,
            state: RoomState::Free,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> RoomId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn room_number(&self) -> &str {
        &self.room_number
    }

    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    pub fn max_guests(&self) -> u32 {
        self.max_guests
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn is_free(&self) -> bool {
        self.state == RoomState::Free
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn available_actions(&self) -> Vec<RoomAction> {
        RoomAction::ALL
            .into_iter()
            .filter(|a| a.is_enabled(self.state))
            .collect()
    }

    /// Reservations may only reference free rooms.
    pub fn ensure_bookable(&self) -> Result<(), DomainError> {
        if !self.is_free() {
            return Err(DomainError::constraint(format!(
                "room {} is {}, only free rooms can be booked",
                self.room_number, self.state
            )));
        }
        Ok(())
    }

    /// Current catalog price of the room product.
    pub fn price(&self, catalog: &impl ProductCatalog) -> Option<Money> {
        catalog.list_price(self.product_id)
    }

    /// "[room_number] - catalog name".
    pub fn rec_name(&self, product: &Product) -> String {
        format!("[{}] - {}", self.room_number, product.name())
    }

    /// Search over the catalog name and the room number.
    pub fn matches(&self, product_name: &str, clause: &TextClause) -> bool {
        clause.matches_any(&[product_name, &self.room_number])
    }
}

impl AggregateRoot for Room {
    type Id = RoomId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterRoom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRoom {
    pub room_id: RoomId,
    pub product_id: ProductId,
    pub room_number: String,
    pub room_type: RoomType,
    pub max_guests: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApplyRoomAction (desk button, checked against the transition table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRoomAction {
    pub room_id: RoomId,
    pub action: RoomAction,
    pub occurred_at: DateTime<Utc>,
}

/// Command: OccupyRoom (check-in; free -> taken).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupyRoom {
    pub room_id: RoomId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReleaseRoom (check-out; any state -> to_clean).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRoom {
    pub room_id: RoomId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomCommand {
    RegisterRoom(RegisterRoom),
    ApplyRoomAction(ApplyRoomAction),
    OccupyRoom(OccupyRoom),
    ReleaseRoom(ReleaseRoom),
}

/// Event: RoomRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRegistered {
    pub room_id: RoomId,
    pub product_id: ProductId,
    pub room_number: String,
    pub room_type: RoomType,
    pub max_guests: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RoomStateChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateChanged {
    pub room_id: RoomId,
    pub from: RoomState,
    pub to: RoomState,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomEvent {
    RoomRegistered(RoomRegistered),
    RoomStateChanged(RoomStateChanged),
}

impl Event for RoomEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::RoomRegistered(_) => "hotel.room.registered",
            RoomEvent::RoomStateChanged(_) => "hotel.room.state_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RoomEvent::RoomRegistered(e) => e.occurred_at,
            RoomEvent::RoomStateChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Room {
    type Command = RoomCommand;
    type Event = RoomEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RoomEvent::RoomRegistered(e) => {
                self.id = e.room_id;
                self.product_id = e.product_id;
                self.room_number = e.room_number.clone();
                self.room_type = e.room_type;
                self.max_guests = e.max_guests;
                self.state = RoomState::Free;
                self.created = true;
            }
            RoomEvent::RoomStateChanged(e) => {
                self.state = e.to;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RoomCommand::RegisterRoom(cmd) => self.handle_register(cmd),
            RoomCommand::ApplyRoomAction(cmd) => self.handle_action(cmd),
            RoomCommand::OccupyRoom(cmd) => self.handle_occupy(cmd),
            RoomCommand::ReleaseRoom(cmd) => self.handle_release(cmd),
        }
    }
}

impl Room {
    fn ensure_room_id(&self, room_id: RoomId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("room {room_id}")));
        }
        if self.id != room_id {
            return Err(DomainError::invariant("room_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(&self, cmd: &RegisterRoom) -> Result<Vec<RoomEvent>, DomainError> {
        if self.created {
            return Err(DomainError::uniqueness("room already exists"));
        }
        if cmd.room_number.trim().is_empty() {
            return Err(DomainError::validation("room number cannot be empty"));
        }
        if cmd.max_guests == 0 {
            return Err(DomainError::validation("max_guests must be at least 1"));
        }

        Ok(vec![RoomEvent::RoomRegistered(RoomRegistered {
            room_id: cmd.room_id,
            product_id: cmd.product_id,
            room_number: cmd.room_number.trim().to_string(),
            room_type: cmd.room_type,
            max_guests: cmd.max_guests,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_action(&self, cmd: &ApplyRoomAction) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_room_id(cmd.room_id)?;
        let to = self.state.transition_to(cmd.action.target())?;

        Ok(vec![RoomEvent::RoomStateChanged(RoomStateChanged {
            room_id: cmd.room_id,
            from: self.state,
            to,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_occupy(&self, cmd: &OccupyRoom) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_room_id(cmd.room_id)?;
        self.ensure_bookable()?;

        Ok(vec![RoomEvent::RoomStateChanged(RoomStateChanged {
            room_id: cmd.room_id,
            from: self.state,
            to: RoomState::Taken,
            occurred_at: cmd.occurred_at,
        })])
    }

    /// Check-out always leaves the room dirty, whatever the desk did in between.
    fn handle_release(&self, cmd: &ReleaseRoom) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_room_id(cmd.room_id)?;
        if self.state == RoomState::ToClean {
            return Ok(Vec::new());
        }

        Ok(vec![RoomEvent::RoomStateChanged(RoomStateChanged {
            room_id: cmd.room_id,
            from: self.state,
            to: RoomState::ToClean,
            occurred_at: cmd.occurred_at,
        })])
    }
}
