use serde::{Deserialize, Serialize};

use innkeep_core::Entity;

use crate::guest::GuestId;
use crate::reservation::ReservationId;

innkeep_core::typed_id!(StayGuestId, "Stay-guest association identifier.");

/// A guest who actually occupied the room during a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayGuest {
    pub id: StayGuestId,
    pub reservation_id: ReservationId,
    pub guest_id: GuestId,
}

impl StayGuest {
    pub fn new(reservation_id: ReservationId, guest_id: GuestId) -> Self {
        Self {
            id: StayGuestId::generate(),
            reservation_id,
            guest_id,
        }
    }
}

impl Entity for StayGuest {
    type Id = StayGuestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
