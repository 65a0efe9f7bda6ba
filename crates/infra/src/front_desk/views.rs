//! Read views assembled by the front desk, with derived fields filled in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use innkeep_core::Money;
use innkeep_hotel::{
    GuestId, Reservation, ReservationAction, ReservationId, ReservationState, Room, RoomAction,
    RoomId, RoomState, RoomType, ServiceId, StayGuest,
};
use innkeep_products::{Product, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    pub product_id: ProductId,
    pub room_number: String,
    pub room_type: RoomType,
    pub max_guests: u32,
    pub state: RoomState,
    pub rec_name: String,
    pub price: Option<Money>,
    pub available_actions: Vec<RoomAction>,
}

impl RoomView {
    pub fn build(room: &Room, product: Option<&Product>) -> Self {
        let rec_name = match product {
            Some(product) => room.rec_name(product),
            None => format!("[{}]", room.room_number()),
        };

        Self {
            id: room.id_typed(),
            product_id: room.product_id(),
            room_number: room.room_number().to_string(),
            room_type: room.room_type(),
            max_guests: room.max_guests(),
            state: room.state(),
            rec_name,
            price: product.and_then(Product::list_price),
            available_actions: room.available_actions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationView {
    pub id: ReservationId,
    pub room_id: RoomId,
    pub reserved_by: GuestId,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub price: Money,
    pub observations: String,
    pub state: ReservationState,
    pub stay_guests: Vec<StayGuest>,
    pub services: Vec<ServiceId>,
    pub total_reservation: Money,
    pub available_actions: Vec<ReservationAction>,
}

impl ReservationView {
    pub fn build(
        reservation: &Reservation,
        stay_guests: Vec<StayGuest>,
        services: Vec<ServiceId>,
        service_totals: impl IntoIterator<Item = Money>,
    ) -> Self {
        Self {
            id: reservation.id_typed(),
            room_id: reservation.room_id(),
            reserved_by: reservation.reserved_by(),
            check_in: reservation.check_in(),
            check_out: reservation.check_out(),
            price: reservation.price(),
            observations: reservation.observations().to_string(),
            state: reservation.state(),
            stay_guests,
            services,
            total_reservation: Reservation::total_reservation(service_totals),
            available_actions: reservation.available_actions(),
        }
    }
}
