use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use innkeep_hotel::{Reservation, ReservationChanges, ReservationId};
use innkeep_infra::{FrontDeskError, NewReservation, ReservationView};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_reservation).get(list_reservations))
        .route("/open", post(open_reservations))
        .route("/close", post(close_reservations))
        .route(
            "/:id",
            get(get_reservation)
                .patch(change_reservation)
                .delete(delete_reservation),
        )
        .route("/:id/guests", post(add_stay_guest))
}

fn views(
    services: &AppServices,
    reservations: &[Reservation],
) -> Result<Vec<ReservationView>, FrontDeskError> {
    reservations
        .iter()
        .map(|r| services.desk.reservation_view(r.id_typed()))
        .collect()
}

pub async fn create_reservation(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewReservation>,
) -> axum::response::Response {
    let created = services
        .desk
        .create_reservation(body)
        .and_then(|r| services.desk.reservation_view(r.id_typed()));

    match created {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn list_reservations(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ReservationListQuery>,
) -> axum::response::Response {
    match services.desk.list_reservations(query.state) {
        Ok(views) => Json(views).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn get_reservation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let reservation_id: ReservationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.reservation_view(reservation_id) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn change_reservation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(changes): Json<ReservationChanges>,
) -> axum::response::Response {
    let reservation_id: ReservationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let changed = services
        .desk
        .change_reservation(reservation_id, changes)
        .and_then(|_| services.desk.reservation_view(reservation_id));

    match changed {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn delete_reservation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let reservation_id: ReservationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.delete_reservation(reservation_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn add_stay_guest(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AddStayGuestRequest>,
) -> axum::response::Response {
    let reservation_id: ReservationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.add_stay_guest(reservation_id, body.guest_id) {
        Ok(stay_guest) => (StatusCode::CREATED, Json(stay_guest)).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

/// Check in a batch of reservations. Either all of them open or none does.
pub async fn open_reservations(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ReservationBatchRequest>,
) -> axum::response::Response {
    let opened = services
        .desk
        .open_reservations(&body.ids)
        .and_then(|opened| views(&services, &opened));

    match opened {
        Ok(views) => Json(views).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn close_reservations(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ReservationBatchRequest>,
) -> axum::response::Response {
    let closed = services
        .desk
        .close_reservations(&body.ids)
        .and_then(|closed| views(&services, &closed));

    match closed {
        Ok(views) => Json(views).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}
