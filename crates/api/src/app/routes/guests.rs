use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use innkeep_hotel::GuestId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_guest).get(search_guests))
        .route(
            "/:id",
            get(get_guest).patch(change_admission).delete(remove_guest),
        )
}

pub async fn register_guest(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterGuestRequest>,
) -> axum::response::Response {
    let guest = match services
        .desk
        .register_guest(body.party_id, body.is_admitted.unwrap_or(true))
    {
        Ok(g) => g,
        Err(e) => return errors::front_desk_error_to_response(e),
    };

    match services.desk.guest_profile(guest.id_typed(), services.today()) {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn search_guests(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::GuestSearchQuery>,
) -> axum::response::Response {
    let clause = match query.clause() {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.desk.search_guests(clause.as_ref(), services.today()) {
        Ok(profiles) => Json(profiles).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn get_guest(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let guest_id: GuestId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.guest_profile(guest_id, services.today()) {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn change_admission(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::GuestAdmissionRequest>,
) -> axum::response::Response {
    let guest_id: GuestId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let changed = services
        .desk
        .set_guest_admission(guest_id, body.is_admitted)
        .and_then(|_| services.desk.guest_profile(guest_id, services.today()));

    match changed {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn remove_guest(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let guest_id: GuestId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.remove_guest(guest_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}
