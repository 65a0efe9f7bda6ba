use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use innkeep_hotel::{RoomAction, RoomId};
use innkeep_infra::{NewRoom, RoomFilter};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_room).get(list_rooms))
        .route("/:id", get(get_room))
        .route("/:id/:action", post(apply_action))
}

pub async fn register_room(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewRoom>,
) -> axum::response::Response {
    let room = match services.desk.register_room(body) {
        Ok(r) => r,
        Err(e) => return errors::front_desk_error_to_response(e),
    };

    match services.desk.room_view(room.id_typed()) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn list_rooms(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::RoomListQuery>,
) -> axum::response::Response {
    let text = match query.clause() {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let filter = RoomFilter {
        free_only: query.free,
        text,
    };

    match services.desk.list_rooms(&filter) {
        Ok(rooms) => Json(rooms).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn get_room(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let room_id: RoomId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.room_view(room_id) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

/// `to_clean`, `free` or `disabled`.
pub async fn apply_action(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, action)): Path<(String, String)>,
) -> axum::response::Response {
    let room_id: RoomId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let action = match RoomAction::parse(&action) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.desk.apply_room_action(room_id, action) {
        return errors::front_desk_error_to_response(e);
    }
    match services.desk.room_view(room_id) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}
