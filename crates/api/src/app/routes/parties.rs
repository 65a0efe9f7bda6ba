use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use innkeep_hotel::PartyDirectory;
use innkeep_parties::PartyId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_party))
        .route("/:id", get(get_party))
}

pub async fn register_party(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterPartyRequest>,
) -> axum::response::Response {
    match services.register_party(body) {
        Ok(party) => (
            StatusCode::CREATED,
            Json(dto::PartyResponse::from(&party)),
        )
            .into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn get_party(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let party_id: PartyId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.parties.party(party_id) {
        Some(party) => Json(dto::PartyResponse::from(&party)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "party not found"),
    }
}
