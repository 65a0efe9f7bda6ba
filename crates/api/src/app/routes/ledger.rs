use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use innkeep_hotel::{ServiceId, ServiceLineId};
use innkeep_infra::NewServiceLine;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(get_statement))
        .route("/:id/lines", post(add_line))
        .route("/:id/lines/:line_id", delete(remove_line))
        .route("/:id/payment", post(record_payment))
}

pub async fn get_statement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let service_id: ServiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.service_statement(service_id) {
        Ok(statement) => Json(statement).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn add_line(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<NewServiceLine>,
) -> axum::response::Response {
    let service_id: ServiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.add_service_line(service_id, body) {
        Ok(line) => (StatusCode::CREATED, Json(line)).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

pub async fn remove_line(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, line_id)): Path<(String, String)>,
) -> axum::response::Response {
    let service_id: ServiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let line_id: ServiceLineId = match errors::parse_id(&line_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.desk.remove_service_line(service_id, line_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}

/// Set the amount paid and return the refreshed statement.
pub async fn record_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PaymentRequest>,
) -> axum::response::Response {
    let service_id: ServiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let statement = services
        .desk
        .record_payment(service_id, body.amount)
        .and_then(|_| services.desk.service_statement(service_id));

    match statement {
        Ok(statement) => Json(statement).into_response(),
        Err(e) => errors::front_desk_error_to_response(e),
    }
}
