use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use innkeep_core::DomainError;
use innkeep_infra::{FrontDeskError, RegistryError, StoreError};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::UniquenessViolation(_) => {
            json_error(StatusCode::CONFLICT, "uniqueness_violation", message)
        }
        DomainError::InvalidTransition { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_transition", message)
        }
        DomainError::InvariantViolation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", message)
        }
        DomainError::DomainConstraint(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "domain_constraint", message)
        }
    }
}

fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!("store failure: {err}");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        err.to_string(),
    )
}

pub fn front_desk_error_to_response(err: FrontDeskError) -> axum::response::Response {
    match err {
        FrontDeskError::Domain(e) => domain_error_to_response(e),
        FrontDeskError::Store(e) => store_error_to_response(e),
    }
}

pub fn registry_error_to_response(err: RegistryError) -> axum::response::Response {
    match err {
        RegistryError::Domain(e) => domain_error_to_response(e),
        RegistryError::Store(e) => store_error_to_response(e),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a typed identifier from a path segment.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(domain_error_to_response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_documented_statuses() {
        let cases = [
            (DomainError::not_found("room"), StatusCode::NOT_FOUND),
            (DomainError::validation("qty"), StatusCode::BAD_REQUEST),
            (DomainError::invalid_id("x"), StatusCode::BAD_REQUEST),
            (DomainError::uniqueness("guest"), StatusCode::CONFLICT),
            (
                DomainError::invalid_transition("free", "to_clean"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::invariant("price"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::constraint("room"), StatusCode::UNPROCESSABLE_ENTITY),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_to_response(err).status(), status);
        }
    }

    #[test]
    fn store_failures_are_internal_errors() {
        let err = FrontDeskError::Store(StoreError::Poisoned("hotel tables"));
        assert_eq!(
            front_desk_error_to_response(err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
