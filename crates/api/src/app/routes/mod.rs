use axum::Router;

pub mod guests;
pub mod ledger;
pub mod parties;
pub mod products;
pub mod reservations;
pub mod rooms;
pub mod system;

/// Router for all front-desk endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/parties", parties::router())
        .nest("/products", products::router())
        .nest("/guests", guests::router())
        .nest("/rooms", rooms::router())
        .nest("/reservations", reservations::router())
        .nest("/services", ledger::router())
}
