//! Public endpoints behind the acknowledgment link sent to guardians.
//!
//! - `GET /api/notifications/{id}`: the full notification record, or 404.
//! - `POST /api/notifications/{id}/ack`: marks the notification as seen.
//!   Repeating the call still succeeds; an unknown id is a 404.
//!
//! Neither route requires a token; the id in the link is the only key.

mod ack;
mod get;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/notifications";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{id}", get().to(get::process))
        .route("/{id}/ack", post().to(ack::process))
}
