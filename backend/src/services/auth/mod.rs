//! Staff sign-in.
//!
//! - `POST /api/auth/login`: takes `{username, password}` and returns a signed
//!   bearer token with the caller's role and department.

mod login;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/login", post().to(login::process))
}
