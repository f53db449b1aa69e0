//! # Notification Lookup
//!
//! Backs `GET /api/notifications/{id}`, which the guardian-facing acknowledgment
//! page calls to show the notice behind an SMS link. No token is required: the
//! id in the link is the only credential.

use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/notifications/{id}`.
///
/// # Arguments
/// * `id` - Notification id taken from the acknowledgment link.
///
/// # Returns
/// - `200 OK` with the `Notification` as JSON.
/// - `404 Not Found` for an unknown id.
pub(crate) async fn process(
    id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.open_db()?;
    match db::find_notification(&conn, id.into_inner())? {
        Some(notification) => Ok(HttpResponse::Ok().json(notification)),
        None => Err(ApiError::NotFound("Notification not found".to_string())),
    }
}
