//! # Acknowledgment
//!
//! Backs `POST /api/notifications/{id}/ack`, called when a guardian confirms
//! they have read the notice.
//!
//! ## Workflow
//!
//! 1.  **Update**: `mark_seen` sets `seen` and stamps `seen_at` only on the first
//!     visit, so repeating the call is harmless.
//! 2.  **Response**: `{"success": true}`, or `404` when no row has that id.

use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::AckResponse;
use log::info;
use rusqlite::{params, Connection};

/// Handler for `POST /api/notifications/{id}/ack`. Public.
///
/// # Returns
/// - `200 OK` with [`AckResponse`] on every successful call, repeats included.
/// - `404 Not Found` for an unknown id.
pub(crate) async fn process(
    id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let conn = state.open_db()?;
    if !mark_seen(&conn, id)? {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }
    info!("Notification {} acknowledged", id);
    Ok(HttpResponse::Ok().json(AckResponse { success: true }))
}

/// Sets `seen`, keeping the time of the first visit. Returns `false` for an unknown id.
///
/// The delivery status is not consulted: a `failed` notification can still be seen.
fn mark_seen(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let now = db::now();
    let changed = conn.execute(
        "UPDATE sms_notifications
            SET seen = 1, seen_at = COALESCE(seen_at, ?1), updated_at = ?1
          WHERE id = ?2",
        params![now, id],
    )?;
    Ok(changed > 0)
}
