//! # Delivery Results
//!
//! Backs `GET /api/sms/results`, the staff view of every notification and its
//! delivery and acknowledgment state.
//!
//! ## Workflow
//!
//! 1.  **Authentication**: the [`AuthUser`] extractor rejects requests without a
//!     valid bearer token before `process` runs.
//! 2.  **Scoping**: operators get every department. A department head gets only
//!     rows whose department matches the one in their token.
//! 3.  **Query**: `list_notifications` returns rows newest first, serialized as
//!     `common::model::notification::Notification`.

use crate::auth::AuthUser;
use crate::db::{self, NOTIFICATION_COLUMNS};
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::notification::Notification;
use rusqlite::{params, Connection};

/// Handler for `GET /api/sms/results`.
///
/// # Returns
/// - `200 OK` with a JSON array of notifications, newest first.
/// - `401 Unauthorized` without a valid token.
/// - `500 Internal Server Error` when the database cannot be read.
pub(crate) async fn process(
    user: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.open_db()?;
    let notifications = list_notifications(&conn, user.department_scope())?;
    Ok(HttpResponse::Ok().json(notifications))
}

/// All notifications, newest first, optionally restricted to one department.
pub(crate) fn list_notifications(
    conn: &Connection,
    department: Option<&str>,
) -> rusqlite::Result<Vec<Notification>> {
    match department {
        Some(dept) => {
            let sql = format!(
                "SELECT {} FROM sms_notifications WHERE department = ?1 ORDER BY id DESC",
                NOTIFICATION_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![dept], db::notification_from_row)?;
            rows.collect()
        }
        None => {
            let sql = format!(
                "SELECT {} FROM sms_notifications ORDER BY id DESC",
                NOTIFICATION_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], db::notification_from_row)?;
            rows.collect()
        }
    }
}
