//! Upload audit listing for `GET /api/sms/uploads`.
//!
//! Every row that passed the threshold leaves an audit record, even when its
//! phone number was later rejected. Scoped by role like the results view.

use crate::auth::AuthUser;
use crate::db::{self, UPLOAD_BATCH_COLUMNS};
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::upload_batch::UploadBatch;
use rusqlite::{params, Connection};

/// Handler for `GET /api/sms/uploads`.
///
/// # Returns
/// - `200 OK` with the audit records, newest first.
/// - `401 Unauthorized` without a valid token.
pub(crate) async fn process(
    user: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.open_db()?;
    let uploads = list_uploads(&conn, user.department_scope())?;
    Ok(HttpResponse::Ok().json(uploads))
}

fn list_uploads(conn: &Connection, department: Option<&str>) -> rusqlite::Result<Vec<UploadBatch>> {
    let mut sql = format!("SELECT {} FROM upload_batches", UPLOAD_BATCH_COLUMNS);
    if department.is_some() {
        sql.push_str(" WHERE department = ?1");
    }
    sql.push_str(" ORDER BY id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = match department {
        Some(dept) => stmt.query_map(params![dept], db::upload_batch_from_row)?,
        None => stmt.query_map([], db::upload_batch_from_row)?,
    };
    rows.collect()
}
