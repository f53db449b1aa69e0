//! Bulk guardian SMS and its reporting endpoints. All routes need a bearer token.
//!
//! - `POST /api/sms/send-bulk`: multipart upload with a `file` part (CSV
//!   attendance sheet) and the text fields `from_date`, `to_date`, `filter`
//!   (`<50`, `<65`, `<75` or blank), `department` and `year`. Runs the whole
//!   batch before answering with `{success, sent, skipped, skipped_list}`.
//! - `GET /api/sms/results`: every notification, newest first. Department
//!   heads only see their own department.
//! - `GET /api/sms/uploads`: the audit records of processed rows, scoped the
//!   same way.

mod results;
mod send_bulk;
mod uploads;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/sms";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/send-bulk", post().to(send_bulk::process))
        .route("/results", get().to(results::process))
        .route("/uploads", get().to(uploads::process))
}
