//! # Bulk Send
//!
//! ## Workflow
//!
//! 1.  **Form**: `read_form` drains the multipart stream into the uploaded file
//!     and the text fields (`filter`, `department`, `year`, `from_date`,
//!     `to_date`), enforcing the configured upload limit.
//! 2.  **Validation**: the filter is parsed and the sheet is read into rows. A
//!     department head always uploads for their own department.
//! 3.  **Pipeline**: `bulk_sms::run_batch` handles the rows in file order on one
//!     connection and returns the sent and skipped lists.

use crate::auth::AuthUser;
use crate::bulk_sms::{self, rows, AttendanceFilter, BatchRequest, Dispatcher};
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::responses::BulkSendSummary;
use futures_util::StreamExt;
use log::error;
use std::collections::HashMap;

/// Handler for `POST /api/sms/send-bulk`.
///
/// - `200 OK` with the [`BulkSendSummary`] once every row has been processed.
/// - `400 Bad Request` when the form is unusable (no file, unknown filter,
///   unreadable spreadsheet).
/// - `500 Internal Server Error` when the database cannot be reached.
pub(crate) async fn process(
    user: AuthUser,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = read_form(payload, state.config.upload_limit_bytes).await?;
    match send_bulk(&state, &user, form).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => {
            error!("Bulk send by '{}' aborted: {}", user.username(), e);
            Err(e)
        }
    }
}

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct BulkForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl BulkForm {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn text(&self, name: &str) -> String {
        self.field(name).unwrap_or_default().trim().to_string()
    }
}

/// Collects the `file` part and every text field of the multipart body.
async fn read_form(mut payload: Multipart, limit: usize) -> Result<BulkForm, ApiError> {
    let mut form = BulkForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        let Some(name) = name else {
            continue;
        };
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()));

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;
            if bytes.len() + chunk.len() > limit {
                return Err(ApiError::BadRequest(format!(
                    "upload exceeds the {} byte limit",
                    limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if name == "file" {
            form.file = Some(UploadedFile {
                filename: filename.unwrap_or_default(),
                bytes,
            });
        } else {
            let value = String::from_utf8(bytes)
                .map_err(|_| ApiError::BadRequest(format!("field '{}' is not valid UTF-8", name)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

async fn send_bulk(
    state: &AppState,
    user: &AuthUser,
    form: BulkForm,
) -> Result<BulkSendSummary, ApiError> {
    let filter = AttendanceFilter::parse(form.field("filter"))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let department = match user.department_scope() {
        Some(own) => own.to_string(),
        None => form.text("department"),
    };
    let from_date = form.text("from_date");
    let to_date = form.text("to_date");
    let year = form.text("year");

    let file = form
        .file
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    let rows = rows::read_rows(&file.bytes).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let req = BatchRequest {
        from_date,
        to_date,
        department,
        year,
        filter,
        source_filename: file.filename,
        uploaded_by: user.username().to_string(),
    };

    let conn = state.open_db()?;
    db::check_ready(&conn)?;

    let settings = state.dispatch_settings();
    let dispatcher = Dispatcher::new(state.gateway.as_ref(), &settings);
    let outcome = bulk_sms::run_batch(&conn, &dispatcher, &req, &rows).await;
    Ok(outcome.into_summary())
}
