//! # Bulk SMS pipeline
//!
//! Runs one uploaded attendance spreadsheet to completion, strictly one row at
//! a time and in file order:
//!
//! 1.  **Threshold**: rows at or above the selected cutoff are skipped.
//! 2.  **Audit**: an `upload_batches` record is written for every row that
//!     passed the threshold, before its phone number is looked at. A failed
//!     audit write skips the row.
//! 3.  **Phone**: the guardian number is normalized to `+91XXXXXXXXXX`;
//!     invalid numbers skip the row.
//! 4.  **Notification**: a `pending` notification is inserted, then updated
//!     with its acknowledgment link once the generated id is known.
//! 5.  **Dispatch**: the gateway is called and the notification moves to
//!     `sent` or `failed`.
//!
//! Each step returns `Result<_, SkipReason>`; a skip ends that row only. The
//! batch never aborts because of a row, and every row yields exactly one
//! outcome in the returned [`BatchOutcome`].

pub mod dispatcher;
pub mod phone;
pub mod rows;
pub mod summary;
pub mod threshold;
pub mod writer;

pub use dispatcher::Dispatcher;
pub use rows::StudentRow;
pub use summary::BatchOutcome;
pub use threshold::AttendanceFilter;

use log::{info, warn};
use rusqlite::Connection;
use std::fmt;

/// Form-level parameters shared by every row of an upload.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub from_date: String,
    pub to_date: String,
    pub department: String,
    pub year: String,
    pub filter: Option<AttendanceFilter>,
    pub source_filename: String,
    pub uploaded_by: String,
}

/// Deployment settings the dispatcher needs for every message.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub ack_base_url: String,
    pub from_number: String,
    pub contact_line: String,
}

/// Why a row did not end in a sent SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason(String);

impl SkipReason {
    pub fn new(reason: impl Into<String>) -> Self {
        SkipReason(reason.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<rusqlite::Error> for SkipReason {
    fn from(e: rusqlite::Error) -> Self {
        SkipReason(e.to_string())
    }
}

pub const INVALID_PHONE: &str = "Invalid phone number";

/// Processes every row and collects the outcomes.
pub async fn run_batch(
    conn: &Connection,
    dispatcher: &Dispatcher<'_>,
    req: &BatchRequest,
    rows: &[StudentRow],
) -> BatchOutcome {
    info!(
        "Bulk send started: {} rows from '{}' ({} / year {}) via {}",
        rows.len(),
        req.source_filename,
        req.department,
        req.year,
        dispatcher.gateway_name()
    );

    let mut outcome = BatchOutcome::default();
    for (idx, row) in rows.iter().enumerate() {
        match process_row(conn, dispatcher, req, row).await {
            Ok(phone) => outcome.record_sent(row, phone),
            Err(reason) => {
                warn!("Row {} ({}) skipped: {}", idx + 1, row.name, reason);
                outcome.record_skipped(row, reason);
            }
        }
    }

    info!(
        "Bulk send finished: {} rows, {} sent, {} skipped",
        outcome.total(),
        outcome.sent().len(),
        outcome.skipped().len()
    );
    outcome
}

/// Runs one row through the pipeline. `Ok` carries the normalized phone.
async fn process_row(
    conn: &Connection,
    dispatcher: &Dispatcher<'_>,
    req: &BatchRequest,
    row: &StudentRow,
) -> Result<String, SkipReason> {
    threshold::check(req.filter, row.attendance)?;

    writer::record_upload(conn, row, req)?;

    let phone = phone::normalize(&row.phone).ok_or_else(|| SkipReason::new(INVALID_PHONE))?;

    let message = dispatcher.render_message(row, req);
    let id = writer::create_pending(conn, row, req, &phone, &message)?;
    let link = writer::ack_link(&dispatcher.settings().ack_base_url, id);
    writer::attach_link(conn, id, &link)?;

    dispatcher.dispatch(conn, id, &message, &link, &phone).await?;
    Ok(phone)
}
