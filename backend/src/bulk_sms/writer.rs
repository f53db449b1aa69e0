//! Persistence for the bulk send pipeline.
//!
//! Every statement auto-commits on its own. There is no transaction around a
//! row, so an interrupted batch can leave an audit record without a
//! notification, or a notification still in `pending`.

use super::rows::StudentRow;
use super::BatchRequest;
use crate::db;
use crate::gateway::SentMessage;
use common::model::notification::NotificationStatus;
use rusqlite::{params, Connection};

/// Writes the immutable audit record for a row. Returns its id.
pub fn record_upload(
    conn: &Connection,
    row: &StudentRow,
    req: &BatchRequest,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO upload_batches (student_name, roll_no, parent_phone, section, attendance,
             from_date, to_date, department, year, source_filename, uploaded_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            row.name,
            row.roll_no,
            row.phone,
            row.section,
            row.attendance,
            req.from_date,
            req.to_date,
            req.department,
            req.year,
            req.source_filename,
            req.uploaded_by,
            db::now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts a notification in `pending` state and returns the generated id.
pub fn create_pending(
    conn: &Connection,
    row: &StudentRow,
    req: &BatchRequest,
    phone: &str,
    message: &str,
) -> rusqlite::Result<i64> {
    let now = db::now();
    conn.execute(
        "INSERT INTO sms_notifications (student_name, roll_no, parent_phone, department, year,
             message, attendance, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        params![
            row.name,
            row.roll_no.as_deref().unwrap_or_default(),
            phone,
            req.department,
            req.year,
            message,
            row.attendance,
            NotificationStatus::Pending.as_str(),
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn ack_link(base_url: &str, id: i64) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

pub fn attach_link(conn: &Connection, id: i64, link: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE sms_notifications SET ack_link = ?1, updated_at = ?2 WHERE id = ?3",
        params![link, db::now(), id],
    )?;
    Ok(())
}

/// Records gateway acceptance. Only a `pending` row moves.
pub fn mark_sent(conn: &Connection, id: i64, sent: &SentMessage) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE sms_notifications
            SET status = ?1, sms_sid = ?2, sms_status = ?3, delivered = 1, updated_at = ?4
          WHERE id = ?5 AND status = ?6",
        params![
            NotificationStatus::Sent.as_str(),
            sent.id,
            sent.status,
            db::now(),
            id,
            NotificationStatus::Pending.as_str(),
        ],
    )
}

/// Records a gateway failure. Only a `pending` row moves.
pub fn mark_failed(conn: &Connection, id: i64, error: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE sms_notifications
            SET status = ?1, error = ?2, updated_at = ?3
          WHERE id = ?4 AND status = ?5",
        params![
            NotificationStatus::Failed.as_str(),
            error,
            db::now(),
            id,
            NotificationStatus::Pending.as_str(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BatchRequest {
        BatchRequest {
            from_date: "2025-01-01".to_string(),
            to_date: "2025-01-31".to_string(),
            department: "CSE".to_string(),
            year: "2".to_string(),
            filter: None,
            source_filename: "jan.csv".to_string(),
            uploaded_by: "operator".to_string(),
        }
    }

    fn row(roll_no: Option<&str>) -> StudentRow {
        StudentRow {
            name: "Asha".to_string(),
            roll_no: roll_no.map(str::to_string),
            phone: "9876543210".to_string(),
            attendance: 61.0,
            section: Some("B".to_string()),
        }
    }

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::create_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn audit_write_without_roll_no_fails() {
        let conn = conn();
        let err = record_upload(&conn, &row(None), &request()).unwrap_err();
        assert!(err.to_string().contains("NOT NULL"), "{}", err);
    }

    #[test]
    fn notification_lifecycle_is_pending_then_terminal() {
        let conn = conn();
        let r = row(Some("21CS001"));
        let id = create_pending(&conn, &r, &request(), "+919876543210", "hello").unwrap();

        let n = db::find_notification(&conn, id).unwrap().unwrap();
        assert_eq!(n.status, NotificationStatus::Pending);
        assert!(!n.delivered);
        assert!(!n.seen);
        assert_eq!(n.ack_link, None);

        let link = ack_link("https://college.example/ack/", id);
        assert_eq!(link, format!("https://college.example/ack/{}", id));
        attach_link(&conn, id, &link).unwrap();

        let sent = SentMessage {
            id: "SM1".to_string(),
            status: "queued".to_string(),
        };
        assert_eq!(mark_sent(&conn, id, &sent).unwrap(), 1);
        assert_eq!(mark_failed(&conn, id, "late").unwrap(), 0, "terminal state");

        let n = db::find_notification(&conn, id).unwrap().unwrap();
        assert_eq!(n.status, NotificationStatus::Sent);
        assert_eq!(n.sms_sid.as_deref(), Some("SM1"));
        assert_eq!(n.sms_status.as_deref(), Some("queued"));
        assert!(n.delivered);
        assert_eq!(n.ack_link.as_deref(), Some(link.as_str()));
        assert_eq!(n.error, None);
    }
}
