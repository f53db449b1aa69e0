//! SQLite schema and connection helpers.
//!
//! Each request opens its own connection with [`open`]; nothing is pooled or
//! shared between requests. [`init`] runs once at startup to create the tables.

use common::model::notification::{Notification, NotificationStatus};
use common::model::upload_batch::UploadBatch;
use rusqlite::{Connection, Row};
use std::path::Path;

pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    Ok(conn)
}

pub fn init(path: impl AsRef<Path>) -> rusqlite::Result<Connection> {
    let conn = open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            department TEXT
        );

        CREATE TABLE IF NOT EXISTS upload_batches(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_name TEXT NOT NULL,
            roll_no TEXT NOT NULL,
            parent_phone TEXT NOT NULL,
            section TEXT,
            attendance REAL NOT NULL,
            from_date TEXT NOT NULL,
            to_date TEXT NOT NULL,
            department TEXT NOT NULL,
            year TEXT NOT NULL,
            source_filename TEXT NOT NULL,
            uploaded_by TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_upload_batches_department ON upload_batches(department);

        CREATE TABLE IF NOT EXISTS sms_notifications(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_name TEXT NOT NULL,
            roll_no TEXT NOT NULL,
            parent_phone TEXT NOT NULL,
            department TEXT NOT NULL,
            year TEXT NOT NULL,
            message TEXT NOT NULL,
            attendance REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            sms_sid TEXT,
            sms_status TEXT,
            delivered INTEGER NOT NULL DEFAULT 0,
            seen INTEGER NOT NULL DEFAULT 0,
            seen_at TEXT,
            ack_link TEXT,
            error TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sms_notifications_department ON sms_notifications(department);",
    )
}

pub const NOTIFICATION_COLUMNS: &str = "id, student_name, roll_no, parent_phone, department, year, \
     message, attendance, status, sms_sid, sms_status, delivered, seen, seen_at, ack_link, error, \
     created_at, updated_at";

pub fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let status: String = row.get(8)?;
    let status = NotificationStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Text,
            format!("unknown notification status '{}'", status).into(),
        )
    })?;
    Ok(Notification {
        id: row.get(0)?,
        student_name: row.get(1)?,
        roll_no: row.get(2)?,
        parent_phone: row.get(3)?,
        department: row.get(4)?,
        year: row.get(5)?,
        message: row.get(6)?,
        attendance: row.get(7)?,
        status,
        sms_sid: row.get(9)?,
        sms_status: row.get(10)?,
        delivered: row.get::<_, i64>(11)? != 0,
        seen: row.get::<_, i64>(12)? != 0,
        seen_at: row.get(13)?,
        ack_link: row.get(14)?,
        error: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
    })
}

pub const UPLOAD_BATCH_COLUMNS: &str = "id, student_name, roll_no, parent_phone, section, \
     attendance, from_date, to_date, department, year, source_filename, uploaded_by, created_at";

pub fn upload_batch_from_row(row: &Row<'_>) -> rusqlite::Result<UploadBatch> {
    Ok(UploadBatch {
        id: row.get(0)?,
        student_name: row.get(1)?,
        roll_no: row.get(2)?,
        parent_phone: row.get(3)?,
        section: row.get(4)?,
        attendance: row.get(5)?,
        from_date: row.get(6)?,
        to_date: row.get(7)?,
        department: row.get(8)?,
        year: row.get(9)?,
        source_filename: row.get(10)?,
        uploaded_by: row.get(11)?,
        created_at: row.get(12)?,
    })
}

/// Loads one notification by id, `None` if it does not exist.
pub fn find_notification(conn: &Connection, id: i64) -> rusqlite::Result<Option<Notification>> {
    let sql = format!("SELECT {} FROM sms_notifications WHERE id = ?1", NOTIFICATION_COLUMNS);
    match conn.query_row(&sql, [id], notification_from_row) {
        Ok(n) => Ok(Some(n)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Fails when the pipeline tables are not reachable through `conn`.
pub fn check_ready(conn: &Connection) -> rusqlite::Result<()> {
    conn.prepare("SELECT 1 FROM upload_batches LIMIT 0")?;
    conn.prepare("SELECT 1 FROM sms_notifications LIMIT 0")?;
    Ok(())
}
