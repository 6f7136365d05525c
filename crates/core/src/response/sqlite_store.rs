//! SQLite-backed response store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{NewResponse, Response, ResponseStore};
use crate::db;
use crate::error::StoreError;

const SELECT_COLUMNS: &str =
    "SELECT id, ticket_id, user_id, message, created_at, updated_at FROM responses";

/// SQLite-backed response store.
pub struct SqliteResponseStore {
    conn: Mutex<Connection>,
}

impl SqliteResponseStore {
    /// Create a new SQLite response store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = db::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = db::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // No foreign key to tickets: deleting a ticket leaves its thread behind.
    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticket_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_responses_ticket_id ON responses(ticket_id);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("response store lock poisoned".to_string()))
    }

    fn row_to_response(row: &rusqlite::Row) -> rusqlite::Result<Response> {
        let created_at: String = row.get(4)?;
        let updated_at: String = row.get(5)?;
        Ok(Response {
            id: row.get(0)?,
            ticket_id: row.get(1)?,
            user_id: row.get(2)?,
            message: row.get(3)?,
            created_at: db::parse_timestamp(4, &created_at)?,
            updated_at: db::parse_timestamp(5, &updated_at)?,
        })
    }

    fn fetch(conn: &Connection, id: i64) -> Result<Option<Response>, StoreError> {
        let response = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                params![id],
                Self::row_to_response,
            )
            .optional()?;
        Ok(response)
    }
}

impl ResponseStore for SqliteResponseStore {
    fn create(&self, response: NewResponse) -> Result<Response, StoreError> {
        let conn = self.lock()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO responses (ticket_id, user_id, message, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![
                response.ticket_id,
                response.user_id,
                response.message,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Response {
            id: conn.last_insert_rowid(),
            ticket_id: response.ticket_id,
            user_id: response.user_id,
            message: response.message,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: i64) -> Result<Option<Response>, StoreError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    fn update_message(&self, id: i64, message: &str) -> Result<Response, StoreError> {
        let conn = self.lock()?;

        let updated = conn.execute(
            "UPDATE responses SET message = ?, updated_at = ? WHERE id = ?",
            params![message, Utc::now().to_rfc3339(), id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }

        Self::fetch(&conn, id)?.ok_or(StoreError::NotFound(id))
    }

    fn delete(&self, id: i64) -> Result<Response, StoreError> {
        let conn = self.lock()?;

        let response = Self::fetch(&conn, id)?.ok_or(StoreError::NotFound(id))?;
        conn.execute("DELETE FROM responses WHERE id = ?", params![id])?;

        Ok(response)
    }

    fn list_for_ticket(&self, ticket_id: i64) -> Result<Vec<Response>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE ticket_id = ? ORDER BY id ASC",
            SELECT_COLUMNS
        ))?;
        let responses = stmt
            .query_map(params![ticket_id], Self::row_to_response)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(responses)
    }
}
