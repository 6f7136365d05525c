//! SQLite-backed ticket store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, types::Type, Connection, OptionalExtension, ToSql};

use super::{NewTicket, Ticket, TicketChanges, TicketFilter, TicketStatus, TicketStore};
use crate::db;
use crate::error::StoreError;

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, agent_id, title, description, status, created_at, updated_at FROM tickets";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
    /// Create a new SQLite ticket store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = db::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite ticket store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = db::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                agent_id INTEGER,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
            CREATE INDEX IF NOT EXISTS idx_tickets_agent_id ON tickets(agent_id);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("ticket store lock poisoned".to_string()))
    }

    fn build_where_clause(filter: &TicketFilter) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(agent_id) = filter.agent_id {
            conditions.push("agent_id = ?");
            params.push(Box::new(agent_id));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let status: String = row.get(5)?;
        let created_at: String = row.get(6)?;
        let updated_at: String = row.get(7)?;

        let status = status
            .parse::<TicketStatus>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

        Ok(Ticket {
            id: row.get(0)?,
            user_id: row.get(1)?,
            agent_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            status,
            created_at: db::parse_timestamp(6, &created_at)?,
            updated_at: db::parse_timestamp(7, &updated_at)?,
        })
    }

    fn fetch(conn: &Connection, id: i64) -> Result<Option<Ticket>, StoreError> {
        let ticket = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                params![id],
                Self::row_to_ticket,
            )
            .optional()?;
        Ok(ticket)
    }
}

impl TicketStore for SqliteTicketStore {
    fn create(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let conn = self.lock()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO tickets (user_id, agent_id, title, description, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                ticket.user_id,
                ticket.agent_id,
                ticket.title,
                ticket.description,
                ticket.status.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Ticket {
            id: conn.last_insert_rowid(),
            user_id: ticket.user_id,
            agent_id: ticket.agent_id,
            title: ticket.title,
            description: ticket.description,
            status: ticket.status,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: i64) -> Result<Option<Ticket>, StoreError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    fn update(&self, id: i64, changes: TicketChanges) -> Result<Ticket, StoreError> {
        let conn = self.lock()?;

        let mut assignments = vec!["updated_at = ?"];
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(Utc::now().to_rfc3339())];

        if let Some(user_id) = changes.user_id {
            assignments.push("user_id = ?");
            params.push(Box::new(user_id));
        }
        if let Some(agent_id) = changes.agent_id {
            assignments.push("agent_id = ?");
            params.push(Box::new(agent_id));
        }
        if let Some(title) = changes.title {
            assignments.push("title = ?");
            params.push(Box::new(title));
        }
        if let Some(description) = changes.description {
            assignments.push("description = ?");
            params.push(Box::new(description));
        }
        if let Some(status) = changes.status {
            assignments.push("status = ?");
            params.push(Box::new(status.as_str()));
        }
        params.push(Box::new(id));

        let sql = format!("UPDATE tickets SET {} WHERE id = ?", assignments.join(", "));
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let updated = conn.execute(&sql, param_refs.as_slice())?;
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }

        Self::fetch(&conn, id)?.ok_or(StoreError::NotFound(id))
    }

    fn delete(&self, id: i64) -> Result<Ticket, StoreError> {
        let conn = self.lock()?;

        let ticket = Self::fetch(&conn, id)?.ok_or(StoreError::NotFound(id))?;
        conn.execute("DELETE FROM tickets WHERE id = ?", params![id])?;

        Ok(ticket)
    }

    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError> {
        let conn = self.lock()?;

        let (where_clause, mut params) = Self::build_where_clause(filter);
        let sql = format!(
            "{} {} ORDER BY id ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS, where_clause
        );

        params.push(Box::new(filter.limit));
        params.push(Box::new(filter.offset));
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let tickets = stmt
            .query_map(param_refs.as_slice(), Self::row_to_ticket)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tickets)
    }

    fn count(&self, filter: &TicketFilter) -> Result<i64, StoreError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM tickets {}", where_clause);
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }
}
