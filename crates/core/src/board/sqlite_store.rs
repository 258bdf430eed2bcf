//! SQLite-backed board store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use super::order::{resolve_id, resolve_order};
use super::{
    BoardError, BoardStore, Contact, Lane, LaneDetails, LaneOrder, Member, Pipeline, Tag,
    Ticket, TicketDetails, TicketOrder, UpsertContact, UpsertLane, UpsertMember, UpsertPipeline,
    UpsertTag, UpsertTicket,
};

const PIPELINE_COLUMNS: &str = "id, name, sub_account_id, created_at, updated_at";
const LANE_COLUMNS: &str = r#"id, name, pipeline_id, "order", created_at, updated_at"#;
const TICKET_COLUMNS: &str = r#"id, name, lane_id, "order", value, description, customer_id, assigned_user_id, created_at, updated_at"#;
const TAG_COLUMNS: &str = "id, name, color, sub_account_id, created_at, updated_at";
const CONTACT_COLUMNS: &str = "id, name, email, sub_account_id, created_at, updated_at";
const MEMBER_COLUMNS: &str = "id, name, email, avatar_url, created_at, updated_at";

/// SQLite-backed board store.
pub struct SqliteBoardStore {
    conn: Mutex<Connection>,
}

impl SqliteBoardStore {
    /// Create a new SQLite board store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, BoardError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite board store (useful for testing).
    pub fn in_memory() -> Result<Self, BoardError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), BoardError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS pipelines (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                sub_account_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS lanes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                pipeline_id TEXT NOT NULL REFERENCES pipelines(id) ON DELETE CASCADE,
                "order" INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS members (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                avatar_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS contacts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                sub_account_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                lane_id TEXT NOT NULL REFERENCES lanes(id) ON DELETE CASCADE,
                "order" INTEGER NOT NULL DEFAULT 0,
                value REAL,
                description TEXT,
                customer_id TEXT REFERENCES contacts(id) ON DELETE SET NULL,
                assigned_user_id TEXT REFERENCES members(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                sub_account_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS ticket_tags (
                ticket_id TEXT NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
                tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (ticket_id, tag_id)
            );

            CREATE INDEX IF NOT EXISTS idx_pipelines_sub_account ON pipelines(sub_account_id);
            CREATE INDEX IF NOT EXISTS idx_lanes_pipeline ON lanes(pipeline_id, "order");
            CREATE INDEX IF NOT EXISTS idx_tickets_lane ON tickets(lane_id, "order");
            CREATE INDEX IF NOT EXISTS idx_tags_sub_account ON tags(sub_account_id);
            CREATE INDEX IF NOT EXISTS idx_contacts_sub_account ON contacts(sub_account_id);
            "#,
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, BoardError> {
        self.conn
            .lock()
            .map_err(|_| BoardError::Database("board connection lock poisoned".to_string()))
    }

    /// Start a write transaction. IMMEDIATE takes the write lock up front so a
    /// concurrent writer on the same file waits instead of failing mid-batch.
    fn begin(conn: &mut Connection) -> Result<Transaction<'_>, BoardError> {
        Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    // ------------------------------------------------------------------------
    // Row mapping
    // ------------------------------------------------------------------------

    fn timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let raw: String = row.get(idx)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
    }

    fn row_to_pipeline(row: &rusqlite::Row) -> rusqlite::Result<Pipeline> {
        Ok(Pipeline {
            id: row.get(0)?,
            name: row.get(1)?,
            sub_account_id: row.get(2)?,
            created_at: Self::timestamp(row, 3)?,
            updated_at: Self::timestamp(row, 4)?,
        })
    }

    fn row_to_lane(row: &rusqlite::Row) -> rusqlite::Result<Lane> {
        Ok(Lane {
            id: row.get(0)?,
            name: row.get(1)?,
            pipeline_id: row.get(2)?,
            order: row.get(3)?,
            created_at: Self::timestamp(row, 4)?,
            updated_at: Self::timestamp(row, 5)?,
        })
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        Ok(Ticket {
            id: row.get(0)?,
            name: row.get(1)?,
            lane_id: row.get(2)?,
            order: row.get(3)?,
            value: row.get(4)?,
            description: row.get(5)?,
            customer_id: row.get(6)?,
            assigned_user_id: row.get(7)?,
            created_at: Self::timestamp(row, 8)?,
            updated_at: Self::timestamp(row, 9)?,
        })
    }

    fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            sub_account_id: row.get(3)?,
            created_at: Self::timestamp(row, 4)?,
            updated_at: Self::timestamp(row, 5)?,
        })
    }

    fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            sub_account_id: row.get(3)?,
            created_at: Self::timestamp(row, 4)?,
            updated_at: Self::timestamp(row, 5)?,
        })
    }

    fn row_to_member(row: &rusqlite::Row) -> rusqlite::Result<Member> {
        Ok(Member {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            avatar_url: row.get(3)?,
            created_at: Self::timestamp(row, 4)?,
            updated_at: Self::timestamp(row, 5)?,
        })
    }

    // ------------------------------------------------------------------------
    // Single-row lookups (usable inside a transaction)
    // ------------------------------------------------------------------------

    fn fetch_pipeline(conn: &Connection, id: &str) -> Result<Option<Pipeline>, BoardError> {
        let sql = format!("SELECT {} FROM pipelines WHERE id = ?", PIPELINE_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_pipeline)
            .optional()?)
    }

    fn fetch_lane(conn: &Connection, id: &str) -> Result<Option<Lane>, BoardError> {
        let sql = format!("SELECT {} FROM lanes WHERE id = ?", LANE_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_lane)
            .optional()?)
    }

    fn fetch_ticket(conn: &Connection, id: &str) -> Result<Option<Ticket>, BoardError> {
        let sql = format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_ticket)
            .optional()?)
    }

    fn fetch_tag(conn: &Connection, id: &str) -> Result<Option<Tag>, BoardError> {
        let sql = format!("SELECT {} FROM tags WHERE id = ?", TAG_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_tag)
            .optional()?)
    }

    fn fetch_contact(conn: &Connection, id: &str) -> Result<Option<Contact>, BoardError> {
        let sql = format!("SELECT {} FROM contacts WHERE id = ?", CONTACT_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_contact)
            .optional()?)
    }

    fn fetch_member(conn: &Connection, id: &str) -> Result<Option<Member>, BoardError> {
        let sql = format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], Self::row_to_member)
            .optional()?)
    }

    fn lane_count(conn: &Connection, pipeline_id: &str) -> Result<i64, BoardError> {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM lanes WHERE pipeline_id = ?",
            params![pipeline_id],
            |row| row.get(0),
        )?)
    }

    fn ticket_count(conn: &Connection, lane_id: &str) -> Result<i64, BoardError> {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM tickets WHERE lane_id = ?",
            params![lane_id],
            |row| row.get(0),
        )?)
    }

    // ------------------------------------------------------------------------
    // Hydration
    // ------------------------------------------------------------------------

    fn ticket_tags(conn: &Connection, ticket_id: &str) -> Result<Vec<Tag>, BoardError> {
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.color, t.sub_account_id, t.created_at, t.updated_at \
             FROM tags t JOIN ticket_tags tt ON tt.tag_id = t.id \
             WHERE tt.ticket_id = ? ORDER BY t.name ASC",
        )?;
        let tags = stmt
            .query_map(params![ticket_id], Self::row_to_tag)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn hydrate_ticket(
        conn: &Connection,
        ticket: Ticket,
        with_lane: bool,
    ) -> Result<TicketDetails, BoardError> {
        let tags = Self::ticket_tags(conn, &ticket.id)?;

        let assigned = match ticket.assigned_user_id.as_deref() {
            Some(member_id) => Self::fetch_member(conn, member_id)?,
            None => None,
        };

        let customer = match ticket.customer_id.as_deref() {
            Some(contact_id) => Self::fetch_contact(conn, contact_id)?,
            None => None,
        };

        let lane = if with_lane {
            Self::fetch_lane(conn, &ticket.lane_id)?
        } else {
            None
        };

        Ok(TicketDetails {
            ticket,
            lane,
            tags,
            assigned,
            customer,
        })
    }

    fn lane_tickets(conn: &Connection, lane_id: &str) -> Result<Vec<Ticket>, BoardError> {
        let sql = format!(
            r#"SELECT {} FROM tickets WHERE lane_id = ? ORDER BY "order" ASC, created_at ASC"#,
            TICKET_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let tickets = stmt
            .query_map(params![lane_id], Self::row_to_ticket)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tickets)
    }
}

impl BoardStore for SqliteBoardStore {
    fn upsert_pipeline(&self, request: UpsertPipeline) -> Result<Pipeline, BoardError> {
        let conn = self.lock()?;

        let id = resolve_id(request.id.as_deref());
        let now = Utc::now();

        match Self::fetch_pipeline(&conn, &id)? {
            Some(existing) => {
                conn.execute(
                    "UPDATE pipelines SET name = ?, sub_account_id = ?, updated_at = ? WHERE id = ?",
                    params![request.name, request.sub_account_id, now.to_rfc3339(), id],
                )?;
                Ok(Pipeline {
                    name: request.name,
                    sub_account_id: request.sub_account_id,
                    updated_at: now,
                    ..existing
                })
            }
            None => {
                conn.execute(
                    "INSERT INTO pipelines (id, name, sub_account_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
                    params![
                        id,
                        request.name,
                        request.sub_account_id,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )?;
                Ok(Pipeline {
                    id,
                    name: request.name,
                    sub_account_id: request.sub_account_id,
                    created_at: now,
                    updated_at: now,
                })
            }
        }
    }

    fn get_pipeline(&self, id: &str) -> Result<Option<Pipeline>, BoardError> {
        let conn = self.lock()?;
        Self::fetch_pipeline(&conn, id)
    }

    fn list_pipelines(&self, sub_account_id: &str) -> Result<Vec<Pipeline>, BoardError> {
        let conn = self.lock()?;

        let sql = format!(
            "SELECT {} FROM pipelines WHERE sub_account_id = ? ORDER BY created_at ASC",
            PIPELINE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let pipelines = stmt
            .query_map(params![sub_account_id], Self::row_to_pipeline)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pipelines)
    }

    fn delete_pipeline(&self, id: &str) -> Result<Pipeline, BoardError> {
        let conn = self.lock()?;

        let pipeline =
            Self::fetch_pipeline(&conn, id)?.ok_or_else(|| BoardError::not_found("pipeline", id))?;

        conn.execute("DELETE FROM pipelines WHERE id = ?", params![id])?;

        Ok(pipeline)
    }

    fn upsert_lane(&self, request: UpsertLane) -> Result<Lane, BoardError> {
        let conn = self.lock()?;

        let id = resolve_id(request.id.as_deref());
        let existing = Self::fetch_lane(&conn, &id)?;

        // Siblings are only counted when the lane is appended.
        let sibling_count = if request.order.is_none() && existing.is_none() {
            Self::lane_count(&conn, &request.pipeline_id)?
        } else {
            0
        };
        let order = resolve_order(
            request.order,
            existing.as_ref().map(|lane| lane.order),
            sibling_count,
        );
        let now = Utc::now();

        match existing {
            Some(existing) => {
                conn.execute(
                    r#"UPDATE lanes SET name = ?, pipeline_id = ?, "order" = ?, updated_at = ? WHERE id = ?"#,
                    params![request.name, request.pipeline_id, order, now.to_rfc3339(), id],
                )?;
                Ok(Lane {
                    name: request.name,
                    pipeline_id: request.pipeline_id,
                    order,
                    updated_at: now,
                    ..existing
                })
            }
            None => {
                conn.execute(
                    r#"INSERT INTO lanes (id, name, pipeline_id, "order", created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)"#,
                    params![
                        id,
                        request.name,
                        request.pipeline_id,
                        order,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )?;
                Ok(Lane {
                    id,
                    name: request.name,
                    pipeline_id: request.pipeline_id,
                    order,
                    created_at: now,
                    updated_at: now,
                })
            }
        }
    }

    fn get_lane(&self, id: &str) -> Result<Option<Lane>, BoardError> {
        let conn = self.lock()?;
        Self::fetch_lane(&conn, id)
    }

    fn count_lanes(&self, pipeline_id: &str) -> Result<i64, BoardError> {
        let conn = self.lock()?;
        Self::lane_count(&conn, pipeline_id)
    }

    fn list_lanes_with_tickets(&self, pipeline_id: &str) -> Result<Vec<LaneDetails>, BoardError> {
        let conn = self.lock()?;

        let sql = format!(
            r#"SELECT {} FROM lanes WHERE pipeline_id = ? ORDER BY "order" ASC, created_at ASC"#,
            LANE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let lanes = stmt
            .query_map(params![pipeline_id], Self::row_to_lane)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = Vec::with_capacity(lanes.len());
        for lane in lanes {
            let tickets = Self::lane_tickets(&conn, &lane.id)?
                .into_iter()
                .map(|ticket| Self::hydrate_ticket(&conn, ticket, false))
                .collect::<Result<Vec<_>, _>>()?;
            result.push(LaneDetails { lane, tickets });
        }

        Ok(result)
    }

    fn delete_lane(&self, id: &str) -> Result<Lane, BoardError> {
        let conn = self.lock()?;

        let lane = Self::fetch_lane(&conn, id)?.ok_or_else(|| BoardError::not_found("lane", id))?;

        conn.execute("DELETE FROM lanes WHERE id = ?", params![id])?;

        Ok(lane)
    }

    fn reorder_lanes(&self, lanes: &[LaneOrder]) -> Result<(), BoardError> {
        let mut conn = self.lock()?;
        let tx = Self::begin(&mut conn)?;

        let now = Utc::now().to_rfc3339();
        for lane in lanes {
            let updated = tx.execute(
                r#"UPDATE lanes SET "order" = ?, updated_at = ? WHERE id = ?"#,
                params![lane.order, now, lane.id],
            )?;
            if updated == 0 {
                // Dropping the transaction rolls back earlier updates.
                return Err(BoardError::not_found("lane", &lane.id));
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn upsert_ticket(&self, request: UpsertTicket) -> Result<TicketDetails, BoardError> {
        let mut conn = self.lock()?;
        let tx = Self::begin(&mut conn)?;

        let id = resolve_id(request.id.as_deref());
        let existing = Self::fetch_ticket(&tx, &id)?;

        let sibling_count = if request.order.is_none() && existing.is_none() {
            Self::ticket_count(&tx, &request.lane_id)?
        } else {
            0
        };
        let order = resolve_order(
            request.order,
            existing.as_ref().map(|ticket| ticket.order),
            sibling_count,
        );
        let now = Utc::now();

        let ticket = match existing {
            Some(existing) => {
                tx.execute(
                    r#"UPDATE tickets SET name = ?, lane_id = ?, "order" = ?, value = ?, description = ?, customer_id = ?, assigned_user_id = ?, updated_at = ? WHERE id = ?"#,
                    params![
                        request.name,
                        request.lane_id,
                        order,
                        request.value,
                        request.description,
                        request.customer_id,
                        request.assigned_user_id,
                        now.to_rfc3339(),
                        id,
                    ],
                )?;
                Ticket {
                    name: request.name,
                    lane_id: request.lane_id,
                    order,
                    value: request.value,
                    description: request.description,
                    customer_id: request.customer_id,
                    assigned_user_id: request.assigned_user_id,
                    updated_at: now,
                    ..existing
                }
            }
            None => {
                tx.execute(
                    r#"INSERT INTO tickets (id, name, lane_id, "order", value, description, customer_id, assigned_user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                    params![
                        id,
                        request.name,
                        request.lane_id,
                        order,
                        request.value,
                        request.description,
                        request.customer_id,
                        request.assigned_user_id,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )?;
                Ticket {
                    id,
                    name: request.name,
                    lane_id: request.lane_id,
                    order,
                    value: request.value,
                    description: request.description,
                    customer_id: request.customer_id,
                    assigned_user_id: request.assigned_user_id,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        tx.execute(
            "DELETE FROM ticket_tags WHERE ticket_id = ?",
            params![ticket.id],
        )?;
        for tag_id in &request.tag_ids {
            tx.execute(
                "INSERT OR IGNORE INTO ticket_tags (ticket_id, tag_id) VALUES (?, ?)",
                params![ticket.id, tag_id],
            )?;
        }

        tx.commit()?;

        Self::hydrate_ticket(&conn, ticket, true)
    }

    fn get_ticket(&self, id: &str) -> Result<Option<TicketDetails>, BoardError> {
        let conn = self.lock()?;

        match Self::fetch_ticket(&conn, id)? {
            Some(ticket) => Ok(Some(Self::hydrate_ticket(&conn, ticket, true)?)),
            None => Ok(None),
        }
    }

    fn count_tickets(&self, lane_id: &str) -> Result<i64, BoardError> {
        let conn = self.lock()?;
        Self::ticket_count(&conn, lane_id)
    }

    fn list_tickets_for_pipeline(
        &self,
        pipeline_id: &str,
    ) -> Result<Vec<TicketDetails>, BoardError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"SELECT t.id, t.name, t.lane_id, t."order", t.value, t.description, t.customer_id, t.assigned_user_id, t.created_at, t.updated_at
               FROM tickets t JOIN lanes l ON l.id = t.lane_id
               WHERE l.pipeline_id = ?
               ORDER BY l."order" ASC, t."order" ASC, t.created_at ASC"#,
        )?;
        let tickets = stmt
            .query_map(params![pipeline_id], Self::row_to_ticket)?
            .collect::<Result<Vec<_>, _>>()?;

        tickets
            .into_iter()
            .map(|ticket| Self::hydrate_ticket(&conn, ticket, false))
            .collect()
    }

    fn list_tickets_for_lane(&self, lane_id: &str) -> Result<Vec<TicketDetails>, BoardError> {
        let conn = self.lock()?;

        Self::lane_tickets(&conn, lane_id)?
            .into_iter()
            .map(|ticket| Self::hydrate_ticket(&conn, ticket, true))
            .collect()
    }

    fn delete_ticket(&self, id: &str) -> Result<TicketDetails, BoardError> {
        let conn = self.lock()?;

        let ticket =
            Self::fetch_ticket(&conn, id)?.ok_or_else(|| BoardError::not_found("ticket", id))?;
        let details = Self::hydrate_ticket(&conn, ticket, true)?;

        conn.execute("DELETE FROM tickets WHERE id = ?", params![id])?;

        Ok(details)
    }

    fn reorder_tickets(&self, tickets: &[TicketOrder]) -> Result<(), BoardError> {
        let mut conn = self.lock()?;
        let tx = Self::begin(&mut conn)?;

        let now = Utc::now().to_rfc3339();
        for ticket in tickets {
            let updated = match ticket.lane_id.as_deref() {
                Some(lane_id) => tx.execute(
                    r#"UPDATE tickets SET "order" = ?, lane_id = ?, updated_at = ? WHERE id = ?"#,
                    params![ticket.order, lane_id, now, ticket.id],
                )?,
                None => tx.execute(
                    r#"UPDATE tickets SET "order" = ?, updated_at = ? WHERE id = ?"#,
                    params![ticket.order, now, ticket.id],
                )?,
            };
            if updated == 0 {
                return Err(BoardError::not_found("ticket", &ticket.id));
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn upsert_tag(&self, request: UpsertTag) -> Result<Tag, BoardError> {
        let conn = self.lock()?;

        let id = resolve_id(request.id.as_deref());
        let now = Utc::now();

        match Self::fetch_tag(&conn, &id)? {
            Some(existing) if existing.sub_account_id != request.sub_account_id => {
                Err(BoardError::Conflict(format!(
                    "tag {} belongs to another sub-account",
                    id
                )))
            }
            Some(existing) => {
                conn.execute(
                    "UPDATE tags SET name = ?, color = ?, updated_at = ? WHERE id = ?",
                    params![request.name, request.color, now.to_rfc3339(), id],
                )?;
                Ok(Tag {
                    name: request.name,
                    color: request.color,
                    updated_at: now,
                    ..existing
                })
            }
            None => {
                conn.execute(
                    "INSERT INTO tags (id, name, color, sub_account_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
                    params![
                        id,
                        request.name,
                        request.color,
                        request.sub_account_id,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )?;
                Ok(Tag {
                    id,
                    name: request.name,
                    color: request.color,
                    sub_account_id: request.sub_account_id,
                    created_at: now,
                    updated_at: now,
                })
            }
        }
    }

    fn list_tags(&self, sub_account_id: &str) -> Result<Vec<Tag>, BoardError> {
        let conn = self.lock()?;

        let sql = format!(
            "SELECT {} FROM tags WHERE sub_account_id = ? ORDER BY name ASC",
            TAG_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let tags = stmt
            .query_map(params![sub_account_id], Self::row_to_tag)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn delete_tag(&self, id: &str) -> Result<Tag, BoardError> {
        let conn = self.lock()?;

        let tag = Self::fetch_tag(&conn, id)?.ok_or_else(|| BoardError::not_found("tag", id))?;

        conn.execute("DELETE FROM tags WHERE id = ?", params![id])?;

        Ok(tag)
    }

    fn upsert_contact(&self, request: UpsertContact) -> Result<Contact, BoardError> {
        let conn = self.lock()?;

        let id = resolve_id(request.id.as_deref());
        let now = Utc::now();

        match Self::fetch_contact(&conn, &id)? {
            Some(existing) => {
                conn.execute(
                    "UPDATE contacts SET name = ?, email = ?, sub_account_id = ?, updated_at = ? WHERE id = ?",
                    params![
                        request.name,
                        request.email,
                        request.sub_account_id,
                        now.to_rfc3339(),
                        id,
                    ],
                )?;
                Ok(Contact {
                    name: request.name,
                    email: request.email,
                    sub_account_id: request.sub_account_id,
                    updated_at: now,
                    ..existing
                })
            }
            None => {
                conn.execute(
                    "INSERT INTO contacts (id, name, email, sub_account_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
                    params![
                        id,
                        request.name,
                        request.email,
                        request.sub_account_id,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )?;
                Ok(Contact {
                    id,
                    name: request.name,
                    email: request.email,
                    sub_account_id: request.sub_account_id,
                    created_at: now,
                    updated_at: now,
                })
            }
        }
    }

    fn search_contacts(
        &self,
        sub_account_id: &str,
        term: &str,
    ) -> Result<Vec<Contact>, BoardError> {
        let conn = self.lock()?;

        // instr() keeps the match literal; LIKE would treat % and _ as wildcards.
        let sql = format!(
            "SELECT {} FROM contacts WHERE sub_account_id = ? AND instr(name, ?) > 0 ORDER BY name ASC",
            CONTACT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let contacts = stmt
            .query_map(params![sub_account_id, term], Self::row_to_contact)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn upsert_member(&self, request: UpsertMember) -> Result<Member, BoardError> {
        let conn = self.lock()?;

        let id = resolve_id(request.id.as_deref());
        let now = Utc::now();

        match Self::fetch_member(&conn, &id)? {
            Some(existing) => {
                conn.execute(
                    "UPDATE members SET name = ?, email = ?, avatar_url = ?, updated_at = ? WHERE id = ?",
                    params![
                        request.name,
                        request.email,
                        request.avatar_url,
                        now.to_rfc3339(),
                        id,
                    ],
                )?;
                Ok(Member {
                    name: request.name,
                    email: request.email,
                    avatar_url: request.avatar_url,
                    updated_at: now,
                    ..existing
                })
            }
            None => {
                conn.execute(
                    "INSERT INTO members (id, name, email, avatar_url, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
                    params![
                        id,
                        request.name,
                        request.email,
                        request.avatar_url,
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                    ],
                )?;
                Ok(Member {
                    id,
                    name: request.name,
                    email: request.email,
                    avatar_url: request.avatar_url,
                    created_at: now,
                    updated_at: now,
                })
            }
        }
    }

    fn get_member(&self, id: &str) -> Result<Option<Member>, BoardError> {
        let conn = self.lock()?;
        Self::fetch_member(&conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteBoardStore {
        SqliteBoardStore::in_memory().unwrap()
    }

    fn create_pipeline(store: &SqliteBoardStore) -> Pipeline {
        store
            .upsert_pipeline(UpsertPipeline {
                id: None,
                name: "Sales".to_string(),
                sub_account_id: "sub-1".to_string(),
            })
            .unwrap()
    }

    fn lane_request(pipeline_id: &str, name: &str) -> UpsertLane {
        UpsertLane {
            id: None,
            name: name.to_string(),
            pipeline_id: pipeline_id.to_string(),
            order: None,
        }
    }

    fn ticket_request(lane_id: &str, name: &str) -> UpsertTicket {
        UpsertTicket {
            id: None,
            name: name.to_string(),
            lane_id: lane_id.to_string(),
            order: None,
            value: Some(250.0),
            description: None,
            customer_id: None,
            assigned_user_id: None,
            tag_ids: vec![],
        }
    }

    fn lane_names(store: &SqliteBoardStore, pipeline_id: &str) -> Vec<String> {
        store
            .list_lanes_with_tickets(pipeline_id)
            .unwrap()
            .into_iter()
            .map(|details| details.lane.name)
            .collect()
    }

    #[test]
    fn test_lanes_append_in_insertion_order() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);

        let orders: Vec<i64> = ["Lead", "Qualified", "Proposal", "Won"]
            .iter()
            .map(|name| store.upsert_lane(lane_request(&pipeline.id, name)).unwrap().order)
            .collect();

        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(
            lane_names(&store, &pipeline.id),
            vec!["Lead", "Qualified", "Proposal", "Won"]
        );
    }

    #[test]
    fn test_append_is_scoped_to_parent() {
        let store = create_test_store();
        let first = create_pipeline(&store);
        let second = create_pipeline(&store);

        store.upsert_lane(lane_request(&first.id, "A")).unwrap();
        store.upsert_lane(lane_request(&first.id, "B")).unwrap();
        let other = store.upsert_lane(lane_request(&second.id, "X")).unwrap();

        assert_eq!(other.order, 0);
        assert_eq!(store.count_lanes(&first.id).unwrap(), 2);
        assert_eq!(store.count_lanes(&second.id).unwrap(), 1);
    }

    #[test]
    fn test_explicit_order_is_persisted_verbatim() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        store.upsert_lane(lane_request(&pipeline.id, "A")).unwrap();

        let mut request = lane_request(&pipeline.id, "Far away");
        request.order = Some(42);
        let lane = store.upsert_lane(request).unwrap();
        assert_eq!(lane.order, 42);

        // Duplicate positions are not rejected either
        let mut duplicate = lane_request(&pipeline.id, "Duplicate");
        duplicate.order = Some(0);
        let duplicate = store.upsert_lane(duplicate).unwrap();
        assert_eq!(duplicate.order, 0);

        let fetched = store.get_lane(&lane.id).unwrap().unwrap();
        assert_eq!(fetched.order, 42);
    }

    #[test]
    fn test_upsert_lane_is_idempotent() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        store.upsert_lane(lane_request(&pipeline.id, "First")).unwrap();

        let mut request = lane_request(&pipeline.id, "Second");
        request.id = Some("lane-fixed".to_string());

        let first = store.upsert_lane(request.clone()).unwrap();
        let second = store.upsert_lane(request).unwrap();

        assert_eq!(first.id, "lane-fixed");
        assert_eq!(first.order, 1);
        assert_eq!(second.order, first.order);
        assert_eq!(second.name, first.name);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(store.count_lanes(&pipeline.id).unwrap(), 2);
    }

    #[test]
    fn test_upsert_ticket_is_idempotent() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lane = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();

        let mut request = ticket_request(&lane.id, "Deal");
        request.id = Some("ticket-fixed".to_string());

        let first = store.upsert_ticket(request.clone()).unwrap();
        let second = store.upsert_ticket(request).unwrap();

        assert_eq!(first.ticket.order, 0);
        assert_eq!(second.ticket.order, 0);
        assert_eq!(second.ticket.name, first.ticket.name);
        assert_eq!(second.ticket.value, first.ticket.value);
        assert_eq!(store.count_tickets(&lane.id).unwrap(), 1);
    }

    #[test]
    fn test_ticket_value_keeps_cents() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lane = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();

        for amount in [1999.99, 0.1, 12_345_678.91] {
            let mut request = ticket_request(&lane.id, "Deal");
            request.value = Some(amount);
            let saved = store.upsert_ticket(request).unwrap();

            let fetched = store.get_ticket(&saved.ticket.id).unwrap().unwrap();
            assert_eq!(fetched.ticket.value, Some(amount));
            assert_eq!(
                serde_json::to_value(&fetched.ticket).unwrap()["value"].to_string(),
                amount.to_string()
            );
        }
    }

    #[test]
    fn test_reorder_lanes_scenario() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let a = store.upsert_lane(lane_request(&pipeline.id, "A")).unwrap();
        let b = store.upsert_lane(lane_request(&pipeline.id, "B")).unwrap();
        let c = store.upsert_lane(lane_request(&pipeline.id, "C")).unwrap();

        store
            .reorder_lanes(&[
                LaneOrder { id: c.id.clone(), order: 0 },
                LaneOrder { id: a.id.clone(), order: 1 },
                LaneOrder { id: b.id.clone(), order: 2 },
            ])
            .unwrap();

        assert_eq!(lane_names(&store, &pipeline.id), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_reorder_lanes_is_atomic() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let a = store.upsert_lane(lane_request(&pipeline.id, "A")).unwrap();
        let b = store.upsert_lane(lane_request(&pipeline.id, "B")).unwrap();

        let result = store.reorder_lanes(&[
            LaneOrder { id: b.id.clone(), order: 0 },
            LaneOrder { id: a.id.clone(), order: 1 },
            LaneOrder { id: "missing".to_string(), order: 2 },
        ]);

        assert!(matches!(
            result,
            Err(BoardError::NotFound { entity: "lane", .. })
        ));
        assert_eq!(store.get_lane(&a.id).unwrap().unwrap().order, 0);
        assert_eq!(store.get_lane(&b.id).unwrap().unwrap().order, 1);
    }

    #[test]
    fn test_reorder_empty_batch_is_noop() {
        let store = create_test_store();
        assert!(store.reorder_lanes(&[]).is_ok());
        assert!(store.reorder_tickets(&[]).is_ok());
    }

    #[test]
    fn test_tickets_append_per_lane() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lane = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();

        let orders: Vec<i64> = (0..5)
            .map(|i| {
                store
                    .upsert_ticket(ticket_request(&lane.id, &format!("Deal {}", i)))
                    .unwrap()
                    .ticket
                    .order
            })
            .collect();

        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_move_ticket_leaves_gap_in_old_lane() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lead = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();
        let won = store.upsert_lane(lane_request(&pipeline.id, "Won")).unwrap();

        let t0 = store.upsert_ticket(ticket_request(&lead.id, "T0")).unwrap();
        let t1 = store.upsert_ticket(ticket_request(&lead.id, "T1")).unwrap();
        let t2 = store.upsert_ticket(ticket_request(&lead.id, "T2")).unwrap();

        let mut moved = ticket_request(&won.id, "T1");
        moved.id = Some(t1.ticket.id.clone());
        moved.order = Some(0);
        let moved = store.upsert_ticket(moved).unwrap();
        assert_eq!(moved.ticket.lane_id, won.id);
        assert_eq!(moved.lane.unwrap().name, "Won");

        let remaining: Vec<(String, i64)> = store
            .list_tickets_for_lane(&lead.id)
            .unwrap()
            .into_iter()
            .map(|t| (t.ticket.id, t.ticket.order))
            .collect();
        assert_eq!(
            remaining,
            vec![(t0.ticket.id.clone(), 0), (t2.ticket.id.clone(), 2)]
        );
    }

    #[test]
    fn test_reorder_tickets_moves_across_lanes() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lead = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();
        let won = store.upsert_lane(lane_request(&pipeline.id, "Won")).unwrap();

        let t0 = store.upsert_ticket(ticket_request(&lead.id, "T0")).unwrap();
        let t1 = store.upsert_ticket(ticket_request(&lead.id, "T1")).unwrap();

        store
            .reorder_tickets(&[
                TicketOrder {
                    id: t1.ticket.id.clone(),
                    order: 0,
                    lane_id: None,
                },
                TicketOrder {
                    id: t0.ticket.id.clone(),
                    order: 0,
                    lane_id: Some(won.id.clone()),
                },
            ])
            .unwrap();

        let lead_tickets = store.list_tickets_for_lane(&lead.id).unwrap();
        assert_eq!(lead_tickets.len(), 1);
        assert_eq!(lead_tickets[0].ticket.id, t1.ticket.id);
        assert_eq!(lead_tickets[0].ticket.order, 0);

        let won_tickets = store.list_tickets_for_lane(&won.id).unwrap();
        assert_eq!(won_tickets.len(), 1);
        assert_eq!(won_tickets[0].ticket.id, t0.ticket.id);
    }

    #[test]
    fn test_reorder_tickets_rolls_back_on_missing_lane() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lead = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();
        let t0 = store.upsert_ticket(ticket_request(&lead.id, "T0")).unwrap();
        let t1 = store.upsert_ticket(ticket_request(&lead.id, "T1")).unwrap();

        let result = store.reorder_tickets(&[
            TicketOrder {
                id: t0.ticket.id.clone(),
                order: 1,
                lane_id: None,
            },
            TicketOrder {
                id: t1.ticket.id.clone(),
                order: 0,
                lane_id: Some("no-such-lane".to_string()),
            },
        ]);

        assert!(matches!(result, Err(BoardError::Conflict(_))));
        let t0_after = store.get_ticket(&t0.ticket.id).unwrap().unwrap();
        assert_eq!(t0_after.ticket.order, 0);
    }

    #[test]
    fn test_upsert_ticket_hydrates_relations() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lane = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();

        let member = store
            .upsert_member(UpsertMember {
                id: None,
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                avatar_url: None,
            })
            .unwrap();
        let contact = store
            .upsert_contact(UpsertContact {
                id: None,
                name: "Acme Corp".to_string(),
                email: "buyer@acme.test".to_string(),
                sub_account_id: "sub-1".to_string(),
            })
            .unwrap();
        let hot = store
            .upsert_tag(UpsertTag {
                id: None,
                name: "hot".to_string(),
                color: "red".to_string(),
                sub_account_id: "sub-1".to_string(),
            })
            .unwrap();
        let vip = store
            .upsert_tag(UpsertTag {
                id: None,
                name: "vip".to_string(),
                color: "gold".to_string(),
                sub_account_id: "sub-1".to_string(),
            })
            .unwrap();

        let mut request = ticket_request(&lane.id, "Big deal");
        request.assigned_user_id = Some(member.id.clone());
        request.customer_id = Some(contact.id.clone());
        request.tag_ids = vec![hot.id.clone(), vip.id.clone()];

        let details = store.upsert_ticket(request.clone()).unwrap();
        assert_eq!(details.assigned.as_ref().unwrap().name, "Ana");
        assert_eq!(details.customer.as_ref().unwrap().name, "Acme Corp");
        assert_eq!(details.lane.as_ref().unwrap().id, lane.id);
        let tag_names: Vec<&str> = details.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["hot", "vip"]);

        // Updating with a smaller tag set replaces the links
        request.id = Some(details.ticket.id.clone());
        request.tag_ids = vec![vip.id.clone()];
        let updated = store.upsert_ticket(request).unwrap();
        assert_eq!(updated.tags.len(), 1);
        assert_eq!(updated.tags[0].id, vip.id);
    }

    #[test]
    fn test_upsert_ticket_unknown_tag_is_conflict() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lane = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();

        let mut request = ticket_request(&lane.id, "Deal");
        request.tag_ids = vec!["ghost".to_string()];

        let result = store.upsert_ticket(request);
        assert!(matches!(result, Err(BoardError::Conflict(_))));
        assert_eq!(store.count_tickets(&lane.id).unwrap(), 0);
    }

    #[test]
    fn test_upsert_lane_for_missing_pipeline_is_conflict() {
        let store = create_test_store();
        let result = store.upsert_lane(lane_request("no-such-pipeline", "Lead"));
        assert!(matches!(result, Err(BoardError::Conflict(_))));
    }

    #[test]
    fn test_list_lanes_with_tickets_sorted() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lead = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();

        let mut late = ticket_request(&lead.id, "Late");
        late.order = Some(5);
        store.upsert_ticket(late).unwrap();
        let mut early = ticket_request(&lead.id, "Early");
        early.order = Some(1);
        store.upsert_ticket(early).unwrap();

        let lanes = store.list_lanes_with_tickets(&pipeline.id).unwrap();
        assert_eq!(lanes.len(), 1);
        let names: Vec<&str> = lanes[0]
            .tickets
            .iter()
            .map(|t| t.ticket.name.as_str())
            .collect();
        assert_eq!(names, vec!["Early", "Late"]);
        assert!(lanes[0].tickets[0].lane.is_none());
    }

    #[test]
    fn test_list_tickets_for_pipeline_spans_lanes() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let other = create_pipeline(&store);
        let lead = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();
        let won = store.upsert_lane(lane_request(&pipeline.id, "Won")).unwrap();
        let elsewhere = store.upsert_lane(lane_request(&other.id, "Lead")).unwrap();

        store.upsert_ticket(ticket_request(&won.id, "W")).unwrap();
        store.upsert_ticket(ticket_request(&lead.id, "L")).unwrap();
        store.upsert_ticket(ticket_request(&elsewhere.id, "X")).unwrap();

        let tickets = store.list_tickets_for_pipeline(&pipeline.id).unwrap();
        let names: Vec<&str> = tickets.iter().map(|t| t.ticket.name.as_str()).collect();
        assert_eq!(names, vec!["L", "W"]);
    }

    #[test]
    fn test_delete_lane_cascades_and_keeps_sibling_orders() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let a = store.upsert_lane(lane_request(&pipeline.id, "A")).unwrap();
        let b = store.upsert_lane(lane_request(&pipeline.id, "B")).unwrap();
        let c = store.upsert_lane(lane_request(&pipeline.id, "C")).unwrap();
        let ticket = store.upsert_ticket(ticket_request(&b.id, "T")).unwrap();

        let deleted = store.delete_lane(&b.id).unwrap();
        assert_eq!(deleted.id, b.id);
        assert!(store.get_ticket(&ticket.ticket.id).unwrap().is_none());

        assert_eq!(store.get_lane(&a.id).unwrap().unwrap().order, 0);
        assert_eq!(store.get_lane(&c.id).unwrap().unwrap().order, 2);

        // Appending after a delete uses the count, so it collides with C
        let d = store.upsert_lane(lane_request(&pipeline.id, "D")).unwrap();
        assert_eq!(d.order, 2);
    }

    #[test]
    fn test_delete_pipeline_cascades() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lane = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();
        store.upsert_ticket(ticket_request(&lane.id, "T")).unwrap();

        store.delete_pipeline(&pipeline.id).unwrap();

        assert!(store.get_pipeline(&pipeline.id).unwrap().is_none());
        assert!(store.get_lane(&lane.id).unwrap().is_none());
        assert_eq!(store.count_tickets(&lane.id).unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_rows_is_not_found() {
        let store = create_test_store();
        assert!(matches!(
            store.delete_pipeline("nope"),
            Err(BoardError::NotFound { entity: "pipeline", .. })
        ));
        assert!(matches!(
            store.delete_lane("nope"),
            Err(BoardError::NotFound { entity: "lane", .. })
        ));
        assert!(matches!(
            store.delete_ticket("nope"),
            Err(BoardError::NotFound { entity: "ticket", .. })
        ));
        assert!(matches!(
            store.delete_tag("nope"),
            Err(BoardError::NotFound { entity: "tag", .. })
        ));
    }

    #[test]
    fn test_delete_tag_unlinks_tickets() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);
        let lane = store.upsert_lane(lane_request(&pipeline.id, "Lead")).unwrap();
        let tag = store
            .upsert_tag(UpsertTag {
                id: None,
                name: "hot".to_string(),
                color: "red".to_string(),
                sub_account_id: "sub-1".to_string(),
            })
            .unwrap();

        let mut request = ticket_request(&lane.id, "Deal");
        request.tag_ids = vec![tag.id.clone()];
        let ticket = store.upsert_ticket(request).unwrap();

        store.delete_tag(&tag.id).unwrap();

        let fetched = store.get_ticket(&ticket.ticket.id).unwrap().unwrap();
        assert!(fetched.tags.is_empty());
    }

    #[test]
    fn test_upsert_tag_rejects_foreign_sub_account() {
        let store = create_test_store();
        let tag = store
            .upsert_tag(UpsertTag {
                id: None,
                name: "hot".to_string(),
                color: "red".to_string(),
                sub_account_id: "sub-1".to_string(),
            })
            .unwrap();

        let result = store.upsert_tag(UpsertTag {
            id: Some(tag.id.clone()),
            name: "stolen".to_string(),
            color: "red".to_string(),
            sub_account_id: "sub-2".to_string(),
        });

        assert!(matches!(result, Err(BoardError::Conflict(_))));
        assert_eq!(store.list_tags("sub-1").unwrap()[0].name, "hot");
    }

    #[test]
    fn test_search_contacts_by_name() {
        let store = create_test_store();
        for (name, sub) in [
            ("Acme Corp", "sub-1"),
            ("Acme Labs", "sub-1"),
            ("Globex", "sub-1"),
            ("Acme Other", "sub-2"),
        ] {
            store
                .upsert_contact(UpsertContact {
                    id: None,
                    name: name.to_string(),
                    email: "x@example.com".to_string(),
                    sub_account_id: sub.to_string(),
                })
                .unwrap();
        }

        let found = store.search_contacts("sub-1", "Acme").unwrap();
        let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Corp", "Acme Labs"]);

        assert_eq!(store.search_contacts("sub-1", "").unwrap().len(), 3);
        assert!(store.search_contacts("sub-1", "%").unwrap().is_empty());
    }

    #[test]
    fn test_list_pipelines_by_sub_account() {
        let store = create_test_store();
        create_pipeline(&store);
        create_pipeline(&store);
        store
            .upsert_pipeline(UpsertPipeline {
                id: None,
                name: "Other".to_string(),
                sub_account_id: "sub-2".to_string(),
            })
            .unwrap();

        assert_eq!(store.list_pipelines("sub-1").unwrap().len(), 2);
        assert_eq!(store.list_pipelines("sub-2").unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_pipeline_updates_in_place() {
        let store = create_test_store();
        let pipeline = create_pipeline(&store);

        let renamed = store
            .upsert_pipeline(UpsertPipeline {
                id: Some(pipeline.id.clone()),
                name: "Renamed".to_string(),
                sub_account_id: "sub-1".to_string(),
            })
            .unwrap();

        assert_eq!(renamed.id, pipeline.id);
        assert_eq!(renamed.created_at, pipeline.created_at);
        assert_eq!(store.get_pipeline(&pipeline.id).unwrap().unwrap().name, "Renamed");
        assert_eq!(store.list_pipelines("sub-1").unwrap().len(), 1);
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("board.db");

        let pipeline_id = {
            let store = SqliteBoardStore::new(&db_path).unwrap();
            create_pipeline(&store).id
        };

        assert!(db_path.exists());

        let reopened = SqliteBoardStore::new(&db_path).unwrap();
        assert!(reopened.get_pipeline(&pipeline_id).unwrap().is_some());
    }
}
