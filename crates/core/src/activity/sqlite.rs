use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{ActivityError, ActivityEvent, ActivityFilter, ActivityRecord, ActivityStore};

/// SQLite-backed activity store
pub struct SqliteActivityStore {
    conn: Mutex<Connection>,
}

impl SqliteActivityStore {
    /// Create a new SQLite activity store, creating the database file and tables if needed
    pub fn new(path: &Path) -> Result<Self, ActivityError> {
        let conn = Connection::open(path).map_err(|e| ActivityError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite activity store (useful for testing)
    pub fn in_memory() -> Result<Self, ActivityError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ActivityError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ActivityError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS activity_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                user_id TEXT NOT NULL,
                sub_account_id TEXT,
                notification TEXT NOT NULL,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activity_events_timestamp ON activity_events(timestamp);
            CREATE INDEX IF NOT EXISTS idx_activity_events_sub_account ON activity_events(sub_account_id);
            CREATE INDEX IF NOT EXISTS idx_activity_events_event_type ON activity_events(event_type);
            CREATE INDEX IF NOT EXISTS idx_activity_events_user_id ON activity_events(user_id);
            "#,
        )
        .map_err(|e| ActivityError::Database(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ActivityError> {
        self.conn
            .lock()
            .map_err(|_| ActivityError::Database("activity connection lock poisoned".to_string()))
    }

    fn build_where_clause(filter: &ActivityFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref sub_account_id) = filter.sub_account_id {
            conditions.push("sub_account_id = ?");
            params.push(Box::new(sub_account_id.clone()));
        }

        if let Some(ref user_id) = filter.user_id {
            conditions.push("user_id = ?");
            params.push(Box::new(user_id.clone()));
        }

        if let Some(ref event_type) = filter.event_type {
            conditions.push("event_type = ?");
            params.push(Box::new(event_type.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }
}

impl ActivityStore for SqliteActivityStore {
    fn insert(&self, record: &ActivityRecord) -> Result<i64, ActivityError> {
        let conn = self.lock()?;

        let data_json = serde_json::to_string(&record.data)
            .map_err(|e| ActivityError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO activity_events (timestamp, event_type, user_id, sub_account_id, notification, data) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                record.timestamp.to_rfc3339(),
                record.event_type,
                record.user_id,
                record.sub_account_id,
                record.notification,
                data_json,
            ],
        )
        .map_err(|e| ActivityError::Database(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    }

    fn query(&self, filter: &ActivityFilter) -> Result<Vec<ActivityRecord>, ActivityError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT id, timestamp, event_type, user_id, sub_account_id, notification, data FROM activity_events {} ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
            where_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ActivityError::Database(e.to_string()))?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let id: i64 = row.get(0)?;
                let timestamp_str: String = row.get(1)?;
                let event_type: String = row.get(2)?;
                let user_id: String = row.get(3)?;
                let sub_account_id: Option<String> = row.get(4)?;
                let notification: String = row.get(5)?;
                let data_json: String = row.get(6)?;

                Ok((
                    id,
                    timestamp_str,
                    event_type,
                    user_id,
                    sub_account_id,
                    notification,
                    data_json,
                ))
            })
            .map_err(|e| ActivityError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row_result in rows {
            let (id, timestamp_str, event_type, user_id, sub_account_id, notification, data_json) =
                row_result.map_err(|e| ActivityError::Database(e.to_string()))?;

            let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|e| ActivityError::Database(format!("Invalid timestamp: {}", e)))?
                .into();

            let data: ActivityEvent = serde_json::from_str(&data_json)
                .map_err(|e| ActivityError::Serialization(e.to_string()))?;

            records.push(ActivityRecord {
                id,
                timestamp,
                event_type,
                user_id,
                sub_account_id,
                notification,
                data,
            });
        }

        Ok(records)
    }

    fn count(&self, filter: &ActivityFilter) -> Result<i64, ActivityError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM activity_events {}", where_clause);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count: i64 = conn
            .query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| ActivityError::Database(e.to_string()))?;

        Ok(count)
    }
}
