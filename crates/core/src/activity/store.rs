use thiserror::Error;

use super::ActivityRecord;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Filter for querying activity records
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub sub_account_id: Option<String>,
    pub user_id: Option<String>,
    pub event_type: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ActivityFilter {
    pub fn new() -> Self {
        Self {
            limit: 100,
            offset: 0,
            ..Default::default()
        }
    }

    pub fn with_sub_account_id(mut self, sub_account_id: impl Into<String>) -> Self {
        self.sub_account_id = Some(sub_account_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for activity record storage
pub trait ActivityStore: Send + Sync {
    /// Insert an activity record, returns the assigned ID
    fn insert(&self, record: &ActivityRecord) -> Result<i64, ActivityError>;

    /// Query activity records, newest first
    fn query(&self, filter: &ActivityFilter) -> Result<Vec<ActivityRecord>, ActivityError>;

    /// Count matching activity records
    fn count(&self, filter: &ActivityFilter) -> Result<i64, ActivityError>;
}
