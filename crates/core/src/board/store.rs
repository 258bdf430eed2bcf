//! Board storage trait and errors.

use thiserror::Error;

use super::{
    Contact, Lane, LaneDetails, LaneOrder, Member, Pipeline, Tag, TicketDetails, TicketOrder,
    UpsertContact, UpsertLane, UpsertMember, UpsertPipeline, UpsertTag, UpsertTicket,
};

/// Error type for board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The write violates a storage constraint (e.g. a missing parent row).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other storage failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl BoardError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<rusqlite::Error> for BoardError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, _)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                BoardError::Conflict(err.to_string())
            }
            other => BoardError::Database(other.to_string()),
        }
    }
}

/// Repository for pipelines, lanes, tickets and their related rows.
///
/// Implementations must apply each reorder batch atomically.
pub trait BoardStore: Send + Sync {
    // Pipelines

    fn upsert_pipeline(&self, request: UpsertPipeline) -> Result<Pipeline, BoardError>;

    fn get_pipeline(&self, id: &str) -> Result<Option<Pipeline>, BoardError>;

    /// Pipelines of a sub-account, oldest first.
    fn list_pipelines(&self, sub_account_id: &str) -> Result<Vec<Pipeline>, BoardError>;

    /// Delete a pipeline together with its lanes and their tickets.
    fn delete_pipeline(&self, id: &str) -> Result<Pipeline, BoardError>;

    // Lanes

    /// Create or update a lane, appending new lanes when no order is given.
    fn upsert_lane(&self, request: UpsertLane) -> Result<Lane, BoardError>;

    fn get_lane(&self, id: &str) -> Result<Option<Lane>, BoardError>;

    /// Number of lanes currently in a pipeline.
    fn count_lanes(&self, pipeline_id: &str) -> Result<i64, BoardError>;

    /// Lanes of a pipeline with their tickets, tags, assignees and customers.
    fn list_lanes_with_tickets(&self, pipeline_id: &str) -> Result<Vec<LaneDetails>, BoardError>;

    /// Delete a lane and its tickets. Remaining lanes keep their orders.
    fn delete_lane(&self, id: &str) -> Result<Lane, BoardError>;

    /// Apply new lane positions in one transaction.
    fn reorder_lanes(&self, lanes: &[LaneOrder]) -> Result<(), BoardError>;

    // Tickets

    /// Create or update a ticket and replace its tag set.
    fn upsert_ticket(&self, request: UpsertTicket) -> Result<TicketDetails, BoardError>;

    /// A ticket with all relations, including its lane.
    fn get_ticket(&self, id: &str) -> Result<Option<TicketDetails>, BoardError>;

    /// Number of tickets currently in a lane.
    fn count_tickets(&self, lane_id: &str) -> Result<i64, BoardError>;

    /// Every ticket across a pipeline's lanes, with tags, assignee and customer.
    fn list_tickets_for_pipeline(&self, pipeline_id: &str)
        -> Result<Vec<TicketDetails>, BoardError>;

    /// Tickets of one lane with all relations.
    fn list_tickets_for_lane(&self, lane_id: &str) -> Result<Vec<TicketDetails>, BoardError>;

    /// Delete a ticket. Remaining tickets keep their orders.
    fn delete_ticket(&self, id: &str) -> Result<TicketDetails, BoardError>;

    /// Apply new ticket positions (and lane moves) in one transaction.
    fn reorder_tickets(&self, tickets: &[TicketOrder]) -> Result<(), BoardError>;

    // Tags

    fn upsert_tag(&self, request: UpsertTag) -> Result<Tag, BoardError>;

    fn list_tags(&self, sub_account_id: &str) -> Result<Vec<Tag>, BoardError>;

    fn delete_tag(&self, id: &str) -> Result<Tag, BoardError>;

    // Contacts

    fn upsert_contact(&self, request: UpsertContact) -> Result<Contact, BoardError>;

    /// Contacts of a sub-account whose name contains `term`.
    fn search_contacts(&self, sub_account_id: &str, term: &str)
        -> Result<Vec<Contact>, BoardError>;

    // Members

    fn upsert_member(&self, request: UpsertMember) -> Result<Member, BoardError>;

    fn get_member(&self, id: &str) -> Result<Option<Member>, BoardError>;
}
