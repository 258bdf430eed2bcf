//! Core board data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entities
// ============================================================================

/// A sales process container owned by a sub-account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipeline {
    pub id: String,
    pub name: String,
    pub sub_account_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stage within a pipeline ("Lead", "Won", ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lane {
    pub id: String,
    pub name: String,
    pub pipeline_id: String,
    /// Zero-based position among the pipeline's lanes.
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sales opportunity placed in exactly one lane at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub name: String,
    pub lane_id: String,
    /// Zero-based position among the lane's tickets.
    pub order: i64,
    /// Monetary value of the opportunity.
    ///
    /// Held as a binary float (SQLite `REAL`). Amounts with up to 15
    /// significant digits read back as the same decimal they were written
    /// with, but sums computed from them are not exact; convert to minor
    /// units before doing arithmetic on money.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Contact this opportunity is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Team member working the opportunity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A label scoped to a sub-account and attachable to tickets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub sub_account_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer contact of a sub-account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub sub_account_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A team member that tickets can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Hydrated aggregates
// ============================================================================

/// A ticket together with its related rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketDetails {
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Owning lane. Only loaded by queries that ask for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane: Option<Lane>,
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned: Option<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Contact>,
}

/// A lane with its tickets, both sorted by `order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaneDetails {
    #[serde(flatten)]
    pub lane: Lane,
    pub tickets: Vec<TicketDetails>,
}

// ============================================================================
// Write requests
// ============================================================================

/// Create-or-update request for a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertPipeline {
    /// Existing id to update; a new id is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub sub_account_id: String,
}

/// Create-or-update request for a lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertLane {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub pipeline_id: String,
    /// Explicit position. When absent a new lane is appended to the end
    /// and an existing lane keeps its position.
    #[serde(default)]
    pub order: Option<i64>,
}

/// Create-or-update request for a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertTicket {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub lane_id: String,
    #[serde(default)]
    pub order: Option<i64>,
    /// Monetary value, see [`Ticket::value`] for its precision.
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub assigned_user_id: Option<String>,
    /// Full tag set for the ticket; replaces any previous links.
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

/// Create-or-update request for a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertTag {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub color: String,
    pub sub_account_id: String,
}

/// Create-or-update request for a contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertContact {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub sub_account_id: String,
}

/// Create-or-update request for a team member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertMember {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

// ============================================================================
// Reorder batches
// ============================================================================

/// New position for a lane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaneOrder {
    pub id: String,
    pub order: i64,
}

/// New position for a ticket, optionally in a different lane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketOrder {
    pub id: String,
    pub order: i64,
    /// Target lane when the ticket moves across lanes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_id: Option<String>,
}
