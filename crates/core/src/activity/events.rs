use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Board change events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    // Pipelines
    PipelineSaved {
        pipeline_id: String,
        name: String,
        sub_account_id: String,
    },
    PipelineDeleted {
        pipeline_id: String,
        name: String,
        sub_account_id: String,
    },

    // Lanes
    LaneSaved {
        lane_id: String,
        name: String,
        pipeline_id: String,
        order: i64,
        /// Owning sub-account, when the pipeline could be resolved.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_account_id: Option<String>,
    },
    LaneDeleted {
        lane_id: String,
        name: String,
        pipeline_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_account_id: Option<String>,
    },
    LanesReordered {
        lane_ids: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_account_id: Option<String>,
    },

    // Tickets
    TicketSaved {
        ticket_id: String,
        name: String,
        lane_id: String,
        order: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_account_id: Option<String>,
    },
    TicketDeleted {
        ticket_id: String,
        name: String,
        lane_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_account_id: Option<String>,
    },
    TicketsReordered {
        ticket_ids: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sub_account_id: Option<String>,
    },

    // Tags, contacts and members
    TagSaved {
        tag_id: String,
        name: String,
        sub_account_id: String,
    },
    TagDeleted {
        tag_id: String,
        name: String,
        sub_account_id: String,
    },
    ContactSaved {
        contact_id: String,
        name: String,
        sub_account_id: String,
    },
    MemberSaved {
        member_id: String,
        name: String,
    },
}

impl ActivityEvent {
    /// Get the event type as a string (for database storage)
    pub fn event_type(&self) -> &'static str {
        match self {
            ActivityEvent::PipelineSaved { .. } => "pipeline_saved",
            ActivityEvent::PipelineDeleted { .. } => "pipeline_deleted",
            ActivityEvent::LaneSaved { .. } => "lane_saved",
            ActivityEvent::LaneDeleted { .. } => "lane_deleted",
            ActivityEvent::LanesReordered { .. } => "lanes_reordered",
            ActivityEvent::TicketSaved { .. } => "ticket_saved",
            ActivityEvent::TicketDeleted { .. } => "ticket_deleted",
            ActivityEvent::TicketsReordered { .. } => "tickets_reordered",
            ActivityEvent::TagSaved { .. } => "tag_saved",
            ActivityEvent::TagDeleted { .. } => "tag_deleted",
            ActivityEvent::ContactSaved { .. } => "contact_saved",
            ActivityEvent::MemberSaved { .. } => "member_saved",
        }
    }

    /// Sub-account the change belongs to, if known
    pub fn sub_account_id(&self) -> Option<&str> {
        match self {
            ActivityEvent::PipelineSaved { sub_account_id, .. }
            | ActivityEvent::PipelineDeleted { sub_account_id, .. }
            | ActivityEvent::TagSaved { sub_account_id, .. }
            | ActivityEvent::TagDeleted { sub_account_id, .. }
            | ActivityEvent::ContactSaved { sub_account_id, .. } => Some(sub_account_id),
            ActivityEvent::LaneSaved { sub_account_id, .. }
            | ActivityEvent::LaneDeleted { sub_account_id, .. }
            | ActivityEvent::LanesReordered { sub_account_id, .. }
            | ActivityEvent::TicketSaved { sub_account_id, .. }
            | ActivityEvent::TicketDeleted { sub_account_id, .. }
            | ActivityEvent::TicketsReordered { sub_account_id, .. } => sub_account_id.as_deref(),
            ActivityEvent::MemberSaved { .. } => None,
        }
    }

    /// Human-readable summary shown in the notification feed
    pub fn description(&self) -> String {
        match self {
            ActivityEvent::PipelineSaved { name, .. } => format!("Saved pipeline {}", name),
            ActivityEvent::PipelineDeleted { name, .. } => format!("Deleted pipeline {}", name),
            ActivityEvent::LaneSaved { name, .. } => format!("Saved lane {}", name),
            ActivityEvent::LaneDeleted { name, .. } => format!("Deleted lane {}", name),
            ActivityEvent::LanesReordered { lane_ids, .. } => {
                format!("Reordered {} lane(s)", lane_ids.len())
            }
            ActivityEvent::TicketSaved { name, .. } => format!("Saved ticket {}", name),
            ActivityEvent::TicketDeleted { name, .. } => format!("Deleted ticket {}", name),
            ActivityEvent::TicketsReordered { ticket_ids, .. } => {
                format!("Moved {} ticket(s)", ticket_ids.len())
            }
            ActivityEvent::TagSaved { name, .. } => format!("Saved tag {}", name),
            ActivityEvent::TagDeleted { name, .. } => format!("Deleted tag {}", name),
            ActivityEvent::ContactSaved { name, .. } => format!("Saved contact {}", name),
            ActivityEvent::MemberSaved { name, .. } => format!("Saved member {}", name),
        }
    }
}

/// Who caused an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub name: String,
}

impl Actor {
    pub fn from_identity(identity: &crate::auth::Identity) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            name: identity.display_name().to_string(),
        }
    }
}

/// Stored activity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub user_id: String,
    pub sub_account_id: Option<String>,
    /// Feed text, `"<actor name> | <description>"`.
    pub notification: String,
    pub data: ActivityEvent,
}

/// Format the feed text for an event.
pub fn notification_text(actor: &Actor, event: &ActivityEvent) -> String {
    format!("{} | {}", actor.name, event.description())
}
