//! Board operations with activity attribution.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    BoardError, BoardStore, Contact, Lane, LaneDetails, LaneOrder, Member, Pipeline, Tag,
    TicketDetails, TicketOrder, UpsertContact, UpsertLane, UpsertMember, UpsertPipeline,
    UpsertTag, UpsertTicket,
};
use crate::activity::{ActivityEvent, ActivityHandle, Actor};
use crate::auth::Identity;
use crate::metrics::{DELETES_TOTAL, REORDER_BATCHES, REORDER_BATCH_SIZE, UPSERTS_TOTAL};

/// Entry point for board reads and writes.
///
/// Every call takes the caller's [`Identity`]. Successful writes are
/// reported to the activity queue; a dropped activity event never fails
/// the write.
#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn BoardStore>,
    activity: ActivityHandle,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, activity: ActivityHandle) -> Self {
        Self { store, activity }
    }

    fn emit(&self, identity: &Identity, event: ActivityEvent) {
        self.activity.try_emit(Actor::from_identity(identity), event);
    }

    fn pipeline_sub_account(&self, pipeline_id: &str) -> Option<String> {
        match self.store.get_pipeline(pipeline_id) {
            Ok(pipeline) => pipeline.map(|p| p.sub_account_id),
            Err(e) => {
                warn!(pipeline_id, error = %e, "Failed to resolve sub-account for activity");
                None
            }
        }
    }

    fn lane_sub_account(&self, lane_id: &str) -> Option<String> {
        match self.store.get_lane(lane_id) {
            Ok(lane) => lane.and_then(|l| self.pipeline_sub_account(&l.pipeline_id)),
            Err(e) => {
                warn!(lane_id, error = %e, "Failed to resolve sub-account for activity");
                None
            }
        }
    }

    // ========================================================================
    // Pipelines
    // ========================================================================

    pub fn upsert_pipeline(
        &self,
        identity: &Identity,
        request: UpsertPipeline,
    ) -> Result<Pipeline, BoardError> {
        let pipeline = self.store.upsert_pipeline(request)?;
        UPSERTS_TOTAL.with_label_values(&["pipeline"]).inc();

        info!(user_id = %identity.user_id, pipeline_id = %pipeline.id, "Pipeline saved");
        self.emit(
            identity,
            ActivityEvent::PipelineSaved {
                pipeline_id: pipeline.id.clone(),
                name: pipeline.name.clone(),
                sub_account_id: pipeline.sub_account_id.clone(),
            },
        );

        Ok(pipeline)
    }

    pub fn get_pipeline(&self, identity: &Identity, id: &str) -> Result<Pipeline, BoardError> {
        debug!(user_id = %identity.user_id, pipeline_id = id, "Fetching pipeline");
        self.store
            .get_pipeline(id)?
            .ok_or_else(|| BoardError::not_found("pipeline", id))
    }

    pub fn list_pipelines(
        &self,
        identity: &Identity,
        sub_account_id: &str,
    ) -> Result<Vec<Pipeline>, BoardError> {
        debug!(user_id = %identity.user_id, sub_account_id, "Listing pipelines");
        self.store.list_pipelines(sub_account_id)
    }

    pub fn delete_pipeline(&self, identity: &Identity, id: &str) -> Result<Pipeline, BoardError> {
        let pipeline = self.store.delete_pipeline(id)?;
        DELETES_TOTAL.with_label_values(&["pipeline"]).inc();

        info!(user_id = %identity.user_id, pipeline_id = id, "Pipeline deleted");
        self.emit(
            identity,
            ActivityEvent::PipelineDeleted {
                pipeline_id: pipeline.id.clone(),
                name: pipeline.name.clone(),
                sub_account_id: pipeline.sub_account_id.clone(),
            },
        );

        Ok(pipeline)
    }

    // ========================================================================
    // Lanes
    // ========================================================================

    /// Create or update a lane. New lanes without an order go last.
    pub fn upsert_lane(&self, identity: &Identity, request: UpsertLane) -> Result<Lane, BoardError> {
        let lane = self.store.upsert_lane(request)?;
        UPSERTS_TOTAL.with_label_values(&["lane"]).inc();

        info!(
            user_id = %identity.user_id,
            lane_id = %lane.id,
            pipeline_id = %lane.pipeline_id,
            order = lane.order,
            "Lane saved"
        );
        self.emit(
            identity,
            ActivityEvent::LaneSaved {
                lane_id: lane.id.clone(),
                name: lane.name.clone(),
                pipeline_id: lane.pipeline_id.clone(),
                order: lane.order,
                sub_account_id: self.pipeline_sub_account(&lane.pipeline_id),
            },
        );

        Ok(lane)
    }

    pub fn get_lane(&self, identity: &Identity, id: &str) -> Result<Lane, BoardError> {
        debug!(user_id = %identity.user_id, lane_id = id, "Fetching lane");
        self.store
            .get_lane(id)?
            .ok_or_else(|| BoardError::not_found("lane", id))
    }

    pub fn count_lanes(&self, identity: &Identity, pipeline_id: &str) -> Result<i64, BoardError> {
        debug!(user_id = %identity.user_id, pipeline_id, "Counting lanes");
        self.store.count_lanes(pipeline_id)
    }

    pub fn list_lanes_with_tickets(
        &self,
        identity: &Identity,
        pipeline_id: &str,
    ) -> Result<Vec<LaneDetails>, BoardError> {
        debug!(user_id = %identity.user_id, pipeline_id, "Listing lanes");
        self.store.list_lanes_with_tickets(pipeline_id)
    }

    pub fn delete_lane(&self, identity: &Identity, id: &str) -> Result<Lane, BoardError> {
        let lane = self.store.delete_lane(id)?;
        DELETES_TOTAL.with_label_values(&["lane"]).inc();

        info!(user_id = %identity.user_id, lane_id = id, "Lane deleted");
        self.emit(
            identity,
            ActivityEvent::LaneDeleted {
                lane_id: lane.id.clone(),
                name: lane.name.clone(),
                pipeline_id: lane.pipeline_id.clone(),
                sub_account_id: self.pipeline_sub_account(&lane.pipeline_id),
            },
        );

        Ok(lane)
    }

    /// Apply a lane reorder batch. Either every entry is applied or none is.
    pub fn reorder_lanes(&self, identity: &Identity, lanes: &[LaneOrder]) -> Result<(), BoardError> {
        REORDER_BATCH_SIZE
            .with_label_values(&["lanes"])
            .observe(lanes.len() as f64);

        if let Err(e) = self.store.reorder_lanes(lanes) {
            REORDER_BATCHES.with_label_values(&["lanes", "failed"]).inc();
            warn!(user_id = %identity.user_id, entries = lanes.len(), error = %e, "Lane reorder failed");
            return Err(e);
        }
        REORDER_BATCHES.with_label_values(&["lanes", "success"]).inc();

        info!(user_id = %identity.user_id, entries = lanes.len(), "Lanes reordered");
        if let Some(first) = lanes.first() {
            self.emit(
                identity,
                ActivityEvent::LanesReordered {
                    lane_ids: lanes.iter().map(|l| l.id.clone()).collect(),
                    sub_account_id: self.lane_sub_account(&first.id),
                },
            );
        }

        Ok(())
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Create or update a ticket. New tickets without an order go last in their lane.
    pub fn upsert_ticket(
        &self,
        identity: &Identity,
        request: UpsertTicket,
    ) -> Result<TicketDetails, BoardError> {
        let details = self.store.upsert_ticket(request)?;
        UPSERTS_TOTAL.with_label_values(&["ticket"]).inc();

        let ticket = &details.ticket;
        info!(
            user_id = %identity.user_id,
            ticket_id = %ticket.id,
            lane_id = %ticket.lane_id,
            order = ticket.order,
            "Ticket saved"
        );
        self.emit(
            identity,
            ActivityEvent::TicketSaved {
                ticket_id: ticket.id.clone(),
                name: ticket.name.clone(),
                lane_id: ticket.lane_id.clone(),
                order: ticket.order,
                sub_account_id: details
                    .lane
                    .as_ref()
                    .and_then(|lane| self.pipeline_sub_account(&lane.pipeline_id)),
            },
        );

        Ok(details)
    }

    pub fn get_ticket(&self, identity: &Identity, id: &str) -> Result<TicketDetails, BoardError> {
        debug!(user_id = %identity.user_id, ticket_id = id, "Fetching ticket");
        self.store
            .get_ticket(id)?
            .ok_or_else(|| BoardError::not_found("ticket", id))
    }

    pub fn count_tickets(&self, identity: &Identity, lane_id: &str) -> Result<i64, BoardError> {
        debug!(user_id = %identity.user_id, lane_id, "Counting tickets");
        self.store.count_tickets(lane_id)
    }

    pub fn list_tickets_for_pipeline(
        &self,
        identity: &Identity,
        pipeline_id: &str,
    ) -> Result<Vec<TicketDetails>, BoardError> {
        debug!(user_id = %identity.user_id, pipeline_id, "Listing pipeline tickets");
        self.store.list_tickets_for_pipeline(pipeline_id)
    }

    pub fn list_tickets_for_lane(
        &self,
        identity: &Identity,
        lane_id: &str,
    ) -> Result<Vec<TicketDetails>, BoardError> {
        debug!(user_id = %identity.user_id, lane_id, "Listing lane tickets");
        self.store.list_tickets_for_lane(lane_id)
    }

    pub fn delete_ticket(
        &self,
        identity: &Identity,
        id: &str,
    ) -> Result<TicketDetails, BoardError> {
        let details = self.store.delete_ticket(id)?;
        DELETES_TOTAL.with_label_values(&["ticket"]).inc();

        info!(user_id = %identity.user_id, ticket_id = id, "Ticket deleted");
        self.emit(
            identity,
            ActivityEvent::TicketDeleted {
                ticket_id: details.ticket.id.clone(),
                name: details.ticket.name.clone(),
                lane_id: details.ticket.lane_id.clone(),
                sub_account_id: details
                    .lane
                    .as_ref()
                    .and_then(|lane| self.pipeline_sub_account(&lane.pipeline_id)),
            },
        );

        Ok(details)
    }

    /// Apply a ticket reorder batch, including moves across lanes.
    /// Either every entry is applied or none is.
    pub fn reorder_tickets(
        &self,
        identity: &Identity,
        tickets: &[TicketOrder],
    ) -> Result<(), BoardError> {
        REORDER_BATCH_SIZE
            .with_label_values(&["tickets"])
            .observe(tickets.len() as f64);

        if let Err(e) = self.store.reorder_tickets(tickets) {
            REORDER_BATCHES.with_label_values(&["tickets", "failed"]).inc();
            warn!(user_id = %identity.user_id, entries = tickets.len(), error = %e, "Ticket reorder failed");
            return Err(e);
        }
        REORDER_BATCHES.with_label_values(&["tickets", "success"]).inc();

        info!(user_id = %identity.user_id, entries = tickets.len(), "Tickets reordered");
        if let Some(first) = tickets.first() {
            let sub_account_id = match self.store.get_ticket(&first.id) {
                Ok(Some(details)) => self.lane_sub_account(&details.ticket.lane_id),
                _ => None,
            };
            self.emit(
                identity,
                ActivityEvent::TicketsReordered {
                    ticket_ids: tickets.iter().map(|t| t.id.clone()).collect(),
                    sub_account_id,
                },
            );
        }

        Ok(())
    }

    // ========================================================================
    // Tags, contacts, members
    // ========================================================================

    pub fn upsert_tag(&self, identity: &Identity, request: UpsertTag) -> Result<Tag, BoardError> {
        let tag = self.store.upsert_tag(request)?;
        UPSERTS_TOTAL.with_label_values(&["tag"]).inc();

        info!(user_id = %identity.user_id, tag_id = %tag.id, "Tag saved");
        self.emit(
            identity,
            ActivityEvent::TagSaved {
                tag_id: tag.id.clone(),
                name: tag.name.clone(),
                sub_account_id: tag.sub_account_id.clone(),
            },
        );

        Ok(tag)
    }

    pub fn list_tags(
        &self,
        identity: &Identity,
        sub_account_id: &str,
    ) -> Result<Vec<Tag>, BoardError> {
        debug!(user_id = %identity.user_id, sub_account_id, "Listing tags");
        self.store.list_tags(sub_account_id)
    }

    pub fn delete_tag(&self, identity: &Identity, id: &str) -> Result<Tag, BoardError> {
        let tag = self.store.delete_tag(id)?;
        DELETES_TOTAL.with_label_values(&["tag"]).inc();

        info!(user_id = %identity.user_id, tag_id = id, "Tag deleted");
        self.emit(
            identity,
            ActivityEvent::TagDeleted {
                tag_id: tag.id.clone(),
                name: tag.name.clone(),
                sub_account_id: tag.sub_account_id.clone(),
            },
        );

        Ok(tag)
    }

    pub fn upsert_contact(
        &self,
        identity: &Identity,
        request: UpsertContact,
    ) -> Result<Contact, BoardError> {
        let contact = self.store.upsert_contact(request)?;
        UPSERTS_TOTAL.with_label_values(&["contact"]).inc();

        info!(user_id = %identity.user_id, contact_id = %contact.id, "Contact saved");
        self.emit(
            identity,
            ActivityEvent::ContactSaved {
                contact_id: contact.id.clone(),
                name: contact.name.clone(),
                sub_account_id: contact.sub_account_id.clone(),
            },
        );

        Ok(contact)
    }

    pub fn search_contacts(
        &self,
        identity: &Identity,
        sub_account_id: &str,
        term: &str,
    ) -> Result<Vec<Contact>, BoardError> {
        debug!(user_id = %identity.user_id, sub_account_id, term, "Searching contacts");
        self.store.search_contacts(sub_account_id, term)
    }

    pub fn upsert_member(
        &self,
        identity: &Identity,
        request: UpsertMember,
    ) -> Result<Member, BoardError> {
        let member = self.store.upsert_member(request)?;
        UPSERTS_TOTAL.with_label_values(&["member"]).inc();

        info!(user_id = %identity.user_id, member_id = %member.id, "Member saved");
        self.emit(
            identity,
            ActivityEvent::MemberSaved {
                member_id: member.id.clone(),
                name: member.name.clone(),
            },
        );

        Ok(member)
    }

    pub fn get_member(&self, identity: &Identity, id: &str) -> Result<Member, BoardError> {
        debug!(user_id = %identity.user_id, member_id = id, "Fetching member");
        self.store
            .get_member(id)?
            .ok_or_else(|| BoardError::not_found("member", id))
    }
}
