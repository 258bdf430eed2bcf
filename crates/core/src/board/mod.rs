//! Pipelines, lanes and tickets with caller-controlled ordering.

mod order;
mod service;
mod sqlite_store;
mod store;
mod types;

pub use order::{resolve_id, resolve_order};
pub use service::BoardService;
pub use sqlite_store::SqliteBoardStore;
pub use store::{BoardError, BoardStore};
pub use types::{
    Contact, Lane, LaneDetails, LaneOrder, Member, Pipeline, Tag, Ticket, TicketDetails,
    TicketOrder, UpsertContact, UpsertLane, UpsertMember, UpsertPipeline, UpsertTag,
    UpsertTicket,
};
