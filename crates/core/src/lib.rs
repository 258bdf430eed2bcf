pub mod activity;
pub mod auth;
pub mod board;
pub mod config;
pub mod metrics;

pub use activity::{
    create_activity_system, ActivityError, ActivityEvent, ActivityFilter, ActivityHandle,
    ActivityRecord, ActivityStore, ActivityWriter, Actor, SqliteActivityStore,
};
pub use auth::{
    create_authenticator, ApiKeyAuthenticator, AuthError, AuthRequest, Authenticator, Identity,
    NoneAuthenticator,
};
pub use board::{
    BoardError, BoardService, BoardStore, Contact, Lane, LaneDetails, LaneOrder, Member,
    Pipeline, SqliteBoardStore, Tag, Ticket, TicketDetails, TicketOrder, UpsertContact,
    UpsertLane, UpsertMember, UpsertPipeline, UpsertTag, UpsertTicket,
};
pub use config::{
    load_config, load_config_from_str, validate_config, ActivityConfig, AuthConfig, AuthMethod,
    Config, ConfigError, DatabaseConfig, SanitizedConfig, ServerConfig,
};
