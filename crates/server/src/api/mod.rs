pub mod activity;
pub mod contacts;
pub mod errors;
pub mod handlers;
pub mod lanes;
pub mod members;
pub mod middleware;
pub mod pipelines;
pub mod routes;
pub mod tags;
pub mod tickets;

pub use routes::create_router;
