use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{activity, contacts, handlers, lanes, members, pipelines, tags, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Reachable without credentials
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::get_metrics));

    let protected_routes = Router::new()
        .route("/config", get(handlers::get_config))
        // Activity
        .route("/activity", get(activity::query_activity))
        // Pipelines
        .route("/sub-accounts/{id}/pipelines", get(pipelines::list_pipelines))
        .route("/pipelines", post(pipelines::upsert_pipeline))
        .route("/pipelines/{id}", get(pipelines::get_pipeline))
        .route("/pipelines/{id}", delete(pipelines::delete_pipeline))
        .route("/pipelines/{id}/lanes", get(pipelines::list_pipeline_lanes))
        .route("/pipelines/{id}/tickets", get(pipelines::list_pipeline_tickets))
        // Lanes
        .route("/lanes", post(lanes::upsert_lane))
        .route("/lanes/order", put(lanes::reorder_lanes))
        .route("/lanes/{id}", get(lanes::get_lane))
        .route("/lanes/{id}", delete(lanes::delete_lane))
        .route("/lanes/{id}/tickets", get(lanes::list_lane_tickets))
        // Tickets
        .route("/tickets", post(tickets::upsert_ticket))
        .route("/tickets/order", put(tickets::reorder_tickets))
        .route("/tickets/{id}", get(tickets::get_ticket))
        .route("/tickets/{id}", delete(tickets::delete_ticket))
        // Tags
        .route("/sub-accounts/{id}/tags", get(tags::list_tags))
        .route("/tags", post(tags::upsert_tag))
        .route("/tags/{id}", delete(tags::delete_tag))
        // Contacts
        .route("/sub-accounts/{id}/contacts", get(contacts::search_contacts))
        .route("/contacts", post(contacts::upsert_contact))
        // Members
        .route("/members", post(members::upsert_member))
        .route("/members/{id}", get(members::get_member))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes).with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
