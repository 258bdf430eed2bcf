//! Ticket endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use laneboard_core::{TicketDetails, TicketOrder, UpsertTicket};
use std::sync::Arc;

use super::errors::{board_error, ApiError};
use super::middleware::AuthUser;
use crate::state::AppState;

/// Create or update a ticket, replacing its tag set.
pub async fn upsert_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(request): Json<UpsertTicket>,
) -> Result<Json<TicketDetails>, ApiError> {
    state
        .board()
        .upsert_ticket(&identity, request)
        .map(Json)
        .map_err(board_error)
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TicketDetails>, ApiError> {
    state
        .board()
        .get_ticket(&identity, &id)
        .map(Json)
        .map_err(board_error)
}

pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TicketDetails>, ApiError> {
    state
        .board()
        .delete_ticket(&identity, &id)
        .map(Json)
        .map_err(board_error)
}

/// Apply a batch of ticket positions, including moves across lanes.
pub async fn reorder_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(tickets): Json<Vec<TicketOrder>>,
) -> Result<StatusCode, ApiError> {
    state
        .board()
        .reorder_tickets(&identity, &tickets)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(board_error)
}
