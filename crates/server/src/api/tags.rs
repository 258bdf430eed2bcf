use axum::{
    extract::{Path, State},
    Json,
};
use laneboard_core::{Tag, UpsertTag};
use std::sync::Arc;

use super::errors::{board_error, ApiError};
use super::middleware::AuthUser;
use crate::state::AppState;

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(sub_account_id): Path<String>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    state
        .board()
        .list_tags(&identity, &sub_account_id)
        .map(Json)
        .map_err(board_error)
}

pub async fn upsert_tag(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(request): Json<UpsertTag>,
) -> Result<Json<Tag>, ApiError> {
    state
        .board()
        .upsert_tag(&identity, request)
        .map(Json)
        .map_err(board_error)
}

/// Delete a tag and detach it from every ticket.
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Tag>, ApiError> {
    state
        .board()
        .delete_tag(&identity, &id)
        .map(Json)
        .map_err(board_error)
}
