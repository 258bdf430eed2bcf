use axum::{
    extract::{Path, Query, State},
    Json,
};
use laneboard_core::{Contact, UpsertContact};
use serde::Deserialize;
use std::sync::Arc;

use super::errors::{board_error, ApiError};
use super::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactSearchParams {
    /// Name substring; empty matches every contact
    #[serde(default)]
    pub q: String,
}

pub async fn search_contacts(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(sub_account_id): Path<String>,
    Query(params): Query<ContactSearchParams>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    state
        .board()
        .search_contacts(&identity, &sub_account_id, &params.q)
        .map(Json)
        .map_err(board_error)
}

pub async fn upsert_contact(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(request): Json<UpsertContact>,
) -> Result<Json<Contact>, ApiError> {
    state
        .board()
        .upsert_contact(&identity, request)
        .map(Json)
        .map_err(board_error)
}
