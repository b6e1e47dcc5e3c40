use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{WhitelistEntryResponse, WhitelistSnapshotResponse},
        Error,
    },
    AppState,
};

/// Defines the OpenAPI spec for whitelist endpoints
#[derive(OpenApi)]
#[openapi(paths(
    get_whitelist_handler,
    get_active_tokens_handler,
    get_whitelist_entry_handler
))]
pub struct WhitelistApi;

/// Used to group whitelist endpoints together in the OpenAPI documentation
pub const WHITELIST_API_GROUP: &str = "WHITELIST";

/// Builds a router for whitelist routes
pub fn whitelist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_whitelist_handler))
        .route("/active", get(get_active_tokens_handler))
        .route("/:index", get(get_whitelist_entry_handler))
}

/// Full whitelist handler function
#[utoipa::path(
    get,
    path = "/api/whitelist",
    tag = WHITELIST_API_GROUP,
    responses(
        (status = 200, description = "Whitelist read from the order book", body = WhitelistSnapshotResponse),
        (status = 502, description = "Contract read failed", body = crate::models::dto::ErrorMessage),
        (status = 503, description = "Order book not configured for the active chain", body = crate::models::dto::ErrorMessage),
    )
)]
pub async fn get_whitelist_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WhitelistSnapshotResponse>, Error> {
    let snapshot = state.whitelist.snapshot().await?;
    Ok(Json(snapshot.into()))
}

/// Active tokens handler function
#[utoipa::path(
    get,
    path = "/api/whitelist/active",
    tag = WHITELIST_API_GROUP,
    responses(
        (status = 200, description = "Active whitelist entries in index order", body = [WhitelistEntryResponse]),
        (status = 502, description = "Contract read failed", body = crate::models::dto::ErrorMessage),
        (status = 503, description = "Order book not configured for the active chain", body = crate::models::dto::ErrorMessage),
    )
)]
pub async fn get_active_tokens_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WhitelistEntryResponse>>, Error> {
    let tokens = state.whitelist.active_tokens().await?;
    Ok(Json(tokens.into_iter().map(Into::into).collect()))
}

/// Single whitelist entry handler function
#[utoipa::path(
    get,
    path = "/api/whitelist/{index}",
    tag = WHITELIST_API_GROUP,
    params(
        ("index" = u64, Path, description = "Position in the contract's whitelist")
    ),
    responses(
        (status = 200, description = "Whitelist entry", body = WhitelistEntryResponse),
        (status = 404, description = "Index out of range", body = crate::models::dto::ErrorMessage),
        (status = 502, description = "Contract read failed", body = crate::models::dto::ErrorMessage),
        (status = 503, description = "Order book not configured for the active chain", body = crate::models::dto::ErrorMessage),
    )
)]
pub async fn get_whitelist_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<u64>,
) -> Result<Json<WhitelistEntryResponse>, Error> {
    let entry = state.whitelist.entry_at(index).await?;
    Ok(Json(entry.into()))
}
