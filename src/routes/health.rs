use crate::models::dto::Message;
use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(paths(
    health_checker_handler
))]
/// Defines the OpenAPI spec for the health endpoint
pub struct HealthApi;
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "HEALTH",
    responses(
        (status = OK, description = "Success", body = Message)
    )
)]
pub async fn health_checker_handler() -> impl IntoResponse {
    Json(Message::new("OK"))
}
