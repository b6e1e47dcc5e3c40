use std::sync::Arc;

use axum::{routing::post, Json, Router};
use utoipa::OpenApi;

use crate::{
    models::dto::FillPercentageResponse,
    orders::{reconcile_fill_percentage, OrderRecord},
    AppState,
};

/// Defines the OpenAPI spec for order endpoints
#[derive(OpenApi)]
#[openapi(paths(fill_percentage_handler))]
pub struct OrdersApi;

/// Used to group order endpoints together in the OpenAPI documentation
pub const ORDERS_API_GROUP: &str = "ORDERS";

/// Builds a router for order routes
pub fn order_routes() -> Router<Arc<AppState>> {
    Router::new().route("/fill-percentage", post(fill_percentage_handler))
}

/// Remaining fill percentage handler function
#[utoipa::path(
    post,
    path = "/api/orders/fill-percentage",
    tag = ORDERS_API_GROUP,
    request_body = crate::models::dto::OrderRecordBody,
    responses(
        (status = 200, description = "Remaining unfilled proportion scaled by 1e18", body = FillPercentageResponse),
        (status = 422, description = "Body is not an order record"),
    )
)]
pub async fn fill_percentage_handler(Json(order): Json<OrderRecord>) -> Json<FillPercentageResponse> {
    Json(FillPercentageResponse {
        remaining_fill_percentage: reconcile_fill_percentage(&order).to_string(),
    })
}
