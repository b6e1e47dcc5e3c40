use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{HistoricPriceQuery, HistoricPriceResponse},
        Error,
    },
    prices::{PriceSeriesResult, CACHE_CONTROL},
    AppState,
};

/// Defines the OpenAPI spec for price endpoints
#[derive(OpenApi)]
#[openapi(paths(get_historic_prices_handler))]
pub struct PricesApi;

/// Used to group price endpoints together in the OpenAPI documentation
pub const PRICES_API_GROUP: &str = "PRICES";

/// Builds a router for price routes
pub fn price_routes() -> Router<Arc<AppState>> {
    Router::new().route("/historic", get(get_historic_prices_handler))
}

/// Historic price series handler function
#[utoipa::path(
    get,
    path = "/prices/historic",
    tag = PRICES_API_GROUP,
    params(HistoricPriceQuery),
    responses(
        (status = 200, description = "Rows ascending by date, or `data: null` when there is no data", body = HistoricPriceResponse),
        (status = 400, description = "Missing required parameters", body = crate::models::dto::ErrorMessage),
        (status = 500, description = "Price store failure", body = crate::models::dto::ErrorMessage),
    )
)]
pub async fn get_historic_prices_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoricPriceQuery>,
) -> Result<Response, Error> {
    let symbol = query.symbol.as_deref().unwrap_or_default();
    let field = query.field.as_deref().unwrap_or_default();

    let response = match state.prices.historic_series(symbol, field).await? {
        PriceSeriesResult::Empty => Json(HistoricPriceResponse { data: None }).into_response(),
        PriceSeriesResult::Data(rows) => (
            [(header::CACHE_CONTROL, CACHE_CONTROL)],
            Json(HistoricPriceResponse { data: Some(rows) }),
        )
            .into_response(),
    };
    Ok(response)
}
