mod health;
mod orders;
mod prefetch;
mod prices;
mod swagger;
mod whitelist;
use health::health_checker_handler;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::AppState;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn make_app(state: Arc<AppState>) -> Router {
    let cors = state.config.cors_origin.as_deref().and_then(|origin| {
        match HeaderValue::from_str(origin) {
            Ok(origin) => Some(
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers(Any),
            ),
            Err(e) => {
                warn!(origin, error = %e, "ignoring invalid CORS_ORIGIN");
                None
            }
        }
    });

    let router = Router::new()
        .route("/api", get(health_checker_handler))
        .route("/api/health", get(health_checker_handler))
        .route("/prices/historic", get(prices::get_historic_prices_handler))
        .nest("/api/prices", prices::price_routes())
        .nest("/api/whitelist", whitelist::whitelist_routes())
        .nest("/api/orders", orders::order_routes())
        .nest("/api/prefetch", prefetch::prefetch_routes())
        .merge(swagger::build_documentation())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}
