use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::debug;
use utoipa::OpenApi;

use crate::{
    models::dto::{PrefetchResponse, PrefetchTargetInfo},
    AppState,
};

/// Defines the OpenAPI spec for prefetch endpoints
#[derive(OpenApi)]
#[openapi(paths(schedule_prefetch_handler))]
pub struct PrefetchApi;

/// Used to group prefetch endpoints together in the OpenAPI documentation
pub const PREFETCH_API_GROUP: &str = "PREFETCH";

pub fn prefetch_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(schedule_prefetch_handler))
}

/// Asset prefetch handler function
#[utoipa::path(
    post,
    path = "/api/prefetch",
    tag = PREFETCH_API_GROUP,
    request_body = [PrefetchTargetInfo],
    responses(
        (status = 202, description = "Prefetch scheduled in the background", body = PrefetchResponse),
    )
)]
pub async fn schedule_prefetch_handler(
    State(state): State<Arc<AppState>>,
    Json(targets): Json<Vec<PrefetchTargetInfo>>,
) -> (StatusCode, Json<PrefetchResponse>) {
    let scheduled = match &state.prefetch {
        Some(scheduler) => {
            let progress = scheduler.schedule(targets.into_iter().map(Into::into).collect());
            progress.total()
        }
        None => {
            debug!("asset host not configured, skipping prefetch");
            0
        }
    };

    (StatusCode::ACCEPTED, Json(PrefetchResponse { scheduled }))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::{
        external::{AssetFetcher, FetchError},
        routes::{make_app, testing::*},
        scheduler::INITIAL_DELAY,
    };

    use super::*;

    #[derive(Default)]
    struct RecordingFetcher {
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AssetFetcher for RecordingFetcher {
        async fn fetch(&self, id: &str) -> Result<(), FetchError> {
            self.fetched.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn schedules_distinct_assets() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let app = make_app(state(None, None, Some(fetcher.clone() as Arc<dyn AssetFetcher>)));
        let targets = json!([
            {"id": "HEX"},
            {"id": "PLS", "priority": true},
            {"id": "HEX"},
        ]);

        let (status, _, body) = send(app, post_json("/api/prefetch", &targets)).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body, json!({"scheduled": 2}));

        tokio::time::sleep(INITIAL_DELAY * 2).await;
        assert_eq!(*fetcher.fetched.lock().unwrap(), vec!["PLS", "HEX"]);
    }

    #[tokio::test]
    async fn without_asset_host_nothing_is_scheduled() {
        let app = make_app(state(None, None, None));

        let (status, _, body) =
            send(app, post_json("/api/prefetch", &json!([{"id": "HEX"}]))).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body, json!({"scheduled": 0}));
    }
}
