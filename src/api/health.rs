use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

/// Liveness payload for the root path
#[utoipa::path(
    get,
    path = "/",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub(crate) async fn index() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Coffee Shop API is running",
    }))
}

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;

    #[tokio::test]
    async fn test_index_is_public() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/").await;
        response.assert_ok();
        assert_eq!(response.json["success"], true);
    }
}
