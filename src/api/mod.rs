pub(crate) mod drinks;
pub(crate) mod health;

use crate::state::AppState;
use axum::Router;

/// Combines all API routes into a single router
pub(crate) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(drinks::router(state))
}
