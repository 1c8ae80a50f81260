//! Coffee Shop API
//!
//! A drink catalog service: public listing, permission-gated detail and
//! management endpoints, backed by a single SQLite table.
//!
//! ## Endpoints
//!
//! - `GET /` - liveness payload
//! - `GET /drinks` - public listing, short representation
//! - `GET /drinks-detail` - full listing, requires `get:drinks-detail`
//! - `POST /drinks` - create a drink, requires `post:drinks`
//! - `PATCH /drinks/{id}` - modify a drink, requires `patch:drinks`
//! - `DELETE /drinks/{id}` - remove a drink, requires `delete:drinks`
//! - `GET /openapi.json`, `GET /scalar` - API documentation
//!
//! Tokens are verified against the identity provider's published key set;
//! permissions travel in the token's `permissions` claim.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod state;
#[cfg(test)]
mod test_utils;

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::state::AppState;

/// Create a new application instance with a given state
pub async fn create_app(state: AppState) -> Router {
    let api_doc = openapi::ApiDoc::openapi();
    let openapi_json = {
        let doc = api_doc.clone();
        get(move || async move { Json(doc) })
    };

    Router::new()
        .merge(api::router(&state))
        .merge(Scalar::with_url("/scalar", api_doc))
        .route("/openapi.json", openapi_json)
        .with_state(state)
}
