use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Extension, Json, Router};
use http::StatusCode;
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::auth::verifier::Claims;
use crate::auth::{self, authorize};
use crate::db::models::{encode_recipe, parse_recipe, Drink};
use crate::errors::ApiError;
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;

/// Upper bound on drink titles; they are short display identifiers.
const MAX_TITLE_LEN: usize = 80;

/// Request body for creating or patching a drink
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct DrinkPayload {
    /// Unique display title
    #[serde(default)]
    title: Option<String>,
    /// One ingredient mapping or a sequence of them
    #[serde(default)]
    #[schema(value_type = Object)]
    recipe: Option<Value>,
}

enum DrinkView {
    Short,
    Long,
}

/// Renders drinks into the `{success, drinks}` envelope. A stored recipe
/// that no longer decodes is a fatal data error.
fn drinks_envelope(drinks: &[Drink], view: DrinkView) -> Result<Value, ApiError> {
    let mut rendered = Vec::with_capacity(drinks.len());
    for drink in drinks {
        let value = match view {
            DrinkView::Short => drink.short(),
            DrinkView::Long => drink.long(),
        }
        .map_err(|err| {
            log::error!("stored recipe for drink {} is corrupt: {}", drink.id, err);
            ApiError::internal("stored recipe could not be decoded")
        })?;
        rendered.push(value);
    }
    Ok(json!({
        "success": true,
        "drinks": rendered,
    }))
}

fn validate_title(title: String) -> Result<String, ApiError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(ApiError::bad_request("title is too long"));
    }
    Ok(title)
}

fn validate_recipe(value: &Value) -> Result<String, ApiError> {
    let ingredients = parse_recipe(value).map_err(ApiError::bad_request)?;
    encode_recipe(&ingredients)
        .map_err(|err| ApiError::internal(format!("failed to encode recipe: {}", err)))
}

/// Public listing in the short representation
#[utoipa::path(
    get,
    path = "/drinks",
    tag = DRINKS_TAG,
    responses(
        (status = 200, description = "All drinks in the short representation")
    )
)]
pub(crate) async fn list_drinks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let drinks = state.store.list().await?;
    let body = drinks_envelope(&drinks, DrinkView::Short)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Permission-gated listing in the long representation
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = DRINKS_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer token with get:drinks-detail"),
    ),
    responses(
        (status = 200, description = "All drinks in the long representation"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Permission not granted")
    )
)]
pub(crate) async fn list_drinks_detail(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    debug!("drink detail requested by '{}'", claims.sub);
    let drinks = state.store.list().await?;
    let body = drinks_envelope(&drinks, DrinkView::Long)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Creates a drink and returns its long representation
#[utoipa::path(
    post,
    path = "/drinks",
    tag = DRINKS_TAG,
    request_body = DrinkPayload,
    params(
        ("Authorization" = String, Header, description = "Bearer token with post:drinks"),
    ),
    responses(
        (status = 200, description = "The created drink in the long representation"),
        (status = 400, description = "Missing or malformed fields"),
        (status = 422, description = "A drink with this title already exists")
    )
)]
pub(crate) async fn create_drink(
    State(state): State<AppState>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) =
        payload.map_err(|err| ApiError::bad_request(format!("invalid request body: {}", err)))?;

    let title = payload
        .title
        .ok_or_else(|| ApiError::bad_request("title is required"))
        .and_then(validate_title)?;
    let recipe = payload
        .recipe
        .ok_or_else(|| ApiError::bad_request("recipe is required"))?;
    let recipe = validate_recipe(&recipe)?;

    let drink = state.store.insert(title, recipe).await?;
    debug!("created drink {} '{}'", drink.id, drink.title);

    let body = drinks_envelope(std::slice::from_ref(&drink), DrinkView::Long)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Applies the provided fields to an existing drink
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    request_body = DrinkPayload,
    params(
        ("id" = i32, Path, description = "Drink identifier"),
        ("Authorization" = String, Header, description = "Bearer token with patch:drinks"),
    ),
    responses(
        (status = 200, description = "The updated drink in the long representation"),
        (status = 400, description = "Malformed fields"),
        (status = 404, description = "No drink with this id"),
        (status = 422, description = "A drink with this title already exists")
    )
)]
pub(crate) async fn update_drink(
    State(state): State<AppState>,
    drink_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(drink_id) =
        drink_id.map_err(|err| ApiError::bad_request(format!("invalid drink id: {}", err)))?;

    // Unknown ids reject before the body is considered.
    state
        .store
        .find(drink_id)
        .await?
        .ok_or_else(|| ApiError::not_found("drink not found"))?;

    let Json(payload) =
        payload.map_err(|err| ApiError::bad_request(format!("invalid request body: {}", err)))?;

    let title = payload.title.map(validate_title).transpose()?;
    let recipe = payload
        .recipe
        .as_ref()
        .map(validate_recipe)
        .transpose()?;

    let drink = state.store.update(drink_id, title, recipe).await?;
    debug!("updated drink {}", drink.id);

    let body = drinks_envelope(std::slice::from_ref(&drink), DrinkView::Long)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Removes a drink
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    params(
        ("id" = i32, Path, description = "Drink identifier"),
        ("Authorization" = String, Header, description = "Bearer token with delete:drinks"),
    ),
    responses(
        (status = 200, description = "The drink was removed"),
        (status = 400, description = "Malformed drink id"),
        (status = 404, description = "No drink with this id")
    )
)]
pub(crate) async fn delete_drink(
    State(state): State<AppState>,
    drink_id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(drink_id) =
        drink_id.map_err(|err| ApiError::bad_request(format!("invalid drink id: {}", err)))?;

    state.store.delete(drink_id).await?;
    let body = json!({
        "success": true,
        "delete": drink_id,
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Drink routes; every mutating or detailed route is wrapped in the
/// authorization gate with its required permission.
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/drinks", get(list_drinks))
        .route(
            "/drinks",
            post(create_drink).route_layer(middleware::from_fn_with_state(
                (state.clone(), auth::POST_DRINKS),
                authorize,
            )),
        )
        .route(
            "/drinks-detail",
            get(list_drinks_detail).route_layer(middleware::from_fn_with_state(
                (state.clone(), auth::GET_DRINKS_DETAIL),
                authorize,
            )),
        )
        .route(
            "/drinks/{id}",
            patch(update_drink).route_layer(middleware::from_fn_with_state(
                (state.clone(), auth::PATCH_DRINKS),
                authorize,
            )),
        )
        .route(
            "/drinks/{id}",
            delete(delete_drink).route_layer(middleware::from_fn_with_state(
                (state.clone(), auth::DELETE_DRINKS),
                authorize,
            )),
        )
}
