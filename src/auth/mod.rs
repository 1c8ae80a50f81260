//! Bearer-token authorization for protected routes.
//!
//! Protected routes are wrapped in [`authorize`], a middleware whose state
//! carries the permission that route requires. The public endpoints are
//! simply not wrapped.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::header::AUTHORIZATION;
use http::StatusCode;
use log::warn;
use thiserror::Error;

use crate::errors::ApiError;
use crate::state::AppState;
use verifier::Claims;

pub mod verifier;

/// Permission required to read full drink details.
pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
/// Permission required to create drinks.
pub const POST_DRINKS: &str = "post:drinks";
/// Permission required to modify drinks.
pub const PATCH_DRINKS: &str = "patch:drinks";
/// Permission required to remove drinks.
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Errors that can occur while authorizing a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingHeader,
    #[error("authorization header must be 'Bearer <token>'")]
    InvalidHeader,
    #[error("no signing key matches the token")]
    UnknownKey,
    #[error("token is invalid: {0}")]
    InvalidToken(String),
    #[error("token is malformed: {0}")]
    MalformedToken(String),
    #[error("permissions claim is missing from the token")]
    MissingPermissions,
    #[error("permission '{0}' is not granted")]
    Forbidden(String),
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::InvalidHeader
            | AuthError::UnknownKey
            | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::MalformedToken(_) | AuthError::MissingPermissions => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::KeyFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Authorization middleware. The state tuple carries the permission the
/// wrapped route requires; verified claims are handed to the route via
/// request extensions so handlers never re-validate.
pub async fn authorize(
    State((state, permission)): State<(AppState, &'static str)>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match check_permission(&state, &request, permission).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            warn!("authorization rejected: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

async fn check_permission(
    state: &AppState,
    request: &Request<Body>,
    permission: &str,
) -> Result<Claims, AuthError> {
    let token = bearer_token(request)?;
    let claims = state.verifier.verify(token).await?;

    // A token without the claim is rejected differently than a token that
    // merely lacks the permission.
    let granted = claims
        .permissions
        .as_deref()
        .ok_or(AuthError::MissingPermissions)?;
    if !granted.iter().any(|p| p == permission) {
        return Err(AuthError::Forbidden(permission.to_string()));
    }

    Ok(claims)
}

/// Extracts the raw token from an `Authorization: Bearer <token>` header.
fn bearer_token(request: &Request<Body>) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::InvalidHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_header(value: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/drinks-detail");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let request = request_with_header(None);
        assert!(matches!(
            bearer_token(&request),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let request = request_with_header(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(
            bearer_token(&request),
            Err(AuthError::InvalidHeader)
        ));
    }

    #[test]
    fn test_bearer_token_missing_token() {
        let request = request_with_header(Some("Bearer"));
        assert!(matches!(
            bearer_token(&request),
            Err(AuthError::InvalidHeader)
        ));

        let request = request_with_header(Some("Bearer "));
        assert!(matches!(
            bearer_token(&request),
            Err(AuthError::InvalidHeader)
        ));
    }

    #[test]
    fn test_bearer_token_trailing_parts() {
        let request = request_with_header(Some("Bearer one two"));
        assert!(matches!(
            bearer_token(&request),
            Err(AuthError::InvalidHeader)
        ));
    }

    #[test]
    fn test_bearer_token_accepts_any_scheme_case() {
        let request = request_with_header(Some("bearer abc.def.ghi"));
        assert_eq!(bearer_token(&request).unwrap(), "abc.def.ghi");

        let request = request_with_header(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&request).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::MissingHeader.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken("expired".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MalformedToken("bad json".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::MissingPermissions.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Forbidden("post:drinks".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
