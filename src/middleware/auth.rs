use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::VerifiedIdentity;
use crate::error::ApiError;

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<VerifiedIdentity> for AuthUser {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TokenError {
    Missing,
    Malformed(&'static str),
}

/// Bearer token authentication for note routes. Rejected requests never reach
/// a handler; the client only sees a generic 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match extract_bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(TokenError::Missing) => {
            tracing::warn!("Rejected {} {}: missing Authorization header", request.method(), request.uri().path());
            return Err(ApiError::unauthorized("Missing token"));
        }
        Err(TokenError::Malformed(reason)) => {
            tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), reason);
            return Err(ApiError::unauthorized("Invalid token"));
        }
    };

    let identity = state.verifier.verify(&token).await.map_err(|e| {
        tracing::warn!("Token verification failed for {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::unauthorized("Invalid token")
    })?;

    tracing::debug!("Authenticated user {}", identity.user_id);
    request.extensions_mut().insert(AuthUser::from(identity));

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers.get(AUTHORIZATION).ok_or(TokenError::Missing)?;
    let value = value
        .to_str()
        .map_err(|_| TokenError::Malformed("Authorization header is not valid ASCII"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(TokenError::Malformed("Authorization header must use Bearer token format"))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed("Authorization header must use Bearer token format"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Malformed("Empty bearer token"));
    }
    Ok(token)
}
