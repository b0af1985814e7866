use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{AuthError, Error};
use crate::models::user::Claims;
use crate::services::identity_service::IdentityVerifier;
use crate::AppState;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authorized(Claims),
    Unauthorized(AuthError),
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;
    let value = value.to_str().map_err(|_| AuthError::MissingCredential)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredential)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

pub async fn authorize(headers: &HeaderMap, verifier: &dyn IdentityVerifier) -> AuthOutcome {
    let token = match bearer_token(headers) {
        Ok(token) => token,
        Err(reason) => return AuthOutcome::Unauthorized(reason),
    };
    match verifier.verify(token).await {
        Ok(claims) => AuthOutcome::Authorized(claims),
        Err(reason) => AuthOutcome::Unauthorized(reason),
    }
}

/// Requires a verified bearer token when an identity verifier is configured
/// and lets every request through otherwise. Verified claims are stored in
/// the request extensions.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(verifier) = state.identity.as_deref() else {
        return next.run(req).await;
    };

    match authorize(req.headers(), verifier).await {
        AuthOutcome::Authorized(claims) => {
            tracing::debug!(sub = %claims.sub, "Request authenticated");
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        AuthOutcome::Unauthorized(reason) => {
            tracing::info!(reason = %reason, path = %req.uri().path(), "Rejected unauthenticated request");
            Error::Unauthorized(reason).into_response()
        }
    }
}
