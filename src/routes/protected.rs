use axum::{Extension, Json};

use crate::dto::auth_dto::ProtectedResponse;
use crate::models::user::Claims;

/// Claims are only present when the identity gate ran.
#[axum::debug_handler]
pub async fn protected(claims: Option<Extension<Claims>>) -> Json<ProtectedResponse> {
    let claims = claims.map(|Extension(c)| c);
    Json(ProtectedResponse::granted(claims.as_ref()))
}
