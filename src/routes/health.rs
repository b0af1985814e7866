use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[axum::debug_handler]
pub async fn home() -> impl IntoResponse {
    let body = json!({
        "status": "StudySync Backend Running",
    });
    (StatusCode::OK, Json(body))
}
