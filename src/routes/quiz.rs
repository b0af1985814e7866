use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::dto::quiz_dto::{GenerateQuizResponse, GetQuizRequest, GetQuizResponse};
use crate::error::{Error, Result};
use crate::AppState;

#[axum::debug_handler]
pub async fn generate_quiz(State(state): State<AppState>) -> Json<GenerateQuizResponse> {
    let generated = state.quiz_service.generate_quiz().await;
    Json(GenerateQuizResponse::from(generated))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GetQuizRequest>, JsonRejection>,
) -> Result<Json<GetQuizResponse>> {
    let Json(payload) = payload.map_err(|rejection| Error::BadRequest(rejection.body_text()))?;
    let unit_ids = payload.unit_ids();

    tracing::debug!(units = ?unit_ids, "Assembling quiz from question banks");
    let quiz = state.quiz_service.get_quiz(&unit_ids).await?;

    Ok(Json(GetQuizResponse { quiz }))
}
