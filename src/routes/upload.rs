use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::dto::upload_dto::UploadResponse;
use crate::error::{Error, Result};
use crate::models::upload::{UploadCategory, UploadedFile};
use crate::utils::validation::sanitize_filename;
use crate::AppState;

/// Collects the file parts named after `category`. Parts without a usable
/// filename are skipped; other fields are drained and ignored.
async fn collect_files(multipart: &mut Multipart, category: UploadCategory) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(Error::Multipart)? {
        if field.name() != Some(category.as_str()) {
            continue;
        }
        if !category.accepts_many() && !files.is_empty() {
            continue;
        }

        let Some(filename) = field.file_name().and_then(sanitize_filename) else {
            tracing::debug!(category = %category, "Skipping file part without a usable filename");
            continue;
        };
        let content = field.bytes().await.map_err(Error::Multipart)?;

        files.push(UploadedFile {
            filename,
            content,
            category,
        });
    }

    Ok(files)
}

async fn handle_upload(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
    category: UploadCategory,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    // A body that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(category = %category, "Upload without multipart body: {}", rejection);
        Error::MissingFile(category.missing_message().to_string())
    })?;

    let files = collect_files(&mut multipart, category).await?;
    state.upload_service.save(category, &files).await?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            message: category.success_message().to_string(),
        }),
    ))
}

#[axum::debug_handler]
pub async fn upload_syllabus(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    handle_upload(&state, multipart, UploadCategory::Syllabus).await
}

#[axum::debug_handler]
pub async fn upload_pyqs(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    handle_upload(&state, multipart, UploadCategory::Pyqs).await
}
