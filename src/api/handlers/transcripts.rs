use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::AppState;
use crate::api::error::AppError;
use crate::services::retrieval::{self, RetrievalError};

#[utoipa::path(
    get,
    path = "/get-file",
    responses(
        (status = 200, description = "Configured transcript object", body = crate::models::TranscriptPayload),
        (status = 500, description = "Object missing or not JSON")
    ),
    tag = "transcription"
)]
pub async fn get_file(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let key = state
        .config
        .result_object_key
        .as_deref()
        .ok_or_else(|| AppError::Fetch(RetrievalError::NotFound("RESULT_OBJECT_KEY".to_string())))?;

    let document = retrieval::fetch_json(state.results.as_ref(), key)
        .await
        .map_err(AppError::Fetch)?;

    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/transcripts/{key}",
    params(
        ("key" = String, Path, description = "Object key of the transcript, e.g. `<job-name>.json`")
    ),
    responses(
        (status = 200, description = "Transcript object", body = crate::models::TranscriptPayload),
        (status = 404, description = "No object under this key"),
        (status = 422, description = "Object is not UTF-8 JSON"),
        (status = 500, description = "Storage failure")
    ),
    tag = "transcription"
)]
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let document = retrieval::fetch_json(state.results.as_ref(), &key).await?;
    Ok(Json(document))
}
