use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use serde_json::Value;
use utoipa::ToSchema;

use crate::AppState;
use crate::api::error::AppError;
use crate::models::UploadedFile;

const TOO_LARGE: &str = "Request body exceeds the maximum allowed limit";

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(TOO_LARGE.to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Multipart body of `POST /transcribe`.
#[derive(ToSchema)]
pub struct TranscribeUpload {
    /// Audio or video file to transcribe
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/transcribe",
    request_body(content = TranscribeUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Transcript document produced by the transcription job", body = crate::models::TranscriptPayload),
        (status = 400, description = "No file part in the request"),
        (status = 413, description = "Upload exceeds the configured size limit"),
        (status = 500, description = "Storage, job or download failure")
    ),
    tag = "transcription"
)]
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() == Some("file") {
            let received = UploadedFile::receive(&state.config.upload_dir, field)
                .await
                .map_err(|e| match e
                    .get_ref()
                    .and_then(|inner| inner.downcast_ref::<MultipartError>())
                {
                    Some(inner) if inner.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                        AppError::PayloadTooLarge(TOO_LARGE.to_string())
                    }
                    _ => AppError::Internal(format!("Failed to buffer upload: {}", e)),
                })?;
            upload = Some(received);
            break;
        }
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let cancel = state.shutdown.child_token();
    let transcript = state.ingestion.submit(upload, &cancel).await?;

    Ok(Json(transcript))
}
