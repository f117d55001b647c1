use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::ingestion::IngestionError;
use crate::services::retrieval::RetrievalError;

/// Message returned by `/transcribe` for any failure other than a failed job.
pub const PROCESSING_ERROR: &str = "Error processing file";
/// Message returned by `/transcribe` when the job ends in `FAILED`.
pub const JOB_FAILED: &str = "Transcription job failed";
/// Message returned by `/get-file` for every failure.
pub const FETCH_ERROR: &str = "Error fetching the file";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Ingestion error: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Any failure behind the fixed-key endpoint, reported with one message.
    #[error("Fetch error: {0}")]
    Fetch(RetrievalError),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg }))
            }
            AppError::Ingestion(e) => {
                tracing::error!("Error processing file: {}", e);
                let body = match e {
                    IngestionError::JobFailed { .. } => {
                        json!({ "message": JOB_FAILED, "kind": e.kind() })
                    }
                    _ => json!({ "error": PROCESSING_ERROR, "kind": e.kind() }),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::Retrieval(e) => {
                let status = match e {
                    RetrievalError::NotFound(_) => StatusCode::NOT_FOUND,
                    RetrievalError::Encoding(_) | RetrievalError::Parse(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    RetrievalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                tracing::error!("Error fetching transcript: {}", e);
                (status, json!({ "error": e.to_string(), "kind": e.kind() }))
            }
            AppError::Fetch(e) => {
                tracing::error!("Error fetching the file: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": FETCH_ERROR }))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": PROCESSING_ERROR }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::time::Duration;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_job_failure_uses_message_field() {
        let (status, body) = render(AppError::Ingestion(IngestionError::JobFailed {
            job_name: "job".to_string(),
            reason: "unsupported codec".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], JOB_FAILED);
        assert_eq!(body["kind"], "job_failed");
    }

    #[tokio::test]
    async fn test_other_ingestion_errors_collapse() {
        let (status, body) = render(AppError::Ingestion(IngestionError::TimedOut {
            job_name: "job".to_string(),
            waited: Duration::from_secs(3600),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], PROCESSING_ERROR);
        assert_eq!(body["kind"], "timeout");
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let (status, body) = render(AppError::PayloadTooLarge("too big".to_string())).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "too big");
    }

    #[tokio::test]
    async fn test_fixed_key_fetch_error_shape() {
        let (status, body) =
            render(AppError::Fetch(RetrievalError::NotFound("x.json".to_string()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": FETCH_ERROR }));
    }

    #[tokio::test]
    async fn test_retrieval_error_statuses() {
        let (status, body) =
            render(AppError::Retrieval(RetrievalError::NotFound("x.json".to_string()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");

        let parse_err = serde_json::from_str::<Value>("{nope").unwrap_err();
        let (status, body) = render(AppError::Retrieval(RetrievalError::Parse(parse_err))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "malformed");
    }
}
