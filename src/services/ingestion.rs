use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::transcript::primary_transcript;
use crate::models::{ObjectKey, UploadedFile};
use crate::services::storage::{StorageError, StorageService};
use crate::services::transcription::{
    JobRequest, JobSnapshot, JobStatus, TranscriptionError, TranscriptionService,
};

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to store upload: {0}")]
    Storage(#[source] StorageError),

    #[error(transparent)]
    JobStart(TranscriptionError),

    #[error(transparent)]
    JobStatus(TranscriptionError),

    #[error("Transcription job {job_name} failed: {reason}")]
    JobFailed { job_name: String, reason: String },

    #[error("Transcription job {job_name} still running after {waited:?}")]
    TimedOut { job_name: String, waited: Duration },

    #[error("Stopped waiting for transcription job {job_name}")]
    Cancelled { job_name: String },

    #[error("Failed to prepare transcript download: {0}")]
    ResultUrl(#[source] StorageError),

    #[error("Failed to download transcript: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Transcript is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl IngestionError {
    /// Short machine-readable category surfaced to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionError::Storage(_) => "storage",
            IngestionError::JobStart(_) => "job_start",
            IngestionError::JobStatus(_) => "job_status",
            IngestionError::JobFailed { .. } => "job_failed",
            IngestionError::TimedOut { .. } => "timeout",
            IngestionError::Cancelled { .. } => "cancelled",
            IngestionError::ResultUrl(_) | IngestionError::Fetch(_) => "result_fetch",
            IngestionError::Parse(_) => "parse",
        }
    }
}

/// Tunables of the polling workflow.
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    pub language_code: String,
    pub poll_interval: Duration,
    pub max_wait: Option<Duration>,
    pub result_url_ttl: Duration,
}

impl From<&AppConfig> for IngestionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            language_code: config.language_code.clone(),
            poll_interval: config.poll_interval,
            max_wait: config.max_wait,
            result_url_ttl: config.result_url_ttl,
        }
    }
}

/// Store -> start job -> poll -> fetch result.
pub struct IngestionWorkflow {
    storage: Arc<dyn StorageService>,
    transcriber: Arc<dyn TranscriptionService>,
    http: reqwest::Client,
    settings: IngestionSettings,
}

impl IngestionWorkflow {
    pub fn new(
        storage: Arc<dyn StorageService>,
        transcriber: Arc<dyn TranscriptionService>,
        http: reqwest::Client,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            storage,
            transcriber,
            http,
            settings,
        }
    }

    /// Runs the whole workflow for one upload and returns the transcript
    /// document exactly as the transcription service wrote it.
    ///
    /// The local buffer is discarded before returning on every path.
    pub async fn submit(
        &self,
        upload: UploadedFile,
        cancel: &CancellationToken,
    ) -> Result<Value, IngestionError> {
        let key = ObjectKey::generate(upload.original_name());
        info!(
            key = %key,
            size = upload.size(),
            content_type = upload.content_type().unwrap_or("unknown"),
            "🎙️  Starting transcription workflow"
        );

        let outcome = self.run(&upload, &key, cancel).await;

        let path = upload.path().to_path_buf();
        if let Err(e) = upload.discard() {
            warn!("Failed to remove upload buffer {}: {}", path.display(), e);
        }

        outcome
    }

    async fn run(
        &self,
        upload: &UploadedFile,
        key: &ObjectKey,
        cancel: &CancellationToken,
    ) -> Result<Value, IngestionError> {
        self.storage
            .upload_path(key.as_str(), upload.path())
            .await
            .map_err(IngestionError::Storage)?;
        debug!(key = %key, bucket = self.storage.bucket(), "Upload stored");

        let request = JobRequest {
            job_name: key.to_string(),
            media_uri: self.storage.object_uri(key.as_str()),
            language_code: self.settings.language_code.clone(),
            output_bucket: self.storage.bucket().to_string(),
        };
        self.transcriber
            .start_job(&request)
            .await
            .map_err(IngestionError::JobStart)?;
        info!(job_name = %request.job_name, "Transcription job started");

        self.wait_for_completion(&request.job_name, cancel).await?;

        let transcript = self.fetch_result(&key.result_key()).await?;
        info!(
            job_name = %request.job_name,
            text_length = primary_transcript(&transcript).map(str::len).unwrap_or(0),
            "✅ Transcription completed"
        );
        Ok(transcript)
    }

    /// Polls until the job is terminal. The first check happens immediately,
    /// later ones are spaced by the poll interval.
    pub async fn wait_for_completion(
        &self,
        job_name: &str,
        cancel: &CancellationToken,
    ) -> Result<JobSnapshot, IngestionError> {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let snapshot = self
                .transcriber
                .job_status(job_name)
                .await
                .map_err(IngestionError::JobStatus)?;

            if snapshot.status.is_terminal() {
                if snapshot.status == JobStatus::Failed {
                    let reason = snapshot
                        .failure_reason
                        .unwrap_or_else(|| "no reason given".to_string());
                    warn!(job_name, %reason, "Transcription job failed");
                    return Err(IngestionError::JobFailed {
                        job_name: job_name.to_string(),
                        reason,
                    });
                }
                return Ok(snapshot);
            }
            debug!(job_name, attempt, status = %snapshot.status, "Transcription job not finished");

            if let Some(max_wait) = self.settings.max_wait {
                let waited = started.elapsed();
                if waited + self.settings.poll_interval > max_wait {
                    return Err(IngestionError::TimedOut {
                        job_name: job_name.to_string(),
                        waited,
                    });
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(job_name, "Polling cancelled");
                    return Err(IngestionError::Cancelled { job_name: job_name.to_string() });
                }
                _ = sleep(self.settings.poll_interval) => {}
            }
        }
    }

    async fn fetch_result(&self, result_key: &str) -> Result<Value, IngestionError> {
        let url = self
            .storage
            .presigned_get_url(result_key, self.settings.result_url_ttl)
            .await
            .map_err(IngestionError::ResultUrl)?;

        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }
}
