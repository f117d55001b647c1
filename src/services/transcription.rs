//! Managed speech-to-text jobs (AWS Transcribe).

use async_trait::async_trait;
use aws_sdk_transcribe::Client;
use aws_sdk_transcribe::types::{LanguageCode, Media, TranscriptionJobStatus};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Failed to start transcription job {job_name}: {message}")]
    Start { job_name: String, message: String },

    #[error("Failed to get status of transcription job {job_name}: {message}")]
    Status { job_name: String, message: String },
}

/// Everything needed to start one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub job_name: String,
    /// `s3://bucket/key` of the media to transcribe
    pub media_uri: String,
    pub language_code: String,
    /// Bucket where the service writes `<job_name>.json`
    pub output_bucket: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Unknown(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "QUEUED" => JobStatus::Queued,
            "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    /// `COMPLETED` and `FAILED` never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("QUEUED"),
            JobStatus::InProgress => f.write_str("IN_PROGRESS"),
            JobStatus::Completed => f.write_str("COMPLETED"),
            JobStatus::Failed => f.write_str("FAILED"),
            JobStatus::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// One observation of a job's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub failure_reason: Option<String>,
}

impl JobSnapshot {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            failure_reason: None,
        }
    }
}

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn start_job(&self, request: &JobRequest) -> Result<(), TranscriptionError>;

    async fn job_status(&self, job_name: &str) -> Result<JobSnapshot, TranscriptionError>;
}

pub struct AwsTranscribeService {
    client: Client,
}

impl AwsTranscribeService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranscriptionService for AwsTranscribeService {
    async fn start_job(&self, request: &JobRequest) -> Result<(), TranscriptionError> {
        let media = Media::builder().media_file_uri(&request.media_uri).build();

        self.client
            .start_transcription_job()
            .transcription_job_name(&request.job_name)
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .media(media)
            .output_bucket_name(&request.output_bucket)
            .send()
            .await
            .map_err(|e| TranscriptionError::Start {
                job_name: request.job_name.clone(),
                message: format!("{:?}", e.into_service_error()),
            })?;

        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> Result<JobSnapshot, TranscriptionError> {
        let status_error = |message: String| TranscriptionError::Status {
            job_name: job_name.to_string(),
            message,
        };

        let response = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| status_error(format!("{:?}", e.into_service_error())))?;

        let job = response
            .transcription_job()
            .ok_or_else(|| status_error("transcription job missing from response".to_string()))?;

        let status = match job.transcription_job_status() {
            Some(TranscriptionJobStatus::Queued) => JobStatus::Queued,
            Some(TranscriptionJobStatus::InProgress) => JobStatus::InProgress,
            Some(TranscriptionJobStatus::Completed) => JobStatus::Completed,
            Some(TranscriptionJobStatus::Failed) => JobStatus::Failed,
            Some(other) => JobStatus::parse(other.as_str()),
            None => JobStatus::Unknown("UNKNOWN".to_string()),
        };

        Ok(JobSnapshot {
            status,
            failure_reason: job.failure_reason().map(str::to_string),
        })
    }
}
