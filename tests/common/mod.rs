#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::Path as FsPath;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use transcribe_backend::config::AppConfig;
use transcribe_backend::services::ingestion::{IngestionSettings, IngestionWorkflow};
use transcribe_backend::services::storage::{StorageError, StorageResult, StorageService};
use transcribe_backend::services::transcription::{
    JobRequest, JobSnapshot, JobStatus, TranscriptionError, TranscriptionService,
};
use transcribe_backend::{AppState, create_app};

pub const BUCKET: &str = "test-bucket";
pub const FIXED_RESULT_KEY: &str = "1725169635065-IS_Intro.mp4.json";

/// In-memory bucket. Presigned URLs point at a loopback HTTP server that
/// serves the same map.
pub struct MockStorageService {
    files: Mutex<HashMap<String, Vec<u8>>>,
    base_url: String,
    pub fail_uploads: bool,
    pub presigned: Mutex<Vec<String>>,
}

impl MockStorageService {
    pub fn new(base_url: String) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            base_url,
            fail_uploads: false,
            presigned: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, key: &str, data: impl Into<Vec<u8>>) {
        self.files
            .lock()
            .unwrap()
            .insert(key.to_string(), data.into());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    fn bucket(&self) -> &str {
        BUCKET
    }

    async fn upload_path(&self, key: &str, path: &FsPath) -> StorageResult<()> {
        if self.fail_uploads {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        let data = tokio::fs::read(path).await?;
        self.insert(key, data);
        Ok(())
    }

    async fn get_file(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn file_exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(key))
    }

    async fn presigned_get_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        self.presigned.lock().unwrap().push(key.to_string());
        Ok(format!("{}/objects/{}", self.base_url, key))
    }
}

/// Replays a scripted sequence of job states; the last one repeats forever.
/// On `COMPLETED` it deposits `output` at `<job_name>.json`, like the real service.
pub struct MockTranscriber {
    storage: Arc<MockStorageService>,
    statuses: Mutex<VecDeque<JobStatus>>,
    last: Mutex<JobStatus>,
    output: Option<Vec<u8>>,
    pub fail_start: bool,
    pub started: Mutex<Vec<JobRequest>>,
    pub polls: Mutex<u32>,
}

impl MockTranscriber {
    pub fn new(
        storage: Arc<MockStorageService>,
        statuses: Vec<JobStatus>,
        output: Option<Vec<u8>>,
    ) -> Self {
        Self {
            storage,
            statuses: Mutex::new(statuses.into()),
            last: Mutex::new(JobStatus::InProgress),
            output,
            fail_start: false,
            started: Mutex::new(Vec::new()),
            polls: Mutex::new(0),
        }
    }

    pub fn poll_count(&self) -> u32 {
        *self.polls.lock().unwrap()
    }

    pub fn started_jobs(&self) -> Vec<JobRequest> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionService for MockTranscriber {
    async fn start_job(&self, request: &JobRequest) -> Result<(), TranscriptionError> {
        if self.fail_start {
            return Err(TranscriptionError::Start {
                job_name: request.job_name.clone(),
                message: "LimitExceededException".to_string(),
            });
        }
        self.started.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> Result<JobSnapshot, TranscriptionError> {
        *self.polls.lock().unwrap() += 1;

        let status = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.statuses.lock().unwrap().pop_front() {
                *last = next;
            }
            last.clone()
        };

        let mut snapshot = JobSnapshot::new(status.clone());
        match status {
            JobStatus::Completed => {
                if let Some(output) = &self.output {
                    self.storage
                        .insert(&format!("{}.json", job_name), output.clone());
                }
            }
            JobStatus::Failed => {
                snapshot.failure_reason = Some("The media format could not be determined".to_string());
            }
            _ => {}
        }
        Ok(snapshot)
    }
}

async fn serve_object(
    State(storage): State<Arc<MockStorageService>>,
    Path(key): Path<String>,
) -> Response {
    match storage.get(&key) {
        Some(data) => (StatusCode::OK, data).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Binds a loopback listener and returns a storage whose presigned URLs are
/// served from it.
pub async fn spawn_storage() -> Arc<MockStorageService> {
    spawn_storage_with(|_| {}).await
}

pub async fn spawn_storage_with<F>(configure: F) -> Arc<MockStorageService>
where
    F: FnOnce(&mut MockStorageService),
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut storage = MockStorageService::new(format!("http://{}", addr));
    configure(&mut storage);
    let storage = Arc::new(storage);

    let router = Router::new()
        .route("/objects/:key", get(serve_object))
        .with_state(storage.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    storage
}

pub fn test_config(upload_dir: &FsPath) -> AppConfig {
    AppConfig {
        bucket: BUCKET.to_string(),
        result_bucket: BUCKET.to_string(),
        result_object_key: Some(FIXED_RESULT_KEY.to_string()),
        poll_interval: Duration::from_millis(10),
        max_wait: Some(Duration::from_secs(5)),
        upload_dir: upload_dir.to_path_buf(),
        ..AppConfig::default()
    }
}

pub fn workflow(
    storage: Arc<MockStorageService>,
    transcriber: Arc<MockTranscriber>,
    config: &AppConfig,
) -> IngestionWorkflow {
    IngestionWorkflow::new(
        storage,
        transcriber,
        reqwest::Client::new(),
        IngestionSettings::from(config),
    )
}

pub struct TestApp {
    pub app: Router,
    pub storage: Arc<MockStorageService>,
    pub transcriber: Arc<MockTranscriber>,
    pub upload_dir: TempDir,
    pub shutdown: CancellationToken,
}

impl TestApp {
    pub fn upload_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count() == 0
    }
}

pub fn build_app(storage: Arc<MockStorageService>, transcriber: Arc<MockTranscriber>) -> TestApp {
    build_app_with(storage, transcriber, |_| {})
}

pub fn build_app_with<F>(
    storage: Arc<MockStorageService>,
    transcriber: Arc<MockTranscriber>,
    configure: F,
) -> TestApp
where
    F: FnOnce(&mut AppConfig),
{
    let upload_dir = tempfile::tempdir().unwrap();
    let mut config = test_config(upload_dir.path());
    configure(&mut config);
    let shutdown = CancellationToken::new();

    let state = AppState {
        storage: storage.clone(),
        results: storage.clone(),
        ingestion: Arc::new(workflow(storage.clone(), transcriber.clone(), &config)),
        config,
        shutdown: shutdown.clone(),
    };

    TestApp {
        app: create_app(state),
        storage,
        transcriber,
        upload_dir,
        shutdown,
    }
}

pub fn transcript_document(text: &str) -> Value {
    serde_json::json!({
        "jobName": "1700000000000-clip.mp4",
        "accountId": "123456789012",
        "status": "COMPLETED",
        "results": {
            "transcripts": [ { "transcript": text } ],
            "items": [
                {
                    "start_time": "0.0",
                    "end_time": "0.4",
                    "alternatives": [ { "confidence": "0.99", "content": "hello" } ],
                    "type": "pronunciation"
                }
            ]
        }
    })
}

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{boundary}\r\n\
        Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
        Content-Type: video/mp4\r\n\r\n",
        boundary = BOUNDARY,
        field = field,
        filename = filename,
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
