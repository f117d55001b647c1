use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the transcription backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// AWS region for S3 and Transcribe (default: provider chain / "us-east-1")
    pub region: Option<String>,

    /// Bucket receiving uploads and transcription output
    pub bucket: String,

    /// Custom S3 endpoint (MinIO, LocalStack). Forces path-style addressing.
    pub s3_endpoint: Option<String>,

    /// Bucket read by `GET /get-file` (default: same as `bucket`)
    pub result_bucket: String,

    /// Object key read by `GET /get-file`
    pub result_object_key: Option<String>,

    /// Language code passed to every transcription job (default: "en-US")
    pub language_code: String,

    /// Delay between two job status polls (default: 5 s)
    pub poll_interval: Duration,

    /// Give up waiting on a job after this long (default: `None`, poll until terminal)
    pub max_wait: Option<Duration>,

    /// Lifetime of the presigned URL used to download a finished transcript (default: 1 h)
    pub result_url_ttl: Duration,

    /// Directory holding uploads while they are being processed (default: "uploads")
    pub upload_dir: PathBuf,

    /// Maximum accepted upload size in bytes (default: 512 MB)
    pub max_file_size: usize,

    /// Listening port (default: 3000)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: None,
            bucket: String::new(),
            s3_endpoint: None,
            result_bucket: String::new(),
            result_object_key: None,
            language_code: "en-US".to_string(),
            poll_interval: Duration::from_secs(5),
            max_wait: None,
            result_url_ttl: Duration::from_secs(3600),
            upload_dir: PathBuf::from("uploads"),
            max_file_size: 512 * 1024 * 1024, // 512 MB
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numbers fall back to their defaults; nothing here fails, a
    /// missing bucket or region only surfaces once the first AWS call is made.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str| non_empty(key).and_then(|v| v.trim().parse::<u64>().ok());

        let bucket = non_empty("S3_BUCKET_NAME").unwrap_or(default.bucket);
        let result_bucket = non_empty("RESULT_BUCKET_NAME").unwrap_or_else(|| bucket.clone());

        Self {
            region: non_empty("AWS_REGION"),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            result_object_key: non_empty("RESULT_OBJECT_KEY"),

            language_code: non_empty("TRANSCRIBE_LANGUAGE_CODE").unwrap_or(default.language_code),

            poll_interval: secs("TRANSCRIBE_POLL_INTERVAL_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(default.poll_interval),

            max_wait: secs("TRANSCRIBE_MAX_WAIT_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .or(default.max_wait),

            result_url_ttl: secs("RESULT_URL_TTL_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(default.result_url_ttl),

            upload_dir: non_empty("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_file_size: non_empty("MAX_FILE_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.max_file_size),

            port: non_empty("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.port),

            bucket,
            result_bucket,
        }
    }
}
