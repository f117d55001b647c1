use crate::config::AppConfig;
use crate::services::storage::S3StorageService;
use aws_config::SdkConfig;
use std::sync::Arc;
use tracing::{info, warn};

fn s3_client(sdk_config: &SdkConfig, config: &AppConfig) -> aws_sdk_s3::Client {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);

    if let Some(endpoint) = &config.s3_endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    aws_sdk_s3::Client::from_conf(builder.build())
}

/// Storage for uploads and transcription output.
pub fn setup_storage(sdk_config: &SdkConfig, config: &AppConfig) -> Arc<S3StorageService> {
    if config.bucket.is_empty() {
        warn!("⚠️  S3_BUCKET_NAME is not set, uploads will fail");
    }

    info!(
        "☁️  S3 Storage: {} (Bucket: {})",
        config.s3_endpoint.as_deref().unwrap_or("aws"),
        config.bucket
    );

    Arc::new(S3StorageService::new(
        s3_client(sdk_config, config),
        config.bucket.clone(),
    ))
}

/// Storage read by the fixed-key retrieval endpoint.
pub fn setup_result_storage(sdk_config: &SdkConfig, config: &AppConfig) -> Arc<S3StorageService> {
    info!("📄 Result bucket: {}", config.result_bucket);

    Arc::new(S3StorageService::new(
        s3_client(sdk_config, config),
        config.result_bucket.clone(),
    ))
}
