use crate::services::transcription::AwsTranscribeService;
use aws_config::SdkConfig;
use std::sync::Arc;
use tracing::info;

pub fn setup_transcriber(sdk_config: &SdkConfig) -> Arc<AwsTranscribeService> {
    info!(
        "🗣️  AWS Transcribe client (Region: {})",
        sdk_config
            .region()
            .map(|r| r.as_ref())
            .unwrap_or("unset")
    );

    Arc::new(AwsTranscribeService::new(aws_sdk_transcribe::Client::new(
        sdk_config,
    )))
}
