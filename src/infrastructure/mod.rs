pub mod storage;
pub mod transcribe;

use crate::config::AppConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Shared AWS configuration: region from config when given, everything else
/// (credentials included) from the default provider chain.
pub async fn load_aws_config(config: &AppConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    loader.load().await
}
