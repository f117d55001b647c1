use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::utils::validation::sanitize_job_component;

/// AWS Transcribe rejects job names longer than this.
pub const MAX_KEY_LEN: usize = 200;

const RESULT_SUFFIX: &str = ".json";

/// Storage key of an uploaded media file.
///
/// Doubles as the transcription job name, and the service writes the job's
/// output to `<key>.json`. Format: `<millis>-<token>-<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn generate(original_name: &str) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self::from_parts(Utc::now(), &token[..8], original_name)
    }

    pub fn from_parts(uploaded_at: DateTime<Utc>, token: &str, original_name: &str) -> Self {
        let prefix = format!("{}-{}-", uploaded_at.timestamp_millis(), token);
        // Leave room for the result suffix so `<key>.json` is still a valid job output name
        let budget = MAX_KEY_LEN.saturating_sub(prefix.len() + RESULT_SUFFIX.len());

        let mut name = sanitize_job_component(original_name);
        if name.len() > budget {
            // sanitized names are ASCII, any byte index is a char boundary
            let cut = name.len() - budget;
            name.drain(..cut);
        }

        Self(format!("{}{}", prefix, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the transcript the job deposits next to the media.
    pub fn result_key(&self) -> String {
        format!("{}{}", self.0, RESULT_SUFFIX)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
