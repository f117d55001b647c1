use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Placeholder shown whenever a response carries no usable transcript.
pub const NO_TRANSCRIPT: &str = "No transcript available.";

/// The parts of a Transcribe output document that clients read.
///
/// Endpoints return the stored JSON verbatim; this type only describes the
/// fields callers rely on, every other field is passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TranscriptPayload {
    #[serde(rename = "jobName", default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TranscriptResults {
    #[serde(default)]
    pub transcripts: Vec<TranscriptText>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TranscriptText {
    #[serde(default)]
    pub transcript: Option<String>,
}

impl TranscriptPayload {
    /// First transcript alternative, if the service produced any text.
    pub fn primary_text(&self) -> Option<&str> {
        self.results
            .transcripts
            .first()
            .and_then(|t| t.transcript.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// `results.transcripts[0].transcript` of an untyped document.
pub fn primary_transcript(document: &Value) -> Option<&str> {
    document
        .pointer("/results/transcripts/0/transcript")
        .and_then(Value::as_str)
}
