//! What the upload widget shows.
//!
//! The browser page (`assets/index.html`) and `transcribe-cli` both follow
//! this state model: exactly one of loading, error, transcript or placeholder
//! is displayed, chosen by the outcome of the latest request.

pub mod client;

use axum::http::StatusCode;
use std::fmt;

use crate::models::{NO_TRANSCRIPT, TranscriptPayload};

/// Shown while a request is in flight.
pub const LOADING_TEXT: &str = "Transcribing...";

/// MIME families the file picker offers.
pub const ACCEPTED_MEDIA: &[&str] = &["audio/", "video/"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Loading,
    Failed(String),
    Transcript(String),
    NoTranscript,
}

impl WidgetState {
    /// Outcome of a finished `/transcribe` request.
    ///
    /// Non-success statuses become `Failed` with the status reason. Bodies
    /// that are not a transcript document, or carry no text, become
    /// `NoTranscript`.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Request failed");
            return WidgetState::Failed(format!("Error: {}", reason));
        }

        match serde_json::from_slice::<TranscriptPayload>(body) {
            Ok(payload) => match payload.primary_text() {
                Some(text) => WidgetState::Transcript(text.to_string()),
                None => WidgetState::NoTranscript,
            },
            Err(_) => WidgetState::NoTranscript,
        }
    }

    /// The request never produced a response.
    pub fn network_error(message: impl fmt::Display) -> Self {
        WidgetState::Failed(message.to_string())
    }

    pub fn render(&self) -> String {
        match self {
            WidgetState::Loading => LOADING_TEXT.to_string(),
            WidgetState::Failed(message) => format!("Error: {}", message),
            WidgetState::Transcript(text) => format!("Transcript:\n{}", text),
            WidgetState::Idle | WidgetState::NoTranscript => NO_TRANSCRIPT.to_string(),
        }
    }
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// True for MIME types the widget lets users pick.
pub fn is_accepted_media(mime: &str) -> bool {
    ACCEPTED_MEDIA.iter().any(|prefix| mime.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_is_extracted() {
        let body = br#"{"results":{"transcripts":[{"transcript":"hello there"}]}}"#;
        let state = WidgetState::from_response(StatusCode::OK, body);
        assert_eq!(state, WidgetState::Transcript("hello there".to_string()));
        assert_eq!(state.render(), "Transcript:\nhello there");
    }

    #[test]
    fn test_missing_transcript_renders_placeholder() {
        let bodies: [&[u8]; 7] = [
            b"{}",
            br#"{"results":{}}"#,
            br#"{"results":{"transcripts":[]}}"#,
            br#"{"results":{"transcripts":[{}]}}"#,
            br#"{"results":{"transcripts":[{"transcript":""}]}}"#,
            b"not json at all",
            b"",
        ];
        for body in bodies {
            let state = WidgetState::from_response(StatusCode::OK, body);
            assert_eq!(state, WidgetState::NoTranscript);
            assert_eq!(state.render(), NO_TRANSCRIPT);
        }
    }

    #[test]
    fn test_error_status_renders_error() {
        let state =
            WidgetState::from_response(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message":"x"}"#);
        assert_eq!(state.render(), "Error: Error: Internal Server Error");
    }

    #[test]
    fn test_idle_and_loading() {
        assert_eq!(WidgetState::Idle.render(), NO_TRANSCRIPT);
        assert_eq!(WidgetState::Loading.render(), LOADING_TEXT);
    }

    #[test]
    fn test_accepted_media() {
        assert!(is_accepted_media("audio/mpeg"));
        assert!(is_accepted_media("video/mp4"));
        assert!(!is_accepted_media("image/png"));
        assert!(!is_accepted_media("application/pdf"));
    }
}
