pub mod health;
pub mod transcribe;
pub mod transcripts;
pub mod widget;
