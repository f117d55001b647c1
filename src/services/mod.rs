pub mod ingestion;
pub mod retrieval;
pub mod storage;
pub mod transcription;
