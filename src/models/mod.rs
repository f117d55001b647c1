pub mod object_key;
pub mod transcript;
pub mod upload;

pub use object_key::ObjectKey;
pub use transcript::{NO_TRANSCRIPT, TranscriptPayload};
pub use upload::UploadedFile;
