use axum::extract::multipart::Field;
use futures::TryStreamExt;
use std::io;
use std::path::Path;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use crate::utils::validation::{FALLBACK_FILENAME, sanitize_filename};

/// A media file received from a client, buffered on local disk.
///
/// The buffer lives in the upload directory and is removed when the value is
/// discarded or dropped, whichever comes first.
pub struct UploadedFile {
    original_name: String,
    content_type: Option<String>,
    size: u64,
    path: TempPath,
}

impl UploadedFile {
    /// Streams a multipart field to a fresh file under `upload_dir`.
    pub async fn receive(upload_dir: &Path, field: Field<'_>) -> io::Result<Self> {
        let original_name = sanitize_filename(field.file_name().unwrap_or(FALLBACK_FILENAME));
        let content_type = field.content_type().map(str::to_string);

        let (file, path) = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(upload_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let body = field.map_err(io::Error::other);
        let mut reader = StreamReader::new(body);
        let size = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;

        Ok(Self {
            original_name,
            content_type,
            size,
            path,
        })
    }

    /// Buffers an in-memory payload the same way `receive` does.
    pub async fn from_bytes(upload_dir: &Path, file_name: &str, data: &[u8]) -> io::Result<Self> {
        let (file, path) = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(upload_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);
        file.write_all(data).await?;
        file.flush().await?;

        Ok(Self {
            original_name: sanitize_filename(file_name),
            content_type: None,
            size: data.len() as u64,
            path,
        })
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the local buffer now and reports whether that worked.
    pub fn discard(self) -> io::Result<()> {
        self.path.close()
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("original_name", &self.original_name)
            .field("size", &self.size)
            .field("path", &self.path.to_path_buf())
            .finish()
    }
}
