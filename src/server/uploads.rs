// upload processing and streaming helpers

use std::io;
use std::path::{Path, PathBuf};

use axum::{
    extract::multipart::{Field, MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::UploadConfig;
use crate::server::naming::{create_unique_file, CreateError};
use crate::utils::paths::{sanitize_filename, InvalidFilename};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("malformed multipart request: {0}")]
    Multipart(#[from] MultipartError),
    #[error("request carries no `file` field with a filename")]
    MissingFile,
    #[error("invalid filename {name:?}: {reason}")]
    InvalidFilename {
        name: String,
        reason: InvalidFilename,
    },
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("unable to create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("unable to read upload body for {}: {source}", .path.display())]
    Body {
        path: PathBuf,
        source: MultipartError,
    },
    #[error("unable to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Multipart(err) => err.status(),
            UploadError::MissingFile => StatusCode::BAD_REQUEST,
            UploadError::InvalidFilename { .. } => StatusCode::BAD_REQUEST,
            UploadError::AlreadyExists(_) => StatusCode::SEE_OTHER,
            UploadError::Create { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            UploadError::Body { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            UploadError::Write { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            UploadError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// message sent to the client; the detailed cause only goes to the log
    pub fn public_message(&self) -> &'static str {
        match self {
            UploadError::Multipart(_) => "malformed multipart request",
            UploadError::MissingFile => "no file provided",
            UploadError::InvalidFilename { .. } => "invalid filename",
            UploadError::AlreadyExists(_) => "file already exists",
            UploadError::Create { .. } => "unable to create file on filesystem",
            UploadError::Body { .. } | UploadError::Write { .. } => "unable to upload file",
            UploadError::PayloadTooLarge { .. } => "file too large",
        }
    }
}

impl From<CreateError> for UploadError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::AlreadyExists(path) => UploadError::AlreadyExists(path),
            CreateError::Io { path, source } => UploadError::Create { path, source },
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.public_message())).into_response()
    }
}

/// where an upload ended up and how much of it was written
#[derive(Debug)]
pub struct StoredUpload {
    pub path: PathBuf,
    pub bytes: u64,
}

/// store one multipart file part in the media directory
pub async fn process_upload(
    config: &UploadConfig,
    original_filename: &str,
    mut field: Field<'_>,
) -> Result<StoredUpload, UploadError> {
    let filename =
        sanitize_filename(original_filename).map_err(|reason| UploadError::InvalidFilename {
            name: original_filename.to_string(),
            reason,
        })?;

    let requested_path = config.media_dir.join(filename);
    let (path, mut file) = create_unique_file(&requested_path, config.conflict_policy).await?;
    debug!(path = %path.display(), "created destination file");

    match write_field_to_file(&mut field, &mut file, &path, config.max_file_size).await {
        Ok(bytes) => Ok(StoredUpload { path, bytes }),
        Err(err) => {
            drop(file);
            if let Err(remove_err) = fs::remove_file(&path).await {
                warn!(
                    path = %path.display(),
                    error = %remove_err,
                    "unable to remove partial upload"
                );
            }
            Err(err)
        }
    }
}

async fn write_field_to_file<W>(
    field: &mut Field<'_>,
    file: &mut W,
    path: &Path,
    max_bytes: u64,
) -> Result<u64, UploadError>
where
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(|source| UploadError::Body {
        path: path.to_path_buf(),
        source,
    })? {
        written += chunk.len() as u64;
        if written > max_bytes {
            return Err(UploadError::PayloadTooLarge { limit: max_bytes });
        }

        file.write_all(&chunk)
            .await
            .map_err(|source| UploadError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }

    file.flush().await.map_err(|source| UploadError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(written)
}
