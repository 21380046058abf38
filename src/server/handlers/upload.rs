// file upload handler

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, error, info, instrument, warn};

use crate::server::app::AppState;
use crate::server::uploads::{self, StoredUpload, UploadError};

/// multipart field the file part is expected under
pub const UPLOAD_FIELD: &str = "file";

/// handle `POST /upload`: store the `file` part and report the outcome as a json string
#[instrument(skip(state, headers, multipart))]
pub async fn handle_upload_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<&'static str>), UploadError> {
    debug!("upload endpoint hit");

    // informational only, never checked against what actually arrives
    let declared_size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    match receive_upload(&state, declared_size, &mut multipart).await {
        Ok(stored) => {
            info!(
                path = %stored.path.display(),
                bytes = stored.bytes,
                "file successfully uploaded"
            );
            Ok((StatusCode::CREATED, Json("file upload successful")))
        }
        Err(err) => {
            if err.status_code().is_server_error() {
                error!(error = %err, "upload failed");
            } else {
                warn!(error = %err, "upload rejected");
            }
            Err(err)
        }
    }
}

async fn receive_upload(
    state: &AppState,
    declared_size: Option<u64>,
    multipart: &mut Multipart,
) -> Result<StoredUpload, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "skipping multipart field");
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_owned) else {
            debug!("skipping `file` field without a filename");
            continue;
        };

        info!(
            file_name = %filename,
            declared_size = ?declared_size,
            "file is about to be uploaded"
        );

        return uploads::process_upload(&state.config.upload, &filename, field).await;
    }

    Err(UploadError::MissingFile)
}
