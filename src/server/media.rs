// media directory preparation

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::info;

#[derive(Debug, Error)]
pub enum MediaDirError {
    #[error("media dir path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("unable to create media dir {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to inspect media dir {}: {source}", .path.display())]
    Inspect {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// make sure uploads have somewhere to land: create the directory when it
/// is missing, refuse a path that names something other than a directory
pub async fn prepare_media_dir(media_dir: &Path) -> Result<(), MediaDirError> {
    match fs::metadata(media_dir).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(MediaDirError::NotADirectory(media_dir.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(media_dir)
                .await
                .map_err(|source| MediaDirError::Create {
                    path: media_dir.to_path_buf(),
                    source,
                })?;
            info!(media_dir = %media_dir.display(), "created media dir");
            Ok(())
        }
        Err(source) => Err(MediaDirError::Inspect {
            path: media_dir.to_path_buf(),
            source,
        }),
    }
}
