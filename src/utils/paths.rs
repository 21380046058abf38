// filename checks for client-supplied upload names

use thiserror::Error;

const MAX_FILENAME_BYTES: usize = 255;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidFilename {
    #[error("filename is empty")]
    Empty,

    #[error("filename exceeds 255 bytes")]
    TooLong,

    #[error("filename contains a path separator or nul byte")]
    Separator,

    #[error("filename refers to a directory")]
    DotName,
}

/// validate an uploaded filename so that it can only ever name a single
/// entry directly inside the media directory
pub fn sanitize_filename(filename: &str) -> Result<&str, InvalidFilename> {
    if filename.is_empty() {
        return Err(InvalidFilename::Empty);
    }

    if filename.len() > MAX_FILENAME_BYTES {
        return Err(InvalidFilename::TooLong);
    }

    if filename.contains(['/', '\\', '\0']) {
        return Err(InvalidFilename::Separator);
    }

    if filename == "." || filename == ".." {
        return Err(InvalidFilename::DotName);
    }

    Ok(filename)
}
