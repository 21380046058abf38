// collision-free destination names inside the media directory

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};

use crate::config::ConflictPolicy;

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("unable to create {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// longest single directory entry most filesystems accept
const MAX_NAME_BYTES: usize = 255;

/// `dir/stem(index).ext`, or `dir/stem(index)` when there is no extension.
/// only the final suffix counts as the extension: `a.tar.gz` -> `a.tar(0).gz`.
/// the stem is cut short when the result would not fit in one directory entry.
pub fn disambiguated_path(path: &Path, index: u64) -> PathBuf {
    let marker = format!("({index})");

    let mut file_name = path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    file_name.push(&marker);

    if let Some(extension) = path.extension() {
        file_name.push(".");
        file_name.push(extension);
    }

    if file_name.len() <= MAX_NAME_BYTES {
        return path.with_file_name(file_name);
    }

    let mut stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut extension = path
        .extension()
        .map(|extension| format!(".{}", extension.to_string_lossy()))
        .unwrap_or_default();

    // an extension that leaves no room for the marker stays part of the stem
    if marker.len() + extension.len() > MAX_NAME_BYTES {
        stem = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        extension.clear();
    }

    let mut keep = MAX_NAME_BYTES - marker.len() - extension.len();
    while !stem.is_char_boundary(keep.min(stem.len())) {
        keep -= 1;
    }
    stem.truncate(keep.min(stem.len()));

    path.with_file_name(format!("{stem}{marker}{extension}"))
}

/// first of `path`, `path(0)`, `path(1)`, ... that does not exist right now.
///
/// the answer can be stale by the time the caller acts on it; writers should
/// go through [`create_unique_file`] instead.
pub async fn resolve_available_path(path: &Path) -> io::Result<PathBuf> {
    if !fs::try_exists(path).await? {
        return Ok(path.to_path_buf());
    }

    let mut index = 0;
    loop {
        let candidate = disambiguated_path(path, index);
        if !fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        index += 1;
    }
}

/// exclusively create `path`, or the first free disambiguated variant of it.
///
/// existence check and creation are one `O_EXCL` open, so two writers can
/// never end up sharing a file.
pub async fn create_unique_file(
    path: &Path,
    policy: ConflictPolicy,
) -> Result<(PathBuf, File), CreateError> {
    let mut candidate = path.to_path_buf();
    let mut index = 0;

    loop {
        match create_new(&candidate).await {
            Ok(file) => return Ok((candidate, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => match policy {
                ConflictPolicy::RejectOnConflict => {
                    return Err(CreateError::AlreadyExists(candidate));
                }
                ConflictPolicy::RenameOnConflict => {
                    candidate = disambiguated_path(path, index);
                    index += 1;
                }
            },
            Err(source) => {
                return Err(CreateError::Io {
                    path: candidate,
                    source,
                });
            }
        }
    }
}

async fn create_new(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_disambiguated_names() {
        let dir = Path::new("/media");
        assert_eq!(
            disambiguated_path(&dir.join("a.txt"), 0),
            dir.join("a(0).txt")
        );
        assert_eq!(
            disambiguated_path(&dir.join("archive.tar.gz"), 3),
            dir.join("archive.tar(3).gz")
        );
        assert_eq!(
            disambiguated_path(&dir.join("readme"), 0),
            dir.join("readme(0)")
        );
        assert_eq!(
            disambiguated_path(&dir.join(".bashrc"), 1),
            dir.join(".bashrc(1)")
        );
    }

    #[test]
    fn test_disambiguated_names_fit_one_directory_entry() {
        let dir = Path::new("/media");
        let longest = format!("{}.txt", "a".repeat(251));

        let renamed = disambiguated_path(&dir.join(&longest), 0);
        let name = renamed.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), MAX_NAME_BYTES);
        assert_eq!(name, format!("{}(0).txt", "a".repeat(248)));

        let renamed = disambiguated_path(&dir.join(&longest), 12);
        let name = renamed.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, format!("{}(12).txt", "a".repeat(247)));

        // multi-byte characters are never split
        let wide = format!("{}.txt", "é".repeat(125));
        let renamed = disambiguated_path(&dir.join(&wide), 0);
        let name = renamed.file_name().unwrap().to_str().unwrap();
        assert!(name.len() <= MAX_NAME_BYTES);
        assert!(name.ends_with("(0).txt"));

        // an oversized extension is treated as part of the stem
        let long_extension = format!("a.{}", "x".repeat(253));
        let renamed = disambiguated_path(&dir.join(&long_extension), 0);
        let name = renamed.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), MAX_NAME_BYTES);
        assert!(name.ends_with("(0)"));
    }

    #[tokio::test]
    async fn test_create_unique_file_renames_longest_name() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let longest = dir.join(format!("{}.txt", "a".repeat(251)));
        std::fs::write(&longest, "original").unwrap();

        let (path, _file) = create_unique_file(&longest, ConflictPolicy::RenameOnConflict)
            .await
            .unwrap();
        assert_eq!(path, dir.join(format!("{}(0).txt", "a".repeat(248))));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_free_path_is_returned_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a.txt");

        assert_eq!(resolve_available_path(&target).await.unwrap(), target);
    }

    #[tokio::test]
    async fn test_first_unused_index_wins() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("a.txt"), "taken").unwrap();

        assert_eq!(
            resolve_available_path(&dir.join("a.txt")).await.unwrap(),
            dir.join("a(0).txt")
        );

        std::fs::write(dir.join("a(0).txt"), "taken").unwrap();
        std::fs::write(dir.join("a(1).txt"), "taken").unwrap();
        assert_eq!(
            resolve_available_path(&dir.join("a.txt")).await.unwrap(),
            dir.join("a(2).txt")
        );
    }

    #[tokio::test]
    async fn test_no_extension_has_no_trailing_dot() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("readme"), "taken").unwrap();

        let resolved = resolve_available_path(&dir.join("readme")).await.unwrap();
        assert_eq!(resolved, dir.join("readme(0)"));
        assert!(!resolved.to_string_lossy().ends_with('.'));
    }

    #[tokio::test]
    async fn test_create_unique_file_renames() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("a.txt"), "original").unwrap();

        let (path, _file) = create_unique_file(&dir.join("a.txt"), ConflictPolicy::RenameOnConflict)
            .await
            .unwrap();
        assert_eq!(path, dir.join("a(0).txt"));

        let (path, _file) = create_unique_file(&dir.join("a.txt"), ConflictPolicy::RenameOnConflict)
            .await
            .unwrap();
        assert_eq!(path, dir.join("a(1).txt"));
        assert_eq!(
            std::fs::read_to_string(dir.join("a.txt")).unwrap(),
            "original"
        );
    }

    #[tokio::test]
    async fn test_create_unique_file_rejects() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("a.txt"), "original").unwrap();

        let err = create_unique_file(&dir.join("a.txt"), ConflictPolicy::RejectOnConflict)
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::AlreadyExists(path) if path == dir.join("a.txt")));
        assert!(!dir.join("a(0).txt").exists());
    }

    #[tokio::test]
    async fn test_create_unique_file_surfaces_io_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing").join("a.txt");

        let err = create_unique_file(&missing, ConflictPolicy::RenameOnConflict)
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::Io { .. }));
    }
}
