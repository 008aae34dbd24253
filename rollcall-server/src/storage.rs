//! Upload file storage
//!
//! Saves uploaded photos under the configured upload directory with unique,
//! non-guessable names. Stored files are served read-only under `/uploads`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;

/// Allowed photo file extensions (lowercase)
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Validate the extension of an uploaded file name.
///
/// Returns the lowercase extension on success.
pub fn validate_extension(file_name: &str) -> Result<String, ApiError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ApiError::bad_request(
            "Invalid file type. Only JPG, JPEG, and PNG are allowed",
        ))
    }
}

/// Save an uploaded photo to disk with a unique filename.
///
/// The name is `YYYYMMDD_HHMMSS_<uuid8>.<ext>` so concurrent uploads never
/// collide and original client names never reach the filesystem.
pub async fn save_upload(
    data: &[u8],
    original_name: &str,
    upload_dir: &Path,
) -> Result<PathBuf, ApiError> {
    let ext = validate_extension(original_name)?;

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create upload directory: {}", e)))?;

    let unique = Uuid::new_v4().simple().to_string();
    let file_name = format!(
        "{}_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        &unique[..8],
        ext
    );
    let path = upload_dir.join(file_name);

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to save file: {}", e)))?;

    Ok(path)
}

/// Best-effort removal of a stored upload.
///
/// Used to clean up after a registration that failed part-way; a leftover
/// file is only disk noise, so failures are logged rather than surfaced.
pub async fn delete_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_extension() {
        assert_eq!(validate_extension("photo.jpg").unwrap(), "jpg");
        assert_eq!(validate_extension("photo.JPEG").unwrap(), "jpeg");
        assert_eq!(validate_extension("photo.PNG").unwrap(), "png");

        assert!(validate_extension("photo.gif").is_err());
        assert!(validate_extension("photo.txt").is_err());
        assert!(validate_extension("photo").is_err());
        assert!(validate_extension("").is_err());
    }

    #[tokio::test]
    async fn test_save_upload_writes_unique_file() {
        let dir = tempfile::tempdir().unwrap();

        let first = save_upload(b"one", "a.jpg", dir.path()).await.unwrap();
        let second = save_upload(b"two", "b.jpg", dir.path()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(tokio::fs::read(&first).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(&second).await.unwrap(), b"two");
        assert!(first.extension().is_some_and(|e| e == "jpg"));
    }

    #[tokio::test]
    async fn test_save_upload_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_upload(b"x", "payload.exe", dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_upload_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_upload(b"x", "a.png", dir.path()).await.unwrap();

        delete_upload(&path).await;
        assert!(!path.exists());

        // Second delete of a missing file is silent
        delete_upload(&path).await;
    }
}
