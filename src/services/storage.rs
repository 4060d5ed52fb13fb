use crate::api::error::AppError;
use crate::utils::validation::{file_extension, verify_image_upload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

/// How many leading bytes are buffered for magic-byte sniffing
const SNIFF_LEN: usize = 8192;

/// Category-scoped destination for uploaded media. Each category maps to
/// its own subdirectory under the upload root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Images,
    Videos,
    Sketches,
}

impl MediaCategory {
    pub fn dir(&self) -> &'static str {
        match self {
            MediaCategory::Images => "images",
            MediaCategory::Videos => "videos",
            MediaCategory::Sketches => "sketches",
        }
    }

    /// Images and sketches must carry image magic bytes; videos pass
    /// through unsniffed.
    pub fn is_image(&self) -> bool {
        !matches!(self, MediaCategory::Videos)
    }
}

pub struct StoredFile {
    /// Public path the record stores, e.g. "/uploads/sketches/<uuid>.png"
    pub public_path: String,
    /// Generated on-disk filename
    pub stored_name: String,
    pub size: u64,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams an upload to category-scoped storage under a
    /// collision-resistant generated name and returns its public path.
    /// A failed store leaves file state unknown; callers must not
    /// reference the path on error.
    async fn store<'a>(
        &self,
        category: MediaCategory,
        original_name: &str,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile, AppError>;

    /// Removes a previously stored file by its public path. Not called
    /// from any request path (records keep their files on hard delete);
    /// exposed for operational cleanup.
    async fn delete(&self, public_path: &str) -> Result<(), AppError>;
}

pub struct LocalStorageService {
    base_dir: PathBuf,
}

impl LocalStorageService {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn generate_name(original_name: &str) -> String {
        match file_extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn store<'a>(
        &self,
        category: MediaCategory,
        original_name: &str,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile, AppError> {
        // Buffer the head of the stream for sniffing before anything
        // touches the disk.
        let mut header = vec![0u8; SNIFF_LEN];
        let mut filled = 0;
        while filled < SNIFF_LEN {
            let read = reader.read(&mut header[filled..]).await?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        header.truncate(filled);

        if category.is_image() {
            verify_image_upload(&header).map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let dir = self.base_dir.join(category.dir());
        fs::create_dir_all(&dir).await?;

        let stored_name = Self::generate_name(original_name);
        let dest = dir.join(&stored_name);

        let mut file = fs::File::create(&dest).await?;
        file.write_all(&header).await?;
        let streamed = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;

        let size = header.len() as u64 + streamed;
        tracing::debug!(
            "Stored {} byte upload '{}' as {}/{}",
            size,
            original_name,
            category.dir(),
            stored_name
        );

        Ok(StoredFile {
            public_path: format!("/uploads/{}/{}", category.dir(), stored_name),
            stored_name,
            size,
        })
    }

    async fn delete(&self, public_path: &str) -> Result<(), AppError> {
        let relative = public_path
            .strip_prefix("/uploads/")
            .ok_or_else(|| AppError::Validation("Not an upload path".to_string()))?;

        if relative.split('/').any(|seg| seg == ".." || seg.is_empty()) {
            return Err(AppError::Validation("Not an upload path".to_string()));
        }

        let target = self.base_dir.join(relative);
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_store_generates_unique_names() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(tmp.path());

        let a = storage
            .store(
                MediaCategory::Sketches,
                "moon.png",
                Box::new(Cursor::new(PNG_HEADER.to_vec())),
            )
            .await
            .unwrap();
        let b = storage
            .store(
                MediaCategory::Sketches,
                "moon.png",
                Box::new(Cursor::new(PNG_HEADER.to_vec())),
            )
            .await
            .unwrap();

        assert_ne!(a.stored_name, b.stored_name);
        assert!(a.public_path.starts_with("/uploads/sketches/"));
        assert!(a.stored_name.ends_with(".png"));
        assert!(tmp.path().join("sketches").join(&a.stored_name).exists());
    }

    #[tokio::test]
    async fn test_store_rejects_non_image_in_image_category() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(tmp.path());

        let result = storage
            .store(
                MediaCategory::Images,
                "fake.png",
                Box::new(Cursor::new(b"just some text".to_vec())),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        // Nothing may land on disk for a rejected upload
        assert!(!tmp.path().join("images").exists());
    }

    #[tokio::test]
    async fn test_store_allows_unsniffed_video() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(tmp.path());

        let stored = storage
            .store(
                MediaCategory::Videos,
                "clip.mp4",
                Box::new(Cursor::new(b"opaque video payload".to_vec())),
            )
            .await
            .unwrap();

        assert!(stored.public_path.starts_with("/uploads/videos/"));
        assert_eq!(stored.size, b"opaque video payload".len() as u64);
    }

    #[tokio::test]
    async fn test_delete_by_public_path() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(tmp.path());

        let stored = storage
            .store(
                MediaCategory::Images,
                "pic.png",
                Box::new(Cursor::new(PNG_HEADER.to_vec())),
            )
            .await
            .unwrap();

        storage.delete(&stored.public_path).await.unwrap();
        assert!(matches!(
            storage.delete(&stored.public_path).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorageService::new(tmp.path());

        assert!(matches!(
            storage.delete("/uploads/../secrets.txt").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            storage.delete("/etc/passwd").await,
            Err(AppError::Validation(_))
        ));
    }
}
