//! # Gallery / Asset Gateway
//!
//! Backs the image and background pickers: list, upload, rename, delete.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub size: u64,
    pub content_type: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFile {
    pub name: String,
    pub url: String,
    pub metadata: AssetMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub path: String,
    pub public_url: String,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn list_files(&self) -> StoreResult<Vec<AssetFile>>;

    /// Store `bytes` under `name`, suffixing `-1`, `-2`, ... on collision
    async fn upload_file(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<UploadedAsset>;

    async fn rename_file(&self, old_path: &str, new_path: &str) -> StoreResult<()>;

    /// Returns how many of `paths` existed and were removed
    async fn delete_files(&self, paths: &[String]) -> StoreResult<usize>;
}

/// Flat file names only: no separators, no leading dot
pub fn sanitize_name(name: &str) -> StoreResult<String> {
    let name = name.trim();
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name.len() <= 128
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(name.to_string())
    } else {
        Err(StoreError::Validation(format!("invalid file name {:?}", name)))
    }
}

/// `name`, then `stem-1.ext`, `stem-2.ext`, ... up to a fixed bound
pub fn candidate_names(name: &str) -> StoreResult<impl Iterator<Item = String>> {
    let name = sanitize_name(name)?;
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
        _ => (name.clone(), String::new()),
    };
    let suffixed = (1..10_000).map(move |n| format!("{}-{}{}", stem, n, ext));
    Ok(std::iter::once(name).chain(suffixed))
}

/// First candidate of [`candidate_names`] for which `taken` is false
pub fn unique_path(name: &str, taken: impl Fn(&str) -> bool) -> StoreResult<String> {
    candidate_names(name)?
        .find(|candidate| !taken(candidate))
        .ok_or_else(|| StoreError::Conflict(name.trim().to_string()))
}

/// Content type from the file extension
pub fn guess_content_type(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Asset gallery stored as files in one directory
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
    base_url: String,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn ensure_root(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }
}

#[async_trait]
impl AssetStore for DirAssetStore {
    async fn list_files(&self) -> StoreResult<Vec<AssetFile>> {
        self.ensure_root().await?;

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                warn!(path = ?entry.path(), "Skipping asset with non UTF-8 name");
                continue;
            };
            let updated_at = metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
            files.push(AssetFile {
                url: self.public_url(&name),
                metadata: AssetMetadata {
                    size: metadata.len(),
                    content_type: guess_content_type(&name).to_string(),
                    updated_at,
                },
                name,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn upload_file(&self, name: &str, bytes: Vec<u8>, _content_type: &str) -> StoreResult<UploadedAsset> {
        self.ensure_root().await?;

        // create_new claims the name atomically; a concurrent upload of the
        // same name moves on to the next suffix
        for path in candidate_names(name)? {
            let open = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.root.join(&path))
                .await;
            let mut file = match open {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(&bytes).await?;
            file.flush().await?;
            debug!(path = %path, size = bytes.len(), "Asset uploaded");

            return Ok(UploadedAsset {
                public_url: self.public_url(&path),
                path,
            });
        }
        Err(StoreError::Conflict(name.trim().to_string()))
    }

    async fn rename_file(&self, old_path: &str, new_path: &str) -> StoreResult<()> {
        let old_path = sanitize_name(old_path)?;
        let new_path = sanitize_name(new_path)?;

        let from = self.root.join(&old_path);
        let to = self.root.join(&new_path);
        if !tokio::fs::try_exists(&from).await? {
            return Err(StoreError::NotFound(old_path));
        }
        if tokio::fs::try_exists(&to).await? {
            return Err(StoreError::Conflict(new_path));
        }
        tokio::fs::rename(from, to).await?;
        Ok(())
    }

    async fn delete_files(&self, paths: &[String]) -> StoreResult<usize> {
        let mut deleted = 0;
        for path in paths {
            let name = sanitize_name(path)?;
            match tokio::fs::remove_file(self.root.join(&name)).await {
                Ok(()) => deleted += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name(" hero.png ").unwrap(), "hero.png");
        assert!(sanitize_name("../secret").is_err());
        assert!(sanitize_name(".env").is_err());
        assert!(sanitize_name("").is_err());
    }

    #[test]
    fn test_unique_path_suffixes() {
        let taken = ["hero.png", "hero-1.png"];
        let path = unique_path("hero.png", |c| taken.contains(&c)).unwrap();
        assert_eq!(path, "hero-2.png");
        assert_eq!(unique_path("README", |c| c == "README").unwrap(), "README-1");
    }

    #[test]
    fn test_candidate_names_order() {
        let names: Vec<_> = candidate_names("a.tar.gz").unwrap().take(3).collect();
        assert_eq!(names, vec!["a.tar.gz", "a.tar-1.gz", "a.tar-2.gz"]);
        assert!(candidate_names("../x").is_err());
    }

    #[tokio::test]
    async fn test_dir_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirAssetStore::new(dir.path().join("gallery"), "https://cdn.test");

        let uploaded = store.upload_file("hero.jpg", b"jpeg".to_vec(), "image/jpeg").await.unwrap();
        assert_eq!(uploaded.public_url, "https://cdn.test/hero.jpg");

        store.rename_file("hero.jpg", "cover.jpg").await.unwrap();
        let files = store.list_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "cover.jpg");
        assert_eq!(files[0].metadata.content_type, "image/jpeg");
        assert_eq!(files[0].metadata.size, 4);

        assert!(store.rename_file("missing.jpg", "x.jpg").await.unwrap_err().is_not_found());
        assert_eq!(store.delete_files(&["cover.jpg".to_string()]).await.unwrap(), 1);
        assert!(store.list_files().await.unwrap().is_empty());
    }
}
