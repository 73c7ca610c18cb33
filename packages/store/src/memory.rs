//! In-process stores, for tests and embedding.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::assets::{unique_path, AssetFile, AssetMetadata, AssetStore, UploadedAsset};
use crate::error::{StoreError, StoreResult};
use crate::template::{
    check_draft, into_template, new_template_id, SavedTemplate, Template, TemplateDraft, TemplateStore,
    TemplateSummary,
};

#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, Template>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.templates.read().await.len()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn load_template(&self, id: &str) -> StoreResult<Template> {
        self.templates
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn save_template(&self, draft: TemplateDraft) -> StoreResult<SavedTemplate> {
        check_draft(&draft)?;

        let id = draft.id.clone().unwrap_or_else(new_template_id);
        let updated_at = Utc::now();
        let template = into_template(draft, id.clone(), updated_at);

        self.templates.write().await.insert(id.clone(), template);
        debug!(template_id = %id, "Template saved in memory");

        Ok(SavedTemplate { id, updated_at })
    }

    async fn list_templates(&self) -> StoreResult<Vec<TemplateSummary>> {
        let mut summaries: Vec<TemplateSummary> =
            self.templates.read().await.values().map(TemplateSummary::from).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn delete_template(&self, id: &str) -> StoreResult<()> {
        self.templates
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[derive(Debug)]
struct StoredAsset {
    bytes: Vec<u8>,
    metadata: AssetMetadata,
}

/// Asset gallery held in memory; public URLs are `<base_url>/<path>`
#[derive(Debug)]
pub struct MemoryAssetStore {
    base_url: String,
    files: RwLock<BTreeMap<String, StoredAsset>>,
}

impl MemoryAssetStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            files: RwLock::new(BTreeMap::new()),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(path).map(|f| f.bytes.clone())
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn list_files(&self) -> StoreResult<Vec<AssetFile>> {
        Ok(self
            .files
            .read()
            .await
            .iter()
            .map(|(path, file)| AssetFile {
                name: path.clone(),
                url: self.public_url(path),
                metadata: file.metadata.clone(),
            })
            .collect())
    }

    async fn upload_file(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<UploadedAsset> {
        let mut files = self.files.write().await;
        let path = unique_path(name, |candidate| files.contains_key(candidate))?;

        let metadata = AssetMetadata {
            size: bytes.len() as u64,
            content_type: content_type.to_string(),
            updated_at: Utc::now(),
        };
        files.insert(path.clone(), StoredAsset { bytes, metadata });

        Ok(UploadedAsset {
            public_url: self.public_url(&path),
            path,
        })
    }

    async fn rename_file(&self, old_path: &str, new_path: &str) -> StoreResult<()> {
        let new_path = crate::assets::sanitize_name(new_path)?;
        let mut files = self.files.write().await;
        if files.contains_key(&new_path) {
            return Err(StoreError::Conflict(new_path));
        }
        let file = files
            .remove(old_path)
            .ok_or_else(|| StoreError::NotFound(old_path.to_string()))?;
        files.insert(new_path, file);
        Ok(())
    }

    async fn delete_files(&self, paths: &[String]) -> StoreResult<usize> {
        let mut files = self.files.write().await;
        Ok(paths.iter().filter(|p| files.remove(p.as_str()).is_some()).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_schema::Document;

    fn draft(id: Option<&str>, name: &str) -> TemplateDraft {
        TemplateDraft {
            id: id.map(str::to_string),
            name: name.to_string(),
            content: Document::new(),
            categories: vec!["promo".to_string()],
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryTemplateStore::new();
        let saved = store.save_template(draft(None, "  Launch  ")).await.unwrap();

        let loaded = store.load_template(&saved.id).await.unwrap();
        assert_eq!(loaded.name, "Launch");
        assert_eq!(loaded.updated_at, saved.updated_at);
        assert_eq!(loaded.categories, vec!["promo"]);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryTemplateStore::new();
        store.save_template(draft(Some("t1"), "First")).await.unwrap();
        store.save_template(draft(Some("t1"), "Second")).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.load_template("t1").await.unwrap().name, "Second");
    }

    #[tokio::test]
    async fn test_missing_template() {
        let store = MemoryTemplateStore::new();
        assert!(store.load_template("nope").await.unwrap_err().is_not_found());
        assert!(store.delete_template("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_asset_gallery() {
        let store = MemoryAssetStore::new("https://cdn.test/assets/");
        let first = store.upload_file("logo.png", vec![1, 2, 3], "image/png").await.unwrap();
        let second = store.upload_file("logo.png", vec![4], "image/png").await.unwrap();

        assert_eq!(first.public_url, "https://cdn.test/assets/logo.png");
        assert_eq!(second.path, "logo-1.png");

        store.rename_file("logo-1.png", "banner.png").await.unwrap();
        assert!(matches!(
            store.rename_file("banner.png", "logo.png").await,
            Err(StoreError::Conflict(_))
        ));

        let names: Vec<String> = store.list_files().await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["banner.png", "logo.png"]);

        let deleted = store
            .delete_files(&["banner.png".to_string(), "ghost.png".to_string()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.bytes("logo.png").await, Some(vec![1, 2, 3]));
    }
}
