use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::error::{StoreError, StoreResult};
use crate::template::{
    check_draft, check_id, into_template, new_template_id, SavedTemplate, Template, TemplateDraft, TemplateStore,
    TemplateSummary,
};

/// One `<id>.json` file per template under a directory
#[derive(Debug, Clone)]
pub struct DirTemplateStore {
    root: PathBuf,
}

impl DirTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        check_id(id)?;
        Ok(self.root.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl TemplateStore for DirTemplateStore {
    #[instrument(skip(self))]
    async fn load_template(&self, id: &str) -> StoreResult<Template> {
        let path = self.path_for(id)?;
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    #[instrument(skip_all, fields(name = %draft.name))]
    async fn save_template(&self, draft: TemplateDraft) -> StoreResult<SavedTemplate> {
        check_draft(&draft)?;
        tokio::fs::create_dir_all(&self.root).await?;

        let id = draft.id.clone().unwrap_or_else(new_template_id);
        let path = self.path_for(&id)?;
        let updated_at = Utc::now();
        let template = into_template(draft, id.clone(), updated_at);

        // Write-then-rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&template)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(template_id = %id, path = %path.display(), "Template saved");

        Ok(SavedTemplate { id, updated_at })
    }

    async fn list_templates(&self) -> StoreResult<Vec<TemplateSummary>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = tokio::fs::read_to_string(&path)
                .await
                .map_err(StoreError::from)
                .and_then(|json| serde_json::from_str::<Template>(&json).map_err(StoreError::from));
            match parsed {
                Ok(template) => summaries.push(TemplateSummary::from(&template)),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable template"),
            }
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn delete_template(&self, id: &str) -> StoreResult<()> {
        match tokio::fs::remove_file(self.path_for(id)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_schema::Document;

    #[tokio::test]
    async fn test_save_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTemplateStore::new(dir.path());

        let saved = store
            .save_template(TemplateDraft {
                id: None,
                name: "Digest".to_string(),
                content: Document::new(),
                categories: vec![],
            })
            .await
            .unwrap();

        let listed = store.list_templates().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);

        store.delete_template(&saved.id).await.unwrap();
        assert!(store.load_template(&saved.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTemplateStore::new(dir.path().join("never-created"));
        assert!(store.list_templates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("junk.json"), "not json").await.unwrap();
        let store = DirTemplateStore::new(dir.path());
        assert!(store.list_templates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTemplateStore::new(dir.path());
        assert!(matches!(
            store.load_template("../outside").await,
            Err(StoreError::Validation(_))
        ));
    }
}
