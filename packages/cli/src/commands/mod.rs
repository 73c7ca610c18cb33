pub mod assets;
pub mod check;
pub mod export;
pub mod import;
pub mod list;
pub mod preview;

pub use assets::{assets, AssetsArgs};
pub use check::{check, CheckArgs};
pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use list::{list, ListArgs};
pub use preview::{preview, PreviewArgs};

use anyhow::{bail, Context, Result};
use mailcraft_schema::Document;
use mailcraft_store::{Template, TemplateStore};
use std::path::Path;

/// A document read from disk or from the template store
pub struct Source {
    pub label: String,
    pub document: Document,
}

/// `source` is a `.json` path (a bare document or a stored template file)
/// or a template id in the store.
pub async fn load_source(source: &str, store: &dyn TemplateStore) -> Result<Source> {
    let path = Path::new(source);
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read {}", path.display()))?;
        return Ok(Source {
            label: path.display().to_string(),
            document: read_document(&json).with_context(|| format!("{} is not a template", path.display()))?,
        });
    }

    let template = store.load_template(source).await?;
    Ok(Source {
        label: template.name,
        document: template.content,
    })
}

/// Accept either a whole stored template or a bare document. The shape is
/// decided by the top-level keys, so a template with a bad block is reported
/// instead of falling back to an empty document.
pub fn read_document(json: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let Some(object) = value.as_object() else {
        bail!("expected a JSON object");
    };

    if object.contains_key("content") || object.contains_key("updatedAt") {
        let template: Template = serde_json::from_value(value).context("Invalid template")?;
        Ok(template.content)
    } else if object.contains_key("rows") {
        Ok(Document::from_value(value)?)
    } else {
        bail!("expected a template (`content`) or a document (`rows`)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_schema::{PositionedBlock, PositionedContent, Row};
    use mailcraft_store::{MemoryTemplateStore, TemplateDraft};

    pub(crate) fn sample_document() -> Document {
        let mut wrapper = mailcraft_schema::WrapperRow::new("row-1");
        wrapper
            .blocks
            .push(PositionedBlock::new("p-1", "Heading 1", 10.0, 20.0, PositionedContent::heading()));
        Document {
            rows: vec![Row::Wrapper(wrapper)],
        }
    }

    #[tokio::test]
    async fn test_load_source_from_store() {
        let store = MemoryTemplateStore::new();
        let saved = store
            .save_template(TemplateDraft {
                id: None,
                name: "Welcome".to_string(),
                content: sample_document(),
                categories: vec![],
            })
            .await
            .unwrap();

        let source = load_source(&saved.id, &store).await.unwrap();
        assert_eq!(source.label, "Welcome");
        assert_eq!(source.document, sample_document());
    }

    #[tokio::test]
    async fn test_load_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, sample_document().to_json().unwrap()).unwrap();

        let store = MemoryTemplateStore::new();
        let source = load_source(path.to_str().unwrap(), &store).await.unwrap();
        assert_eq!(source.document, sample_document());
    }

    #[tokio::test]
    async fn test_missing_template_is_an_error() {
        let store = MemoryTemplateStore::new();
        assert!(load_source("nope", &store).await.is_err());
    }

    #[test]
    fn test_read_document_accepts_template_files() {
        let json = serde_json::json!({
            "id": "t1",
            "name": "Stored",
            "content": sample_document(),
            "updatedAt": "2026-01-01T00:00:00Z"
        })
        .to_string();
        assert_eq!(read_document(&json).unwrap(), sample_document());
    }

    #[test]
    fn test_read_document_rejects_garbage() {
        assert!(read_document("[1, 2, 3]").is_err());
        assert!(read_document(r#"{ "title": "not a template" }"#).is_err());
    }

    #[test]
    fn test_template_with_bad_block_is_an_error() {
        let json = serde_json::json!({
            "id": "t1",
            "name": "Broken",
            "content": {
                "rows": [{
                    "type": "columns",
                    "id": "row-1",
                    "columns": [{
                        "id": "col-1",
                        "width": 100.0,
                        "blocks": [{ "id": "b-1", "type": "button", "payload": { "text": 12 } }]
                    }]
                }]
            },
            "updatedAt": "2026-01-01T00:00:00Z"
        })
        .to_string();
        assert!(read_document(&json).is_err());
    }

    #[test]
    fn test_bare_document_with_bad_block_is_an_error() {
        let json = r#"{ "rows": [{ "type": "wrapper", "id": "w-1", "height": "tall" }] }"#;
        assert!(read_document(json).is_err());
    }
}
