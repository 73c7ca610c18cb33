//! # Persistence Gateway
//!
//! Templates are stored as an opaque JSON blob plus a little metadata. The
//! store never interprets the document beyond the structural checks in
//! [`check_draft`]. Writes are last-write-wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailcraft_schema::{validate, Document};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

pub const MAX_TEMPLATE_NAME_LEN: usize = 100;

/// A stored template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: Document,
    #[serde(default)]
    pub categories: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// What the editor hands to `save_template`; `id: None` creates a new template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub content: Document,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTemplate {
    pub id: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub categories: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Template> for TemplateSummary {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            categories: template.categories.clone(),
            updated_at: template.updated_at,
        }
    }
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn load_template(&self, id: &str) -> StoreResult<Template>;

    async fn save_template(&self, draft: TemplateDraft) -> StoreResult<SavedTemplate>;

    /// Most recently updated first
    async fn list_templates(&self) -> StoreResult<Vec<TemplateSummary>>;

    async fn delete_template(&self, id: &str) -> StoreResult<()>;
}

/// Boundary validation shared by every store
pub fn check_draft(draft: &TemplateDraft) -> StoreResult<()> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("template name is required".to_string()));
    }
    if name.chars().count() > MAX_TEMPLATE_NAME_LEN {
        return Err(StoreError::Validation(format!(
            "template name is longer than {} characters",
            MAX_TEMPLATE_NAME_LEN
        )));
    }
    if let Some(id) = &draft.id {
        check_id(id)?;
    }

    let issues = validate(&draft.content);
    if !issues.is_empty() {
        return Err(StoreError::InvalidDocument(issues));
    }
    Ok(())
}

/// Ids double as file names in directory stores
pub fn check_id(id: &str) -> StoreResult<()> {
    let valid = !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Validation(format!("invalid template id {:?}", id)))
    }
}

pub fn new_template_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub(crate) fn into_template(draft: TemplateDraft, id: String, updated_at: DateTime<Utc>) -> Template {
    Template {
        id,
        name: draft.name.trim().to_string(),
        content: draft.content,
        categories: draft.categories,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_schema::{Column, Row};

    fn draft(name: &str) -> TemplateDraft {
        TemplateDraft {
            id: None,
            name: name.to_string(),
            content: Document::new(),
            categories: vec![],
        }
    }

    #[test]
    fn test_name_rules() {
        assert!(check_draft(&draft("Welcome")).is_ok());
        assert!(matches!(check_draft(&draft("   ")), Err(StoreError::Validation(_))));
        assert!(matches!(
            check_draft(&draft(&"x".repeat(101))),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_content_is_rejected() {
        let mut bad = draft("Broken");
        bad.content.rows.push(Row::columns("r-1", vec![Column::new("c-1", 70.0)]));

        let err = check_draft(&bad).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(ref issues) if issues.len() == 1));
        assert!(err.to_string().contains("sum to 70"));
    }

    #[test]
    fn test_id_rules() {
        assert!(check_id(&new_template_id()).is_ok());
        assert!(check_id("../etc/passwd").is_err());
        assert!(check_id("").is_err());
    }
}
