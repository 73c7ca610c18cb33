//! Loading and saving a session through a [`TemplateStore`].
//!
//! `save` is `begin_save` + store call + `finish_save`; hosts that drive the
//! request themselves use the two halves directly.

use chrono::Utc;
use mailcraft_schema::Document;
use mailcraft_store::{SavedTemplate, StoreError, TemplateDraft, TemplateStore};
use tracing::{info, instrument, warn};

use crate::selection::InteractionMode;
use crate::session::{EditSession, SaveState, TemplateMeta};
use crate::EditorError;

/// Proof that a save was started; remembers which generation it carries.
/// Every ticket must end in [`EditSession::finish_save`] or
/// [`EditSession::abort_save`], otherwise the session stays `Saving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SaveTicket {
    generation: u64,
}

impl EditSession {
    /// Open `template_id` from `store`. A failed load still yields a usable
    /// session over an empty document that asks for a name.
    pub async fn open(id: impl Into<String>, store: &dyn TemplateStore, template_id: &str) -> Self {
        let mut session = Self::new(id);
        if let Err(e) = session.load(store, template_id).await {
            warn!(template_id, error = %e, "Starting from an empty template");
        }
        session
    }

    /// Replace the session contents with a stored template
    #[instrument(skip(self, store))]
    pub async fn load(&mut self, store: &dyn TemplateStore, template_id: &str) -> Result<(), EditorError> {
        match store.load_template(template_id).await {
            Ok(template) => {
                self.reset(template.content);
                self.meta = TemplateMeta {
                    id: Some(template.id),
                    name: template.name,
                    categories: template.categories,
                };
                self.needs_name = self.meta.name.trim().is_empty();
                self.last_saved_at = Some(template.updated_at);
                info!(rows = self.document().rows.len(), "Template loaded");
                Ok(())
            }
            Err(e) => {
                self.reset(Document::new());
                self.meta = TemplateMeta::default();
                self.needs_name = true;
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Snapshot the document for saving. Fails when the template has no
    /// name yet.
    pub fn begin_save(&mut self) -> Result<(SaveTicket, TemplateDraft), EditorError> {
        if self.meta.name.trim().is_empty() {
            self.needs_name = true;
            return Err(EditorError::NameRequired);
        }
        if self.save_state == SaveState::Saving {
            return Err(EditorError::SaveInProgress);
        }

        self.save_state = SaveState::Saving;
        self.last_error = None;
        let draft = TemplateDraft {
            id: self.meta.id.clone(),
            name: self.meta.name.clone(),
            content: self.document().clone(),
            categories: self.meta.categories.clone(),
        };
        Ok((
            SaveTicket {
                generation: self.history.generation(),
            },
            draft,
        ))
    }

    /// Record the store's answer. The document itself is never touched.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<SavedTemplate, StoreError>,
    ) -> Result<SavedTemplate, EditorError> {
        self.save_state = SaveState::Idle;
        match result {
            Ok(saved) => {
                self.meta.id = Some(saved.id.clone());
                self.saved_generation = ticket.generation;
                self.last_saved_at = Some(saved.updated_at);
                info!(template_id = %saved.id, "Template saved");
                Ok(saved)
            }
            Err(e) => {
                warn!(error = %e, "Save failed");
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Give up on a save whose request was never sent or never answered.
    /// The session returns to `Idle` and stays dirty.
    pub fn abort_save(&mut self, ticket: SaveTicket) {
        if self.save_state == SaveState::Saving {
            self.save_state = SaveState::Idle;
            warn!(generation = ticket.generation, "Save abandoned");
        }
    }

    #[instrument(skip_all, fields(name = %self.meta.name))]
    pub async fn save(&mut self, store: &dyn TemplateStore) -> Result<SavedTemplate, EditorError> {
        let (ticket, draft) = self.begin_save()?;
        let result = store.save_template(draft).await;
        self.finish_save(ticket, result)
    }

    pub fn save_state(&self) -> SaveState {
        self.save_state
    }

    pub fn last_saved_at(&self) -> Option<chrono::DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The host should prompt for a template name
    pub fn needs_name(&self) -> bool {
        self.needs_name
    }

    fn reset(&mut self, document: Document) {
        self.ids.skip_past(&document);
        self.history.clear(document);
        self.saved_generation = self.history.generation();
        self.selection.clear();
        self.mode = InteractionMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_store::MemoryTemplateStore;

    #[tokio::test]
    async fn test_save_requires_name() {
        let store = MemoryTemplateStore::new();
        let mut session = EditSession::new("s");
        session.add_wrapper_row().unwrap();

        assert!(matches!(session.save(&store).await, Err(EditorError::NameRequired)));
        assert!(session.needs_name());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_save_clears_dirty_and_keeps_id() {
        let store = MemoryTemplateStore::new();
        let mut session = EditSession::new("s");
        session.set_name("Welcome");
        session.add_columns_row(2).unwrap();
        assert!(session.is_dirty());

        let first = session.save(&store).await.unwrap();
        assert!(!session.is_dirty());
        assert_eq!(session.meta().id.as_deref(), Some(first.id.as_str()));

        session.add_wrapper_row().unwrap();
        let second = session.save(&store).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_edits_during_save_stay_dirty() {
        let store = MemoryTemplateStore::new();
        let mut session = EditSession::new("s");
        session.set_name("Racy");

        let (ticket, draft) = session.begin_save().unwrap();
        assert_eq!(session.save_state(), SaveState::Saving);
        session.add_wrapper_row().unwrap();

        let result = store.save_template(draft).await;
        session.finish_save(ticket, result).unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.save_state(), SaveState::Idle);
    }

    #[tokio::test]
    async fn test_abandoned_save_can_be_retried() {
        let store = MemoryTemplateStore::new();
        let mut session = EditSession::new("s");
        session.set_name("Dropped");
        session.add_wrapper_row().unwrap();

        let (ticket, _draft) = session.begin_save().unwrap();
        assert!(matches!(session.begin_save(), Err(EditorError::SaveInProgress)));

        session.abort_save(ticket);
        assert_eq!(session.save_state(), SaveState::Idle);
        assert!(session.is_dirty());

        session.save(&store).await.unwrap();
        assert!(!session.is_dirty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_load_gives_empty_named_prompt() {
        let store = MemoryTemplateStore::new();
        let session = EditSession::open("s", &store, "missing").await;
        assert!(session.document().is_empty());
        assert!(session.needs_name());
        assert!(session.last_error().is_some());
        assert!(!session.is_dirty());
    }
}
