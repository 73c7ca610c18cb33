//! Error types for the editor

use mailcraft_schema::SchemaError;
use mailcraft_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Template needs a name before it can be saved")]
    NameRequired,

    #[error("A save is already in progress")]
    SaveInProgress,
}

impl EditorError {
    /// Whether this is a rule violation the user should see, as opposed to
    /// an infrastructure failure
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EditorError::Mutation(_) | EditorError::NameRequired | EditorError::Store(StoreError::Validation(_))
        )
    }
}
