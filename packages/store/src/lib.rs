//! # Mailcraft Store
//!
//! Gateways the editor talks to for persistence:
//!
//! - [`TemplateStore`]: load/save templates as `{ name, content, categories }`
//! - [`AssetStore`]: the image gallery behind the pickers
//!
//! Each comes with an in-memory and a directory-backed implementation.
//! All operations return `Result`; nothing panics on a bad input.

pub mod assets;
mod dir;
mod error;
mod memory;
pub mod template;

pub use assets::{AssetFile, AssetMetadata, AssetStore, DirAssetStore, UploadedAsset};
pub use dir::DirTemplateStore;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryAssetStore, MemoryTemplateStore};
pub use template::{SavedTemplate, Template, TemplateDraft, TemplateStore, TemplateSummary};
