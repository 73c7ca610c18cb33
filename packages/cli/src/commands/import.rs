use crate::commands::read_document;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_editor::EditSession;
use mailcraft_store::{DirTemplateStore, SavedTemplate, TemplateStore};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON document (or exported template) to import
    pub file: PathBuf,

    /// Template name
    #[arg(short, long)]
    pub name: String,

    /// Category, repeatable
    #[arg(short, long = "category")]
    pub categories: Vec<String>,
}

pub async fn import(args: ImportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = DirTemplateStore::new(config.get_store_dir(cwd));

    let saved = import_into(&args, &config, &store).await?;
    println!(
        "{} Imported {} as {}",
        "✅".green(),
        args.file.display(),
        saved.id.bold()
    );
    Ok(())
}

/// Saves through an editing session so imports go through the same checks as
/// interactive saves.
async fn import_into(args: &ImportArgs, config: &Config, store: &dyn TemplateStore) -> Result<SavedTemplate> {
    let json = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    let document = read_document(&json)?;

    let mut session = EditSession::with_document("import", document).with_history_limit(config.history_limit);
    session.set_name(args.name.clone());
    session.set_categories(args.categories.clone());

    let saved = session.save(store).await?;
    info!(template_id = %saved.id, "Template imported");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::sample_document;
    use mailcraft_store::MemoryTemplateStore;

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("in.json");
        std::fs::write(&path, sample_document().to_json_pretty().unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_saves_named_template() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryTemplateStore::new();
        let args = ImportArgs {
            file: write_sample(dir.path()),
            name: "Newsletter".to_string(),
            categories: vec!["marketing".to_string()],
        };

        let saved = import_into(&args, &Config::default(), &store).await.unwrap();
        let template = store.load_template(&saved.id).await.unwrap();
        assert_eq!(template.name, "Newsletter");
        assert_eq!(template.categories, vec!["marketing"]);
        assert_eq!(template.content, sample_document());
    }

    #[tokio::test]
    async fn test_import_requires_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryTemplateStore::new();
        let args = ImportArgs {
            file: write_sample(dir.path()),
            name: "   ".to_string(),
            categories: vec![],
        };

        assert!(import_into(&args, &Config::default(), &store).await.is_err());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_import_writes_into_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = ImportArgs {
            file: write_sample(dir.path()),
            name: "Disk".to_string(),
            categories: vec![],
        };
        import(args, dir.path()).await.unwrap();

        let store = DirTemplateStore::new(Config::default().get_store_dir(dir.path()));
        assert_eq!(store.list_templates().await.unwrap().len(), 1);
    }
}
