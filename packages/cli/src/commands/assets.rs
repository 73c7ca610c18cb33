use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use mailcraft_store::assets::guess_content_type;
use mailcraft_store::{AssetStore, DirAssetStore};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct AssetsArgs {
    #[command(subcommand)]
    pub command: AssetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AssetsCommand {
    /// List uploaded images
    List,

    /// Copy images into the gallery
    Upload { files: Vec<PathBuf> },

    /// Rename a gallery image
    Rename { from: String, to: String },

    /// Remove gallery images
    Delete { names: Vec<String> },
}

pub async fn assets(args: AssetsArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = DirAssetStore::new(config.get_assets_dir(cwd), config.assets_url.clone());
    run(args.command, &store).await
}

async fn run(command: AssetsCommand, store: &dyn AssetStore) -> Result<()> {
    match command {
        AssetsCommand::List => {
            let files = store.list_files().await?;
            if files.is_empty() {
                println!("{}", "No images".dimmed());
            }
            for file in files {
                println!(
                    "  {}  {}  {}",
                    file.name.bold(),
                    format!("{} bytes", file.metadata.size).dimmed(),
                    file.url
                );
            }
        }
        AssetsCommand::Upload { files } => {
            for path in files {
                let uploaded = upload(&path, store).await?;
                println!("  {} {} → {}", "✓".green(), path.display(), uploaded);
            }
        }
        AssetsCommand::Rename { from, to } => {
            store.rename_file(&from, &to).await?;
            println!("  {} {} → {}", "✓".green(), from, to);
        }
        AssetsCommand::Delete { names } => {
            let deleted = store.delete_files(&names).await?;
            println!("{} Deleted {} of {} images", "✅".green(), deleted, names.len());
        }
    }
    Ok(())
}

async fn upload(path: &Path, store: &dyn AssetStore) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Not a file: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;

    let uploaded = store.upload_file(name, bytes, guess_content_type(name)).await?;
    Ok(uploaded.public_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_store::MemoryAssetStore;

    #[tokio::test]
    async fn test_upload_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.png");
        std::fs::write(&path, b"png").unwrap();

        let store = MemoryAssetStore::new("https://cdn.test");
        let url = upload(&path, &store).await.unwrap();
        assert_eq!(url, "https://cdn.test/hero.png");

        let second = upload(&path, &store).await.unwrap();
        assert_eq!(second, "https://cdn.test/hero-1.png");
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let store = MemoryAssetStore::new("https://cdn.test");
        assert!(upload(Path::new("/definitely/not/here.png"), &store).await.is_err());
    }

    #[tokio::test]
    async fn test_assets_command_uses_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("logo.svg");
        std::fs::write(&image, "<svg/>").unwrap();

        let args = AssetsArgs {
            command: AssetsCommand::Upload { files: vec![image] },
        };
        assets(args, dir.path()).await.unwrap();
        assert!(dir.path().join("assets").join("logo.svg").exists());
    }
}
