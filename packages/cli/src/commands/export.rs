use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_store::{DirTemplateStore, TemplateStore};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Template id
    pub id: String,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export the whole stored template, not just the document
    #[arg(long)]
    pub with_meta: bool,
}

pub async fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = DirTemplateStore::new(config.get_store_dir(cwd));

    let json = export_json(&args, &store).await?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            eprintln!("{} {} → {}", "✓".green(), args.id, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn export_json(args: &ExportArgs, store: &dyn TemplateStore) -> Result<String> {
    let template = store.load_template(&args.id).await?;
    if args.with_meta {
        Ok(serde_json::to_string_pretty(&template)?)
    } else {
        Ok(template.content.to_json_pretty()?)
    }
}
