use crate::commands::load_source;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_schema::{validate, Issue};
use mailcraft_store::{DirTemplateStore, TemplateStore};
use std::path::Path;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Template ids or `.json` paths; every stored template when empty
    pub sources: Vec<String>,
}

pub async fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = DirTemplateStore::new(config.get_store_dir(cwd));

    let sources = if args.sources.is_empty() {
        store.list_templates().await?.into_iter().map(|t| t.id).collect()
    } else {
        args.sources
    };

    if sources.is_empty() {
        println!("{}", "⚠️  No templates found".yellow());
        return Ok(());
    }

    let mut failed = 0;
    for source in &sources {
        match check_source(source, &store).await {
            Ok(issues) if issues.is_empty() => {
                println!("  {} {}", "✓".green(), source);
            }
            Ok(issues) => {
                failed += 1;
                println!("  {} {}", "✗".red(), source);
                for issue in issues {
                    println!("      {}", issue.to_string().red());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("  {} {} - {}", "✗".red(), source, e.to_string().red());
            }
        }
    }

    println!();
    if failed == 0 {
        println!("{} {} templates are well formed", "✅".green(), sources.len());
        Ok(())
    } else {
        Err(anyhow!("{} of {} templates have problems", failed, sources.len()))
    }
}

async fn check_source(source: &str, store: &dyn TemplateStore) -> Result<Vec<Issue>> {
    let source = load_source(source, store).await?;
    Ok(validate(&source.document))
}
