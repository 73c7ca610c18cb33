use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_store::{DirTemplateStore, TemplateStore, TemplateSummary};
use std::path::Path;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only templates in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn list(args: ListArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = DirTemplateStore::new(config.get_store_dir(cwd));
    let templates = filter(store.list_templates().await?, args.category.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&templates)?);
        return Ok(());
    }

    if templates.is_empty() {
        println!("{}", "No templates".dimmed());
        return Ok(());
    }

    for template in &templates {
        let categories = if template.categories.is_empty() {
            String::new()
        } else {
            format!(" [{}]", template.categories.join(", "))
        };
        println!(
            "  {}  {}{}  {}",
            template.id.bold(),
            template.name,
            categories.cyan(),
            template.updated_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }
    Ok(())
}

fn filter(templates: Vec<TemplateSummary>, category: Option<&str>) -> Vec<TemplateSummary> {
    match category {
        Some(category) => templates
            .into_iter()
            .filter(|t| t.categories.iter().any(|c| c == category))
            .collect(),
        None => templates,
    }
}
