use crate::commands::load_source;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_render::render_email_html;
use mailcraft_store::DirTemplateStore;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Template id in the store, or a path to a `.json` document
    pub source: String,

    /// Write the HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the content width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Emit compact HTML
    #[arg(long)]
    pub compact: bool,
}

pub async fn preview(args: PreviewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = DirTemplateStore::new(config.get_store_dir(cwd));
    let source = load_source(&args.source, &store).await?;

    let html = render_preview(&source.document, &source.label, &config, &args);
    debug!(bytes = html.len(), "Preview rendered");

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, html).await?;
            eprintln!("{} {} → {}", "✓".green(), source.label, path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn render_preview(document: &mailcraft_schema::Document, title: &str, config: &Config, args: &PreviewArgs) -> String {
    let mut render = config.render_options();
    if let Some(width) = args.width {
        render.content_width = width;
    }
    let mut html = config.html_options(title);
    if args.compact {
        html.pretty = false;
    }
    render_email_html(document, &render, &html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::sample_document;

    fn args() -> PreviewArgs {
        PreviewArgs {
            source: "unused".to_string(),
            output: None,
            width: None,
            compact: false,
        }
    }

    #[test]
    fn test_preview_is_a_full_html_document() {
        let html = render_preview(&sample_document(), "Welcome", &Config::default(), &args());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Welcome</title>"));
    }

    #[test]
    fn test_compact_flag_overrides_config() {
        let pretty = render_preview(&sample_document(), "t", &Config::default(), &args());
        let compact = render_preview(
            &sample_document(),
            "t",
            &Config::default(),
            &PreviewArgs {
                compact: true,
                ..args()
            },
        );
        assert!(compact.len() < pretty.len());
    }

    #[tokio::test]
    async fn test_preview_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("doc.json");
        std::fs::write(&doc_path, sample_document().to_json().unwrap()).unwrap();
        let out = dir.path().join("out.html");

        preview(
            PreviewArgs {
                source: doc_path.display().to_string(),
                output: Some(out.clone()),
                ..args()
            },
            dir.path(),
        )
        .await
        .unwrap();

        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.contains("<html>"));
    }
}
