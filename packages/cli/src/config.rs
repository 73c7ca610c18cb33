use mailcraft_editor::DEFAULT_MAX_LEVELS;
use mailcraft_render::{HtmlOptions, RenderOptions, DEFAULT_CONTENT_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "mailcraft.config.json";

/// Mailcraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one `<id>.json` per template
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Directory for uploaded images
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Public URL prefix for uploaded images
    #[serde(default = "default_assets_url")]
    pub assets_url: String,

    /// Undo levels kept per editing session (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Content width in pixels
    #[serde(default = "default_content_width")]
    pub content_width: f64,

    #[serde(default = "default_pretty")]
    pub pretty: bool,

    #[serde(default = "default_indent")]
    pub indent: String,
}

fn default_store_dir() -> String {
    "templates".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_assets_url() -> String {
    "/assets".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_MAX_LEVELS
}

fn default_content_width() -> f64 {
    DEFAULT_CONTENT_WIDTH
}

fn default_pretty() -> bool {
    true
}

fn default_indent() -> String {
    "  ".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_store_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_dir)
    }

    pub fn get_assets_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.assets_dir)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            content_width: self.render.content_width,
            ..RenderOptions::default()
        }
    }

    pub fn html_options(&self, title: &str) -> HtmlOptions {
        HtmlOptions {
            pretty: self.render.pretty,
            indent: self.render.indent.clone(),
            title: title.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            assets_dir: default_assets_dir(),
            assets_url: default_assets_url(),
            history_limit: default_history_limit(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            content_width: default_content_width(),
            pretty: default_pretty(),
            indent: default_indent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "emails",
            "historyLimit": 20,
            "render": { "contentWidth": 640, "pretty": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "emails");
        assert_eq!(config.assets_dir, "assets");
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.render.content_width, 640.0);
        assert!(!config.render.pretty);
        assert_eq!(config.render.indent, "  ");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store_dir, "templates");
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.render.content_width, DEFAULT_CONTENT_WIDTH);
        assert!(config.render.pretty);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "storeDir": "out", "render": { "indent": "\t" } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.get_store_dir(dir.path()), dir.path().join("out"));
        assert_eq!(config.html_options("t").indent, "\t");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ nope").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
